//! Laser debris-removal campaign simulator.
//!
//! A pulsed-laser spacecraft flies a slightly offset orbit above a collision
//! fragment cloud and nudges fragments onto decaying orbits, one pulse at a
//! time, until a target removal fraction is reached. Keeping the physics and
//! the campaign driver in library crates lets multiple front-ends (CLI,
//! plotting, batch sweeps) share them.

pub use ldr_campaign as campaign;
pub use ldr_catalog as catalog;
pub use ldr_config as config;
pub use ldr_core::{constants, time, units, vector};
pub use ldr_export as export;
pub use ldr_impulse as impulse;
pub use ldr_kepler as kepler;
pub use ldr_visibility as visibility;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
