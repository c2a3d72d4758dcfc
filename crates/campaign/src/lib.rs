//! Campaign simulation: the bisection window solver, the epoch driver, and
//! the run harness that assembles a campaign from a fragment catalogue.

pub mod bisection;
pub mod driver;
pub mod fragment;
pub mod harness;
pub mod spacecraft;

pub use driver::{Campaign, CampaignOutcome, CampaignParams, EpochEvent, Shot};
pub use fragment::Fragment;
pub use harness::{filter_population, run_campaign, seed_spacecraft};
pub use spacecraft::Spacecraft;
