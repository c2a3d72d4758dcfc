//! Campaign run configuration records and loaders.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_earth_radius() -> f64 {
    ldr_core::constants::EARTH_EQUATORIAL_RADIUS_M
}

fn default_j2() -> f64 {
    ldr_core::constants::EARTH_J2
}

fn default_mu() -> f64 {
    ldr_core::constants::EARTH_MU_M3_S2
}

fn default_filter_percent() -> u32 {
    1
}

/// One campaign run, as read from a configuration manifest.
///
/// Field names follow the configuration option names; SI units and radians
/// throughout, except where a field documents otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Catalogue name tag selecting the collision's fragments.
    pub fragment_tag: String,
    /// Earth equatorial radius (m).
    #[serde(rename = "R_e", default = "default_earth_radius")]
    pub earth_radius: f64,
    /// Second zonal harmonic.
    #[serde(rename = "J2", default = "default_j2")]
    pub j2: f64,
    /// Earth gravitational parameter (m³/s²).
    #[serde(default = "default_mu")]
    pub mu: f64,
    /// Collision altitude (m).
    pub h_collision: f64,
    /// Maximum fragment count after filtering.
    pub d_n: usize,
    /// Campaign start, seconds after the collision epoch.
    pub t0: f64,
    /// Platform altitude above the collision shell (m).
    pub h_offset: f64,
    /// Removal fraction at which the campaign halts.
    pub target_fraction: f64,
    /// Impulse sub-step (m/s).
    pub max_dv: f64,
    /// Full field-of-view cone angle (rad).
    #[serde(rename = "FoV")]
    pub fov: f64,
    /// Maximum slant range (m).
    pub range: f64,
    /// Maximum illumination incidence (rad).
    pub incidence_angle: f64,
    /// Ablation dwell per engagement (s).
    pub ablation_time: f64,
    /// Scan dwell per epoch (s).
    pub scan_time: f64,
    /// Laser cooldown after a pulse train (s).
    pub cooldown_time: f64,
    /// Laser fluence on target (J/m²).
    pub fluence: f64,
    /// Momentum coupling coefficient (N·s/J).
    #[serde(rename = "Cm")]
    pub cm: f64,
    /// Pulse repetition rate (Hz).
    pub freq: f64,
    /// Removal altitude: perigees driven below it count as removed (m).
    pub min_perigee: f64,
    /// Simulated-time cap (s).
    pub t_max: f64,
    /// Bisection tolerance on visibility-window edges (s).
    pub bisect_tol: f64,
    /// Compaction stride in integer removal percentage; 0 disables compaction.
    #[serde(default = "default_filter_percent")]
    pub filter_percent: u32,
}

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl RunConfig {
    /// Reject configurations that must not be run at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let require = |ok: bool, reason: &str| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid(reason.to_string()))
            }
        };
        require(self.earth_radius > 0.0, "R_e must be positive")?;
        require(self.mu > 0.0, "mu must be positive")?;
        require(self.h_collision > 0.0, "h_collision must be positive")?;
        require(self.h_offset >= 0.0, "h_offset must be non-negative")?;
        require(self.d_n > 0, "d_n must be at least 1")?;
        require(self.t0 >= 0.0, "t0 must be non-negative")?;
        require(
            self.target_fraction > 0.0 && self.target_fraction <= 1.0,
            "target_fraction must lie in (0, 1]",
        )?;
        require(self.max_dv > 0.0, "max_dv must be positive")?;
        require(self.fov > 0.0, "FoV must be positive")?;
        require(self.range > 0.0, "range must be positive")?;
        require(self.incidence_angle > 0.0, "incidence_angle must be positive")?;
        require(self.ablation_time >= 0.0, "ablation_time must be non-negative")?;
        require(self.scan_time >= 0.0, "scan_time must be non-negative")?;
        require(
            self.ablation_time + self.scan_time > 0.0,
            "scan_time + ablation_time must be positive",
        )?;
        require(self.cooldown_time >= 0.0, "cooldown_time must be non-negative")?;
        require(self.fluence >= 0.0, "fluence must be non-negative")?;
        require(self.cm >= 0.0, "Cm must be non-negative")?;
        require(self.freq >= 0.0, "freq must be non-negative")?;
        require(self.min_perigee >= 0.0, "min_perigee must be non-negative")?;
        require(self.t_max > 0.0, "t_max must be positive")?;
        require(self.bisect_tol > 0.0, "bisect_tol must be positive")?;
        Ok(())
    }
}

/// Load run records from a YAML list, a single TOML file, or a directory of
/// TOML files.
pub fn load_runs<P: AsRef<Path>>(path: P) -> Result<Vec<RunConfig>, ConfigError> {
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_runs(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: RunConfig = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_runs(dir: &Path) -> Result<Vec<RunConfig>, ConfigError> {
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: RunConfig = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
