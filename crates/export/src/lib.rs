//! Export helpers for campaign results: the appended summary CSV and the
//! per-run removal-series artifacts.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Create the parent directory of an artifact path when one is named.
fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Errors that can occur while writing or scanning result artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed results row: {0}")]
    Malformed(#[from] csv::Error),
    #[error("failed to serialize sidecar: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub mod summary {
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::path::Path;

    use super::{ensure_parent_dir, ExportError};

    const HEADER: &str = "h_collision_m,fragments,t0_days,h_offset_m,target_fraction,fov_deg,range_m,incidence_deg,ablation_s,scan_s,cooldown_s,fluence_j_m2,min_perigee_m,time_required_days,fraction_removed";

    /// Relative tolerance for matching an existing row against a configuration.
    const MATCH_TOLERANCE: f64 = 1e-6;

    /// One summary row: the configuration echo followed by the run results.
    #[derive(Debug, Clone)]
    pub struct Record {
        pub collision_altitude_m: f64,
        /// Configured fragment cap (`d_n`).
        pub fragment_cap: usize,
        pub t0_days: f64,
        pub offset_m: f64,
        pub target_fraction: f64,
        pub fov_deg: f64,
        pub range_m: f64,
        pub incidence_deg: f64,
        pub ablation_s: f64,
        pub scan_s: f64,
        pub cooldown_s: f64,
        pub fluence_j_m2: f64,
        pub min_perigee_m: f64,
        pub time_required_days: f64,
        pub fraction_removed: f64,
    }

    impl Record {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> std::io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.6},{},{},{:.6},{},{:.6},{},{},{},{},{},{:.6},{:.6}",
                self.collision_altitude_m,
                self.fragment_cap,
                self.t0_days,
                self.offset_m,
                self.target_fraction,
                self.fov_deg,
                self.range_m,
                self.incidence_deg,
                self.ablation_s,
                self.scan_s,
                self.cooldown_s,
                self.fluence_j_m2,
                self.min_perigee_m,
                self.time_required_days,
                self.fraction_removed,
            )
        }

        /// The thirteen configuration columns, in header order.
        fn configuration_columns(&self) -> [f64; 13] {
            [
                self.collision_altitude_m,
                self.fragment_cap as f64,
                self.t0_days,
                self.offset_m,
                self.target_fraction,
                self.fov_deg,
                self.range_m,
                self.incidence_deg,
                self.ablation_s,
                self.scan_s,
                self.cooldown_s,
                self.fluence_j_m2,
                self.min_perigee_m,
            ]
        }
    }

    /// Append a record, writing the header first when the file is empty or
    /// does not yet exist.
    pub fn append_record(path: &Path, record: &Record) -> Result<(), ExportError> {
        ensure_parent_dir(path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", HEADER)?;
        }
        record.write_to(&mut file)?;
        Ok(())
    }

    /// Whether an existing row's configuration columns already match `record`
    /// within a relative tolerance.
    pub fn matching_run_exists(path: &Path, record: &Record) -> Result<bool, ExportError> {
        if !path.exists() {
            return Ok(false);
        }
        let wanted = record.configuration_columns();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(File::open(path)?);
        for row in reader.records() {
            let row = row?;
            let matches = wanted.iter().enumerate().all(|(index, &expected)| {
                row.get(index)
                    .and_then(|field| field.parse::<f64>().ok())
                    .map(|actual| approximately_equal(actual, expected))
                    .unwrap_or(false)
            });
            if matches {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn approximately_equal(a: f64, b: f64) -> bool {
        (a - b).abs() <= MATCH_TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }
}

pub mod series {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::{ensure_parent_dir, ExportError};

    const HEADER: &str = "elapsed_days,removed_fraction";
    const SECONDS_PER_DAY: f64 = 86_400.0;

    /// Write the removal-fraction series as a two-column CSV, elapsed time in
    /// days. The two slices are parallel; one row per epoch.
    pub fn write_series(
        path: &Path,
        elapsed_s: &[f64],
        removed_fraction: &[f64],
    ) -> Result<(), ExportError> {
        ensure_parent_dir(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", HEADER)?;
        for (seconds, fraction) in elapsed_s.iter().zip(removed_fraction) {
            writeln!(writer, "{:.9},{:.9}", seconds / SECONDS_PER_DAY, fraction)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Per-epoch sample used in the JSON sidecar.
    #[derive(Debug, Clone, Serialize)]
    pub struct Sample {
        pub elapsed_days: f64,
        pub removed_fraction: f64,
    }

    /// Headline numbers describing one finished run.
    #[derive(Debug, Serialize)]
    pub struct RunSummary<'a> {
        pub fragment_tag: &'a str,
        pub fragment_count: usize,
        pub fragments_removed: usize,
        pub shots_fired: usize,
        pub time_required_days: f64,
        pub fraction_removed: f64,
    }

    #[derive(Serialize)]
    struct Sidecar<'a> {
        fragment_tag: &'a str,
        fragment_count: usize,
        fragments_removed: usize,
        shots_fired: usize,
        time_required_days: f64,
        fraction_removed: f64,
        samples: Vec<Sample>,
    }

    /// Write a JSON sidecar bundling the run summary with the full series.
    pub fn write_sidecar(
        path: &Path,
        summary: &RunSummary<'_>,
        elapsed_s: &[f64],
        removed_fraction: &[f64],
    ) -> Result<(), ExportError> {
        ensure_parent_dir(path)?;
        let samples = elapsed_s
            .iter()
            .zip(removed_fraction)
            .map(|(&seconds, &fraction)| Sample {
                elapsed_days: seconds / SECONDS_PER_DAY,
                removed_fraction: fraction,
            })
            .collect();
        let sidecar = Sidecar {
            fragment_tag: summary.fragment_tag,
            fragment_count: summary.fragment_count,
            fragments_removed: summary.fragments_removed,
            shots_fired: summary.shots_fired,
            time_required_days: summary.time_required_days,
            fraction_removed: summary.fraction_removed,
            samples,
        };
        to_writer_pretty(File::create(path)?, &sidecar)?;
        Ok(())
    }
}
