use std::path::PathBuf;

use clap::Parser;
use laser_debris_removal::campaign::{run_campaign, CampaignOutcome, CampaignParams};
use laser_debris_removal::catalog::load_catalog;
use laser_debris_removal::config::{load_runs, RunConfig};
use laser_debris_removal::export::{series, summary};
use laser_debris_removal::kepler::GravityModel;
use laser_debris_removal::{time, units};
use log::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Laser debris-removal campaign simulator"
)]
struct Cli {
    /// Run configuration records (YAML list, TOML file, or TOML directory)
    #[arg(long, default_value = "configs/campaign.yaml")]
    config: PathBuf,

    /// Fragment catalogue CSV
    #[arg(long)]
    catalog: PathBuf,

    /// Results CSV, appended one row per configuration
    #[arg(long, default_value = "results/campaigns.csv")]
    output: PathBuf,

    /// Directory receiving per-run removal series and JSON sidecars
    #[arg(long)]
    series_dir: Option<PathBuf>,

    /// Re-run configurations whose results already exist
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let runs = load_runs(&cli.config)?;
    let records = load_catalog(&cli.catalog)?;
    info!(
        "{} configuration record(s), {} catalogue row(s)",
        runs.len(),
        records.len()
    );

    for (index, run) in runs.iter().enumerate() {
        run.validate()?;
        let mut record = summary_record(run);
        if !cli.force && summary::matching_run_exists(&cli.output, &record)? {
            warn!(
                "run {index} already present in {}, skipping",
                cli.output.display()
            );
            continue;
        }

        let params = campaign_params(run);
        let outcome = run_campaign(&records, &params);

        record.time_required_days = time::seconds_to_days(outcome.time_required);
        record.fraction_removed = outcome.final_fraction();
        summary::append_record(&cli.output, &record)?;

        if let Some(dir) = &cli.series_dir {
            write_series_artifacts(dir, index, run, &outcome)?;
        }

        println!(
            "run {index}: {}/{} fragments removed ({:.2}%) in {:.2} days, {} pulses",
            outcome.fragments_removed,
            outcome.fragments_total,
            outcome.final_fraction() * 100.0,
            time::seconds_to_days(outcome.time_required),
            outcome.shots.len()
        );
    }

    Ok(())
}

fn campaign_params(run: &RunConfig) -> CampaignParams {
    CampaignParams {
        gravity: GravityModel {
            mu: run.mu,
            j2: run.j2,
            equatorial_radius: run.earth_radius,
        },
        fragment_tag: run.fragment_tag.clone(),
        collision_altitude: run.h_collision,
        offset_altitude: run.h_offset,
        max_fragments: run.d_n,
        campaign_start: run.t0,
        target_fraction: run.target_fraction,
        max_dv_step: run.max_dv,
        field_of_view: run.fov,
        range_max: run.range,
        incidence_max: run.incidence_angle,
        ablation_time: run.ablation_time,
        scan_time: run.scan_time,
        cooldown_time: run.cooldown_time,
        fluence: run.fluence,
        coupling: run.cm,
        pulse_rate: run.freq,
        removal_altitude: run.min_perigee,
        time_cap: run.t_max,
        bisect_tol: run.bisect_tol,
        compact_percent: run.filter_percent,
    }
}

fn summary_record(run: &RunConfig) -> summary::Record {
    summary::Record {
        collision_altitude_m: run.h_collision,
        fragment_cap: run.d_n,
        t0_days: time::seconds_to_days(run.t0),
        offset_m: run.h_offset,
        target_fraction: run.target_fraction,
        fov_deg: units::rad_to_deg(run.fov),
        range_m: run.range,
        incidence_deg: units::rad_to_deg(run.incidence_angle),
        ablation_s: run.ablation_time,
        scan_s: run.scan_time,
        cooldown_s: run.cooldown_time,
        fluence_j_m2: run.fluence,
        min_perigee_m: run.min_perigee,
        time_required_days: 0.0,
        fraction_removed: 0.0,
    }
}

fn write_series_artifacts(
    dir: &PathBuf,
    index: usize,
    run: &RunConfig,
    outcome: &CampaignOutcome,
) -> anyhow::Result<()> {
    let stem = format!("run_{index:03}");
    series::write_series(
        &dir.join(format!("{stem}.csv")),
        &outcome.elapsed,
        &outcome.removed_fraction,
    )?;
    series::write_sidecar(
        &dir.join(format!("{stem}.json")),
        &series::RunSummary {
            fragment_tag: &run.fragment_tag,
            fragment_count: outcome.fragments_total,
            fragments_removed: outcome.fragments_removed,
            shots_fired: outcome.shots.len(),
            time_required_days: time::seconds_to_days(outcome.time_required),
            fraction_removed: outcome.final_fraction(),
        },
        &outcome.elapsed,
        &outcome.removed_fraction,
    )?;
    Ok(())
}
