use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a removal-fraction curve from a campaign series CSV"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/removal.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let samples = read_samples(&cli.input)?;
    if samples.is_empty() {
        return Err(anyhow::anyhow!("No samples in the provided CSV"));
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_days = samples
        .iter()
        .map(|&(days, _)| days)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-6);
    let max_percent = samples
        .iter()
        .map(|&(_, fraction)| fraction * 100.0)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Removal progress", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0..max_days, 0.0..max_percent)?;

    chart
        .configure_mesh()
        .x_desc("Elapsed (days)")
        .y_desc("Removed (%)")
        .label_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples
            .iter()
            .map(|&(days, fraction)| (days, fraction * 100.0)),
        &RED,
    ))?;

    root.present()?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}

fn read_samples(path: &str) -> anyhow::Result<Vec<(f64, f64)>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut samples = Vec::new();
    for row in reader.records() {
        let row = row?;
        let days: f64 = row
            .get(0)
            .ok_or_else(|| anyhow::anyhow!("Missing elapsed_days column"))?
            .parse()?;
        let fraction: f64 = row
            .get(1)
            .ok_or_else(|| anyhow::anyhow!("Missing removed_fraction column"))?
            .parse()?;
        samples.push((days, fraction));
    }
    Ok(samples)
}
