use analytics::ReportData;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use data_loader::{DataPaths, Dataset, YearBasis};
use report::{ReportWriter, SvgChartBackend, build_figures, render_all};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// ml1m-report - MovieLens 1M exploratory report
#[derive(Parser)]
#[command(name = "ml1m-report")]
#[command(about = "Render eleven exploratory charts of the MovieLens 1M dataset", long_about = None)]
struct Cli {
    /// Path to ratings.dat
    #[arg(long, default_value = "ratings.dat")]
    ratingsfile: PathBuf,

    /// Path to movies.dat
    #[arg(long, default_value = "movies.dat")]
    moviesfile: PathBuf,

    /// Path to users.dat
    #[arg(long, default_value = "users.dat")]
    usersfile: PathBuf,

    /// Where to write the PDF report
    #[arg(short, long, default_value = "ML1M-report.pdf")]
    output: PathBuf,

    /// Also write the aggregation results as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Derive rating years in UTC instead of local time
    #[arg(long)]
    utc: bool,
}

impl Cli {
    fn data_paths(&self) -> DataPaths {
        DataPaths {
            ratings: self.ratingsfile.clone(),
            movies: self.moviesfile.clone(),
            users: self.usersfile.clone(),
        }
    }

    fn year_basis(&self) -> YearBasis {
        if self.utc { YearBasis::Utc } else { YearBasis::Local }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

/// Load, aggregate, render and write. Nothing is written unless every
/// stage before it succeeded.
fn run(cli: &Cli) -> Result<()> {
    debug!("Input files: {:?}, year basis {:?}", cli.data_paths(), cli.year_basis());
    let total = Instant::now();

    // Load
    let start = Instant::now();
    let dataset = Dataset::load_from_files(&cli.data_paths(), cli.year_basis())
        .context("Failed to load MovieLens dataset")?;
    let (users, movies, ratings) = dataset.counts();
    println!(
        "{} Loaded {} users, {} movies, {} ratings in {:?}",
        "✓".green(),
        users,
        movies,
        ratings,
        start.elapsed()
    );

    // Join and aggregate
    let start = Instant::now();
    let data = ReportData::from_dataset(&dataset);
    println!("{} Computed aggregations in {:?}", "✓".green(), start.elapsed());
    if data.dropped_ratings > 0 {
        println!(
            "{} {} ratings dropped (unknown movie or user)",
            "!".yellow(),
            data.dropped_ratings
        );
    }

    // Render
    let start = Instant::now();
    let specs = build_figures(&data);
    let charts = render_all(&specs, &SvgChartBackend::new()).context("Failed to render charts")?;
    println!("{} Rendered {} charts in {:?}", "✓".green(), charts.len(), start.elapsed());

    // Write
    ReportWriter::new()
        .write(&charts, &cli.output)
        .context("Failed to write report")?;
    println!(
        "{} Report written to {} ({:?} total)",
        "✓".green(),
        cli.output.display().to_string().bold(),
        total.elapsed()
    );

    if let Some(path) = &cli.summary_json {
        let json = data.to_json().context("Failed to serialize aggregation summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("{} Wrote summary to {}", "✓".green(), path.display());
    }

    Ok(())
}
