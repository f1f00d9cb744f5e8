use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use tracing::Level;

use crate::catalog::{RestCatalog, ServiceSession};
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::extractors::{FortnightExtractor, JobReport, MonthlyExtractor};
use crate::models::{discover_regions, FortnightlyPeriods, MonthlyPeriods, Pollutant, Region};
use crate::utils::constants::{CSV_DIR_SUFFIX, TIF_DIR_SUFFIX};
use crate::utils::parse_artifact_stem;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    // The catalog client and the period loops are synchronous; keep them off
    // the async worker so the blocking HTTP calls cannot stall the runtime.
    tokio::task::block_in_place(|| execute(cli))
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Monthly {
            pollutant,
            year,
            region,
            data_dir,
            in_progress_year,
        } => {
            let region = Region::from_vector_file(&region)?;
            ensure_output_dirs(&data_dir, pollutant)?;

            println!("Extracting monthly {} composites", pollutant.code());
            println!("Region: {}", region.name);
            println!("Year: {}", year);

            let in_progress = in_progress_year.unwrap_or_else(|| Local::now().year());
            let periods = MonthlyPeriods::new(year).with_in_progress_year(in_progress);
            let total = periods.clone().count() as u64;

            let session = ServiceSession::from_key_file(&cli.credentials)?;
            let catalog = RestCatalog::connect(&cli.service_url, &session)?;

            let progress = ProgressReporter::new(total, "Extracting periods...", false);
            let extractor = MonthlyExtractor::new(&catalog, &data_dir);
            let report = extractor.run(pollutant, &region, periods, Some(&progress))?;
            progress.finish_with_message("Extraction complete");

            print_report(&report);
        }

        Commands::Fortnightly {
            pollutant,
            year,
            regions_dir,
            data_dir,
            max_workers,
            min_month,
            max_month,
            in_progress_year,
        } => {
            let regions = discover_regions(&regions_dir)?;
            if regions.is_empty() {
                println!("No shapefiles found in {}", regions_dir.display());
                return Ok(());
            }
            ensure_output_dirs(&data_dir, pollutant)?;

            println!("Extracting fortnightly {} composites", pollutant.code());
            println!("Regions: {}", regions.len());
            println!("Year: {}, workers: {}", year, max_workers);

            let in_progress = in_progress_year.unwrap_or_else(|| Local::now().year());
            let default_max = if year == in_progress { 1 } else { 12 };
            let periods = FortnightlyPeriods::new(year, min_month, max_month.unwrap_or(default_max));

            let session = ServiceSession::from_key_file(&cli.credentials)?;
            let catalog = RestCatalog::connect(&cli.service_url, &session)?;

            let progress =
                ProgressReporter::new(regions.len() as u64, "Extracting regions...", false);
            let extractor = FortnightExtractor::new(&catalog, &data_dir, max_workers);
            let results = extractor.run_all(pollutant, &regions, &periods, Some(&progress))?;
            progress.finish_with_message("Extraction complete");

            let mut failures = 0;
            for result in &results {
                match result {
                    Ok(report) => print_report(report),
                    Err(e) => {
                        failures += 1;
                        eprintln!("  FAILED: {}", e);
                    }
                }
            }
            if failures > 0 {
                println!(
                    "{} of {} regions failed; re-run to resume their remaining periods",
                    failures,
                    results.len()
                );
            }
        }

        Commands::Info {
            pollutant,
            data_dir,
        } => {
            print_export_inventory(&data_dir, pollutant)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_max_level(level).init();
        }
    }
    Ok(())
}

/// Export calls fail on missing directories, so create the pollutant's
/// output pair before any period runs.
fn ensure_output_dirs(data_dir: &Path, pollutant: Pollutant) -> Result<()> {
    std::fs::create_dir_all(data_dir.join(format!("{}{}", pollutant.code(), CSV_DIR_SUFFIX)))?;
    std::fs::create_dir_all(data_dir.join(format!("{}{}", pollutant.code(), TIF_DIR_SUFFIX)))?;
    Ok(())
}

fn print_report(report: &JobReport) {
    println!(
        "  {}: {} extracted, {} skipped ({:.1}s)",
        report.region,
        report.processed,
        report.skipped,
        report.elapsed.as_secs_f64()
    );
}

/// Scan a pollutant's CSV directory and print a per-region period inventory
/// with the exported zonal mean where one is present.
fn print_export_inventory(data_dir: &Path, pollutant: Pollutant) -> Result<()> {
    let csv_dir = data_dir.join(format!("{}{}", pollutant.code(), CSV_DIR_SUFFIX));
    if !csv_dir.is_dir() {
        println!("No exports found ({} does not exist)", csv_dir.display());
        return Ok(());
    }

    type Inventory = BTreeMap<String, Vec<(NaiveDate, String, Option<f64>)>>;
    let mut by_region: Inventory = BTreeMap::new();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&csv_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    paths.sort();

    for path in &paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((region, label, start)) = parse_artifact_stem(stem) else {
            continue;
        };
        let mean = read_zonal_mean(path)?;
        by_region
            .entry(region)
            .or_default()
            .push((start, label, mean));
    }

    if by_region.is_empty() {
        println!("No completed periods for {}", pollutant.code());
        return Ok(());
    }

    println!("Completed {} periods in {}:", pollutant.code(), csv_dir.display());
    for (region, mut periods) in by_region {
        periods.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        println!("  {} ({} periods)", region, periods.len());
        for (start, label, mean) in periods {
            match mean {
                Some(value) => println!("    {} {} mean={:.6e}", start, label, value),
                None => println!("    {} {}", start, label),
            }
        }
    }
    Ok(())
}

/// Pull the MEAN statistic out of an exported zonal table, if the service
/// included one.
fn read_zonal_mean(path: &Path) -> Result<Option<f64>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mean_column = reader
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("mean"));
    let Some(index) = mean_column else {
        return Ok(None);
    };
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(index).and_then(|v| v.parse::<f64>().ok()) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
