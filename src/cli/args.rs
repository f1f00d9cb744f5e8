use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Pollutant;
use crate::utils::constants::DEFAULT_FORTNIGHTLY_WORKERS;

#[derive(Parser)]
#[command(name = "tropomi-extractor")]
#[command(about = "Incremental Sentinel-5P TROPOMI pollutant composite extractor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = "https://catalog.copernicus-gateway.net",
        help = "Catalog service endpoint"
    )]
    pub service_url: String,

    #[arg(
        long,
        global = true,
        default_value = "service-account.json",
        help = "Service-account credential key file"
    )]
    pub credentials: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract monthly cloud-filtered composites for a single region
    Monthly {
        #[arg(help = "Pollutant to extract (SO2, HCHO, NO2, CO, O3)")]
        pollutant: Pollutant,

        #[arg(help = "Year to extract")]
        year: i32,

        #[arg(short, long, help = "Region boundary shapefile")]
        region: PathBuf,

        #[arg(short, long, default_value = "data", help = "Output data directory")]
        data_dir: PathBuf,

        #[arg(
            long,
            help = "Year the catalog is still publishing; only January is generated for it [default: current year]"
        )]
        in_progress_year: Option<i32>,
    },

    /// Extract fortnightly composites for every region in a directory
    Fortnightly {
        #[arg(help = "Pollutant to extract (SO2, HCHO, NO2, CO, O3)")]
        pollutant: Pollutant,

        #[arg(help = "Year to extract")]
        year: i32,

        #[arg(short, long, help = "Directory of region boundary shapefiles")]
        regions_dir: PathBuf,

        #[arg(short, long, default_value = "data", help = "Output data directory")]
        data_dir: PathBuf,

        #[arg(long, default_value_t = DEFAULT_FORTNIGHTLY_WORKERS)]
        max_workers: usize,

        #[arg(long, default_value = "1", help = "First month to extract (1-12)")]
        min_month: u32,

        #[arg(
            long,
            help = "Last month to extract (1-12) [default: 12, or 1 for the in-progress year]"
        )]
        max_month: Option<u32>,

        #[arg(
            long,
            help = "Year the catalog is still publishing; only January is generated for it [default: current year]"
        )]
        in_progress_year: Option<i32>,
    },

    /// Summarize completed periods from exported zonal tables
    Info {
        #[arg(help = "Pollutant whose outputs to summarize")]
        pollutant: Pollutant,

        #[arg(short, long, default_value = "data", help = "Output data directory")]
        data_dir: PathBuf,
    },
}
