/// Sentinel-5P offline Level-3 collection prefix; the pollutant code completes the id
pub const COLLECTION_PREFIX: &str = "COPERNICUS/S5P/OFFL/L3_";

/// Auxiliary band carrying per-pixel cloud fraction
pub const CLOUD_FRACTION_BAND: &str = "cloud_fraction";

/// Granules at or above this cloud fraction are excluded from composites
pub const MAX_CLOUD_FRACTION: f64 = 0.1;

/// Aggregation labels encoded in output filenames
pub const LABEL_MONTHLY: &str = "monthlyavg";
pub const LABEL_FORTNIGHTLY: &str = "15dayavg";

/// Output directory suffixes, one pair per pollutant
pub const CSV_DIR_SUFFIX: &str = "_csvs";
pub const TIF_DIR_SUFFIX: &str = "_tifs";

/// Export scales in metres
pub const MONTHLY_SCALE_M: u32 = 11_000;
pub const FORTNIGHTLY_CSV_SCALE_M: u32 = 30;
pub const FORTNIGHTLY_TIF_SCALE_M: u32 = 1_000;

/// Fortnightly fan-out pool size; the monthly variant is sequential
pub const DEFAULT_FORTNIGHTLY_WORKERS: usize = 4;

/// Tiling prefix stripped from shapefile stems when deriving region names
pub const REGION_FILE_PREFIX: &str = "grids_";
