use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::models::{Aggregation, Pollutant};
use crate::utils::constants::{CSV_DIR_SUFFIX, TIF_DIR_SUFFIX};

/// Expected zonal-mean CSV path for one (region, pollutant, period) triple.
///
/// This is the single source of truth for output naming: the export writer
/// and the resume skip-check both call it, so the two can never drift.
/// Existence of this file is the sole completion marker for a period.
pub fn expected_csv_path(
    data_dir: &Path,
    region_name: &str,
    aggregation: Aggregation,
    pollutant: Pollutant,
    period_start: NaiveDate,
) -> PathBuf {
    data_dir
        .join(format!("{}{}", pollutant.code(), CSV_DIR_SUFFIX))
        .join(artifact_name(region_name, aggregation, pollutant, period_start, "csv"))
}

/// Expected clipped-raster path for one (region, pollutant, period) triple.
pub fn expected_tif_path(
    data_dir: &Path,
    region_name: &str,
    aggregation: Aggregation,
    pollutant: Pollutant,
    period_start: NaiveDate,
) -> PathBuf {
    data_dir
        .join(format!("{}{}", pollutant.code(), TIF_DIR_SUFFIX))
        .join(artifact_name(region_name, aggregation, pollutant, period_start, "tif"))
}

fn artifact_name(
    region_name: &str,
    aggregation: Aggregation,
    pollutant: Pollutant,
    period_start: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        region_name,
        aggregation.label(),
        pollutant,
        period_start.format("%Y-%m-%d"),
        extension
    )
}

/// Parse an artifact stem `<region>_<label>_<pollutant>_<YYYY-MM-DD>` back
/// into (region, label, period start). Region names may themselves contain
/// underscores, so the stem is split from the right.
pub fn parse_artifact_stem(stem: &str) -> Option<(String, String, NaiveDate)> {
    let mut parts = stem.rsplitn(4, '_');
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let _pollutant = parts.next()?;
    let label = parts.next()?;
    let region = parts.next()?;
    Some((region.to_string(), label.to_string(), date))
}

/// Whether a period's summary table is already on disk.
///
/// A missing output directory reads as "not present", never an error.
pub fn is_period_complete(csv_path: &Path) -> bool {
    csv_path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, 16).unwrap()
    }

    #[test]
    fn test_csv_path_layout() {
        let path = expected_csv_path(
            Path::new("data"),
            "bangalore",
            Aggregation::Fortnightly,
            Pollutant::No2,
            start(),
        );
        assert_eq!(
            path,
            Path::new("data/NO2_csvs/bangalore_15dayavg_no2_2023-02-16.csv")
        );
    }

    #[test]
    fn test_tif_path_layout() {
        let path = expected_tif_path(
            Path::new("data"),
            "india_grid",
            Aggregation::Monthly,
            Pollutant::So2,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        assert_eq!(
            path,
            Path::new("data/SO2_tifs/india_grid_monthlyavg_so2_2023-01-01.tif")
        );
    }

    #[test]
    fn test_parse_artifact_stem_round_trip() {
        let parsed = parse_artifact_stem("india_grid_monthlyavg_no2_2023-01-01").unwrap();
        assert_eq!(parsed.0, "india_grid");
        assert_eq!(parsed.1, "monthlyavg");
        assert_eq!(parsed.2, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());

        assert!(parse_artifact_stem("not-an-artifact").is_none());
        assert!(parse_artifact_stem("a_b_c_2023-13-40").is_none());
    }

    #[test]
    fn test_missing_directory_reads_as_incomplete() {
        let path = expected_csv_path(
            Path::new("/nonexistent"),
            "delhi",
            Aggregation::Monthly,
            Pollutant::O3,
            start(),
        );
        assert!(!is_period_complete(&path));
    }

    #[test]
    fn test_existing_csv_reads_as_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = expected_csv_path(
            dir.path(),
            "delhi",
            Aggregation::Monthly,
            Pollutant::O3,
            start(),
        );
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"zone,mean\n").unwrap();
        assert!(is_period_complete(&path));
    }
}
