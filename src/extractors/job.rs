use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::catalog::{ImageCatalog, QueryRequest, RegionHandle};
use crate::error::Result;
use crate::models::{Aggregation, Period, Pollutant, Region};
use crate::utils::constants::{CLOUD_FRACTION_BAND, MAX_CLOUD_FRACTION};
use crate::utils::progress::ProgressReporter;
use crate::utils::{expected_csv_path, expected_tif_path, is_period_complete};

/// Outcome of one (pollutant, region) extraction job.
#[derive(Debug, Clone, Default)]
pub struct JobReport {
    pub region: String,
    pub processed: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// One (pollutant, region) extraction: the sequential period loop.
///
/// Periods run strictly in order so each skip-check observes the files
/// written by earlier periods of the same job. Completed periods are
/// detected by the existence of their zonal CSV and skipped without
/// touching the catalog service, which makes re-runs incremental.
pub struct ExtractionJob<'a> {
    catalog: &'a dyn ImageCatalog,
    pollutant: Pollutant,
    aggregation: Aggregation,
    data_dir: PathBuf,
    csv_scale_m: u32,
    tif_scale_m: u32,
}

impl<'a> ExtractionJob<'a> {
    pub fn new(
        catalog: &'a dyn ImageCatalog,
        pollutant: Pollutant,
        aggregation: Aggregation,
        data_dir: &Path,
        csv_scale_m: u32,
        tif_scale_m: u32,
    ) -> Self {
        Self {
            catalog,
            pollutant,
            aggregation,
            data_dir: data_dir.to_path_buf(),
            csv_scale_m,
            tif_scale_m,
        }
    }

    pub fn run(
        &self,
        region: &Region,
        periods: impl Iterator<Item = Period>,
        progress: Option<&ProgressReporter>,
    ) -> Result<JobReport> {
        let started = Instant::now();
        let handle = self.catalog.load_region(&region.boundary_file)?;
        let mut report = JobReport {
            region: region.name.clone(),
            ..Default::default()
        };

        for period in periods {
            let csv_path = expected_csv_path(
                &self.data_dir,
                &region.name,
                self.aggregation,
                self.pollutant,
                period.start,
            );
            if is_period_complete(&csv_path) {
                debug!(region = %region.name, %period, "period already extracted, skipping");
                report.skipped += 1;
            } else {
                info!(region = %region.name, %period, pollutant = %self.pollutant, "extracting period");
                self.extract_period(&handle, region, period, &csv_path)?;
                report.processed += 1;
            }
            if let Some(p) = progress {
                p.increment(1);
            }
        }

        report.elapsed = started.elapsed();
        Ok(report)
    }

    fn extract_period(
        &self,
        handle: &RegionHandle,
        region: &Region,
        period: Period,
        csv_path: &Path,
    ) -> Result<()> {
        let request = QueryRequest {
            collection: self.pollutant.collection_id(),
            bands: vec![
                self.pollutant.band().to_string(),
                CLOUD_FRACTION_BAND.to_string(),
            ],
            start: period.start,
            end: period.end,
        };

        let granules = self.catalog.query(&request, handle)?;
        let cloud_free = self
            .catalog
            .mask_clouds(&granules, CLOUD_FRACTION_BAND, MAX_CLOUD_FRACTION)?;
        let clipped = self.catalog.clip(&cloud_free, handle)?;
        debug!(
            region = %region.name,
            %period,
            total = granules.granule_count,
            cloud_free = cloud_free.granule_count,
            "compositing granules"
        );

        // An empty set composites to a no-data raster; exported as-is.
        let composite = self.catalog.composite_median(&clipped)?;
        self.catalog
            .export_zonal_mean(&composite, handle, self.csv_scale_m, csv_path)?;

        let tif_path = expected_tif_path(
            &self.data_dir,
            &region.name,
            self.aggregation,
            self.pollutant,
            period.start,
        );
        self.catalog
            .export_raster(&composite, handle, self.tif_scale_m, &tif_path)?;
        Ok(())
    }
}
