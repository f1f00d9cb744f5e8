use std::path::{Path, PathBuf};

use crate::catalog::ImageCatalog;
use crate::error::{ExtractionError, Result};
use crate::extractors::job::{ExtractionJob, JobReport};
use crate::models::{Aggregation, MonthlyPeriods, Pollutant, Region};
use crate::utils::constants::MONTHLY_SCALE_M;
use crate::utils::progress::ProgressReporter;

/// Monthly composites for a single fixed region, processed sequentially.
pub struct MonthlyExtractor<'a> {
    catalog: &'a dyn ImageCatalog,
    data_dir: PathBuf,
}

impl<'a> MonthlyExtractor<'a> {
    pub fn new(catalog: &'a dyn ImageCatalog, data_dir: &Path) -> Self {
        Self {
            catalog,
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn run(
        &self,
        pollutant: Pollutant,
        region: &Region,
        periods: MonthlyPeriods,
        progress: Option<&ProgressReporter>,
    ) -> Result<JobReport> {
        let job = ExtractionJob::new(
            self.catalog,
            pollutant,
            Aggregation::Monthly,
            &self.data_dir,
            MONTHLY_SCALE_M,
            MONTHLY_SCALE_M,
        );
        job.run(region, periods, progress)
            .map_err(|e| ExtractionError::in_job(&region.name, e))
    }
}
