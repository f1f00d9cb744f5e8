use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::warn;

use crate::catalog::ImageCatalog;
use crate::error::{ExtractionError, Result};
use crate::extractors::job::{ExtractionJob, JobReport};
use crate::models::{Aggregation, FortnightlyPeriods, Pollutant, Region};
use crate::utils::constants::{FORTNIGHTLY_CSV_SCALE_M, FORTNIGHTLY_TIF_SCALE_M};
use crate::utils::progress::ProgressReporter;

/// Fortnightly composites across many regions, one region per pool worker.
///
/// Workers share no mutable state: each job writes a disjoint filename set
/// keyed by its region name, so the only shared structure is the output
/// directory itself. A region's failure is carried in its own slot of the
/// result vector instead of aborting the whole submission; the failed
/// region recovers on the next run through the resume check.
pub struct FortnightExtractor<'a> {
    catalog: &'a dyn ImageCatalog,
    data_dir: PathBuf,
    max_workers: usize,
}

impl<'a> FortnightExtractor<'a> {
    pub fn new(catalog: &'a dyn ImageCatalog, data_dir: &Path, max_workers: usize) -> Self {
        Self {
            catalog,
            data_dir: data_dir.to_path_buf(),
            max_workers: max_workers.max(1),
        }
    }

    pub fn run_all(
        &self,
        pollutant: Pollutant,
        regions: &[Region],
        periods: &FortnightlyPeriods,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Result<JobReport>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ExtractionError::Config(e.to_string()))?;

        let results: Vec<Result<JobReport>> = pool.install(|| {
            regions
                .par_iter()
                .map(|region| {
                    let job = ExtractionJob::new(
                        self.catalog,
                        pollutant,
                        Aggregation::Fortnightly,
                        &self.data_dir,
                        FORTNIGHTLY_CSV_SCALE_M,
                        FORTNIGHTLY_TIF_SCALE_M,
                    );
                    let result = job
                        .run(region, periods.clone(), None)
                        .map_err(|e| ExtractionError::in_job(&region.name, e));
                    if let Err(ref e) = result {
                        warn!(region = %region.name, error = %e, "region job failed");
                    }
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    result
                })
                .collect()
        });

        Ok(results)
    }
}
