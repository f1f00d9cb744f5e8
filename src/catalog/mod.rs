//! Seam to the remote Earth-observation catalog service.
//!
//! All image processing, statistics, and raster generation happen
//! service-side; the crate only parameterizes requests and streams export
//! bytes to disk. `GranuleSet` and `CompositeHandle` are opaque server-side
//! references, so every trait method is cheap to call from the period loop.

pub mod client;
pub mod session;

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

pub use client::RestCatalog;
pub use session::ServiceSession;

/// Server-side handle to a loaded region boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionHandle {
    pub id: String,
    pub name: String,
}

/// Server-side handle to a filtered granule sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranuleSet {
    pub id: String,
    pub granule_count: u64,
}

/// Server-side handle to a composited raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeHandle {
    pub id: String,
}

/// Parameters of one period's catalog query, validated before it leaves the
/// process.
#[derive(Debug, Clone, Validate, Serialize)]
pub struct QueryRequest {
    #[validate(length(min = 1))]
    pub collection: String,

    #[validate(length(min = 1))]
    pub bands: Vec<String>,

    /// Half-open date range `[start, end)`.
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Operations the extraction core consumes from the catalog service.
pub trait ImageCatalog: Send + Sync {
    /// Resolve a vector boundary file into a server-side region.
    fn load_region(&self, boundary_file: &Path) -> Result<RegionHandle>;

    /// Granules of a collection intersecting the region within a date range,
    /// restricted to the requested bands.
    fn query(&self, request: &QueryRequest, region: &RegionHandle) -> Result<GranuleSet>;

    /// Drop granules whose cloud-band value is not strictly below the cap.
    fn mask_clouds(
        &self,
        granules: &GranuleSet,
        cloud_band: &str,
        max_cloud_fraction: f64,
    ) -> Result<GranuleSet>;

    /// Clip every granule to the region boundary.
    fn clip(&self, granules: &GranuleSet, region: &RegionHandle) -> Result<GranuleSet>;

    /// Per-pixel median composite. An empty granule set composites to an
    /// empty raster; the service's result is accepted as-is.
    fn composite_median(&self, granules: &GranuleSet) -> Result<CompositeHandle>;

    /// Export the MEAN zonal statistic over the region as a CSV table.
    /// The destination directory must already exist.
    fn export_zonal_mean(
        &self,
        composite: &CompositeHandle,
        region: &RegionHandle,
        scale_m: u32,
        destination: &Path,
    ) -> Result<()>;

    /// Export the clipped composite as a GeoTIFF, one file per band.
    /// The destination directory must already exist.
    fn export_raster(
        &self,
        composite: &CompositeHandle,
        region: &RegionHandle,
        scale_m: u32,
        destination: &Path,
    ) -> Result<()>;
}
