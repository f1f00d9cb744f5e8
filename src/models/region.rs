use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::utils::constants::REGION_FILE_PREFIX;

/// A geographic region of interest backed by a vector boundary file.
///
/// The geometry itself is resolved server-side by the catalog service; the
/// core only carries the file path and the name derived from it, which keys
/// every output filename for the region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub boundary_file: PathBuf,
}

impl Region {
    /// Build a region from a shapefile path, deriving the name from the
    /// file stem. A `grids_` tiling prefix is stripped when present.
    pub fn from_vector_file(path: &Path) -> Result<Self> {
        if path.extension().and_then(|e| e.to_str()) != Some("shp") {
            return Err(ExtractionError::InvalidRegion(format!(
                "{} is not a shapefile",
                path.display()
            )));
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ExtractionError::InvalidRegion(format!(
                    "{} has no usable file name",
                    path.display()
                ))
            })?;
        let name = stem.strip_prefix(REGION_FILE_PREFIX).unwrap_or(stem);
        if name.is_empty() {
            return Err(ExtractionError::InvalidRegion(format!(
                "{} yields an empty region name",
                path.display()
            )));
        }
        Ok(Self {
            name: name.to_string(),
            boundary_file: path.to_path_buf(),
        })
    }
}

/// Enumerate all shapefile regions in a directory, in sorted order.
pub fn discover_regions(dir: &Path) -> Result<Vec<Region>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("shp"))
        .collect();
    paths.sort();
    paths.iter().map(|p| Region::from_vector_file(p)).collect()
}
