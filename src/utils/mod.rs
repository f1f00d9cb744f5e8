pub mod constants;
pub mod filename;
pub mod progress;

pub use filename::{expected_csv_path, expected_tif_path, is_period_complete, parse_artifact_stem};
pub use progress::ProgressReporter;
