pub mod catalog;
pub mod cli;
pub mod error;
pub mod extractors;
pub mod models;
pub mod utils;

pub use error::{ExtractionError, Result};
