use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Unsupported pollutant '{name}' (expected one of SO2, HCHO, NO2, CO, O3)")]
    UnsupportedPollutant { name: String },

    #[error("Invalid region file: {0}")]
    InvalidRegion(String),

    #[error("Catalog request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid composite request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Extraction failed for region {region}: {source}")]
    Job {
        region: String,
        #[source]
        source: Box<ExtractionError>,
    },
}

impl ExtractionError {
    /// Wrap an error with the region whose job it terminated.
    pub fn in_job(region: &str, source: ExtractionError) -> Self {
        ExtractionError::Job {
            region: region.to_string(),
            source: Box::new(source),
        }
    }
}
