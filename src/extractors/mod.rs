pub mod fortnightly;
pub mod job;
pub mod monthly;

pub use fortnightly::FortnightExtractor;
pub use job::{ExtractionJob, JobReport};
pub use monthly::MonthlyExtractor;
