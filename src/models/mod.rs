pub mod period;
pub mod pollutant;
pub mod region;

pub use period::{Aggregation, FortnightlyPeriods, MonthlyPeriods, Period};
pub use pollutant::Pollutant;
pub use region::{discover_regions, Region};
