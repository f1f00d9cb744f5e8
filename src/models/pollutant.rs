use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::utils::constants::COLLECTION_PREFIX;

/// Trace gases available from the Sentinel-5P TROPOMI L3 catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    So2,
    Hcho,
    No2,
    Co,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 5] = [
        Pollutant::So2,
        Pollutant::Hcho,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Uppercase code as used in collection ids and directory names.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::So2 => "SO2",
            Pollutant::Hcho => "HCHO",
            Pollutant::No2 => "NO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Measurement band selected from the source collection.
    ///
    /// The mapping is total; there is no default band. Unrecognized pollutant
    /// names are rejected at parse time instead.
    pub fn band(&self) -> &'static str {
        match self {
            Pollutant::So2 => "SO2_column_number_density",
            Pollutant::Hcho => "tropospheric_HCHO_column_number_density",
            Pollutant::No2 => "NO2_column_number_density",
            Pollutant::Co => "CO_column_number_density",
            Pollutant::O3 => "O3_column_number_density",
        }
    }

    /// Full catalog collection id, e.g. `COPERNICUS/S5P/OFFL/L3_NO2`.
    pub fn collection_id(&self) -> String {
        format!("{}{}", COLLECTION_PREFIX, self.code())
    }
}

impl fmt::Display for Pollutant {
    /// Lowercase form, as encoded in output filenames.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pollutant::So2 => write!(f, "so2"),
            Pollutant::Hcho => write!(f, "hcho"),
            Pollutant::No2 => write!(f, "no2"),
            Pollutant::Co => write!(f, "co"),
            Pollutant::O3 => write!(f, "o3"),
        }
    }
}

impl FromStr for Pollutant {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SO2" => Ok(Pollutant::So2),
            "HCHO" => Ok(Pollutant::Hcho),
            "NO2" => Ok(Pollutant::No2),
            "CO" => Ok(Pollutant::Co),
            "O3" => Ok(Pollutant::O3),
            _ => Err(ExtractionError::UnsupportedPollutant {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_mapping() {
        assert_eq!(Pollutant::No2.band(), "NO2_column_number_density");
        assert_eq!(Pollutant::So2.band(), "SO2_column_number_density");
        assert_eq!(
            Pollutant::Hcho.band(),
            "tropospheric_HCHO_column_number_density"
        );
        assert_eq!(Pollutant::Co.band(), "CO_column_number_density");
        assert_eq!(Pollutant::O3.band(), "O3_column_number_density");
    }

    #[test]
    fn test_collection_id() {
        assert_eq!(Pollutant::No2.collection_id(), "COPERNICUS/S5P/OFFL/L3_NO2");
        assert_eq!(Pollutant::O3.collection_id(), "COPERNICUS/S5P/OFFL/L3_O3");
    }

    #[test]
    fn test_parse_known_codes() {
        assert_eq!("NO2".parse::<Pollutant>().unwrap(), Pollutant::No2);
        assert_eq!("no2".parse::<Pollutant>().unwrap(), Pollutant::No2);
        assert_eq!("Hcho".parse::<Pollutant>().unwrap(), Pollutant::Hcho);
    }

    #[test]
    fn test_unknown_pollutant_is_rejected() {
        // The upstream pipeline silently mapped anything unknown to the O3
        // band; that produced mislabelled O3 data. Unknown codes must fail.
        let err = "CH4".parse::<Pollutant>().unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedPollutant { ref name } if name == "CH4"
        ));
        assert!("".parse::<Pollutant>().is_err());
        assert!("ozone".parse::<Pollutant>().is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Pollutant::No2.to_string(), "no2");
        assert_eq!(Pollutant::Hcho.to_string(), "hcho");
    }
}
