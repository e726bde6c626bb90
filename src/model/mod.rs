mod report;
pub mod service;
mod validation;

pub use report::{ReportFailure, WeatherReport, WeatherReportBody};
pub use service::MetarReportService;
pub use validation::{validate_airport_code, ValidationError};

use serde::Serialize;
use utoipa::ToSchema;

/// A normalized ICAO-style station identifier: 3 to 4 uppercase ASCII letters or digits.
///
/// Only [`validate_airport_code`] constructs one, so holding an `AirportCode` means the
/// identifier is already trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize)]
#[schema(example = json!("KJFK"))]
#[serde(transparent)]
#[repr(transparent)]
pub struct AirportCode(String);

impl AirportCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validate_airport_code(Some(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for AirportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AirportCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.0
    }
}
