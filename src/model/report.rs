use super::{AirportCode, ValidationError};
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;
use thiserror::Error;
use utoipa::ToSchema;

/// The outcome of one fetch-then-decode pipeline run. A report is never partially populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherReport {
    Decoded {
        airport_code: AirportCode,
        raw_metar: String,
        summary: String,
    },
    Failed {
        airport_code: AirportCode,
        failure: ReportFailure,
    },
}

impl WeatherReport {
    pub fn airport_code(&self) -> &AirportCode {
        match self {
            Self::Decoded { airport_code, .. } | Self::Failed { airport_code, .. } => airport_code,
        }
    }

    pub const fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }

    pub const fn failure(&self) -> Option<&ReportFailure> {
        match self {
            Self::Decoded { .. } => None,
            Self::Failed { failure, .. } => Some(failure),
        }
    }
}

/// Pipeline failures classified for the caller. Display renders the client-facing message, which
/// never carries upstream diagnostics; only `DecodeFailure` echoes the fetched METAR so the caller
/// keeps the raw observation.
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReportFailure {
    #[error("Could not reach the aviation weather service. Please try again later.")]
    WeatherSourceUnavailable,

    #[error(
        "No METAR data found for airport code '{airport_code}'. Please verify this is a valid ICAO \
         code (4 letters, e.g. KJFK, EGLL, YSSY)."
    )]
    NoDataFound { airport_code: AirportCode },

    #[error("Retrieved the METAR but could not decode it. Raw data: {raw_metar}")]
    DecodeFailure { raw_metar: String },
}

/// Wire form of a weather report. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReportBody {
    #[schema(example = "KJFK")]
    pub airport_code: String,

    #[schema(example = "KJFK 191551Z 27015KT 10SM FEW055 BKN250 12/M01 A2992 RMK AO2")]
    pub raw_metar: Option<String>,

    pub friendly_report: Option<String>,

    pub error: Option<String>,
}

impl WeatherReportBody {
    pub fn error(airport_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            airport_code: airport_code.into(),
            raw_metar: None,
            friendly_report: None,
            error: Some(message.into()),
        }
    }
}

impl From<WeatherReport> for WeatherReportBody {
    fn from(report: WeatherReport) -> Self {
        match report {
            WeatherReport::Decoded { airport_code, raw_metar, summary } => Self {
                airport_code: airport_code.into(),
                raw_metar: Some(raw_metar),
                friendly_report: Some(summary),
                error: None,
            },
            WeatherReport::Failed { airport_code, failure } => {
                Self::error(airport_code, failure.to_string())
            },
        }
    }
}

impl From<ValidationError> for WeatherReportBody {
    fn from(error: ValidationError) -> Self {
        Self::error(error.attempted_code(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const KJFK_RAW: &str = "KJFK 191551Z 27015KT 10SM FEW055 BKN250 12/M01 A2992 RMK AO2";

    fn code(raw: &str) -> AirportCode {
        AirportCode::parse(raw).unwrap()
    }

    #[test]
    fn test_decoded_body_has_no_error() {
        let report = WeatherReport::Decoded {
            airport_code: code("KJFK"),
            raw_metar: KJFK_RAW.to_string(),
            summary: "Cool and breezy at JFK.".to_string(),
        };
        assert!(report.is_decoded());
        assert_eq!(report.failure(), None);

        let body = serde_json::to_value(WeatherReportBody::from(report)).unwrap();
        assert_eq!(
            body,
            json!({
                "airportCode": "KJFK",
                "rawMetar": KJFK_RAW,
                "friendlyReport": "Cool and breezy at JFK.",
                "error": null,
            })
        );
    }

    #[test]
    fn test_failed_body_carries_only_error() {
        let report = WeatherReport::Failed {
            airport_code: code("XXXX"),
            failure: ReportFailure::NoDataFound { airport_code: code("XXXX") },
        };
        assert!(!report.is_decoded());
        assert_eq!(report.airport_code().as_str(), "XXXX");

        let body = serde_json::to_value(WeatherReportBody::from(report)).unwrap();
        assert_eq!(
            body,
            json!({
                "airportCode": "XXXX",
                "rawMetar": null,
                "friendlyReport": null,
                "error": "No METAR data found for airport code 'XXXX'. Please verify this is a valid \
                          ICAO code (4 letters, e.g. KJFK, EGLL, YSSY).",
            })
        );
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        let unavailable = ReportFailure::WeatherSourceUnavailable.to_string();
        let no_data = ReportFailure::NoDataFound { airport_code: code("ZZZZ") }.to_string();
        assert!(unavailable.contains("aviation weather service"));
        assert!(no_data.contains("No METAR data found"));
        assert!(!unavailable.contains("No METAR data found"));
        assert!(!no_data.contains("aviation weather service"));
    }

    #[test]
    fn test_decode_failure_echoes_raw_metar() {
        let failure = ReportFailure::DecodeFailure { raw_metar: KJFK_RAW.to_string() };
        assert!(failure.to_string().ends_with(KJFK_RAW));
        let kind: &'static str = (&failure).into();
        assert_eq!(kind, "decode_failure");
    }

    #[test]
    fn test_validation_body_echoes_attempt() {
        let body = WeatherReportBody::from(ValidationError::InvalidFormat {
            attempted: "KJFKX".to_string(),
        });
        assert_eq!(body.airport_code, "KJFKX");
        assert_eq!(body.raw_metar, None);
        assert_eq!(body.friendly_report, None);
        assert!(body.error.unwrap().contains("Invalid airport code format"));
    }
}
