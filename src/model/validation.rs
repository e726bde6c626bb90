use super::AirportCode;
use strum_macros::IntoStaticStr;
use thiserror::Error;

const MIN_CODE_LEN: usize = 3;
const MAX_CODE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValidationError {
    #[error("Airport code is required.")]
    MissingParameter,

    #[error("Invalid airport code format. Use a 3-4 character ICAO code like KJFK or EGLL.")]
    InvalidFormat { attempted: String },
}

impl ValidationError {
    /// The identifier echoed back to the caller: empty when nothing usable was supplied,
    /// otherwise the trimmed, uppercased attempt.
    pub fn attempted_code(&self) -> &str {
        match self {
            Self::MissingParameter => "",
            Self::InvalidFormat { attempted } => attempted.as_str(),
        }
    }
}

/// Normalizes a raw airport code parameter, rejecting it before any network call is made.
pub fn validate_airport_code(raw: Option<&str>) -> Result<AirportCode, ValidationError> {
    let trimmed = raw
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or(ValidationError::MissingParameter)?;

    let normalized = trimmed.to_uppercase();
    if is_icao_format(&normalized) {
        Ok(AirportCode(normalized))
    } else {
        Err(ValidationError::InvalidFormat { attempted: normalized })
    }
}

fn is_icao_format(code: &str) -> bool {
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.chars().count())
        && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
