use super::{AirportCode, ReportFailure, WeatherReport};
use crate::services::{MetarApi, MetarDecoder};
use std::fmt;
use std::sync::Arc;

/// Runs the fetch-then-decode pipeline for one airport and classifies every outcome into a
/// [`WeatherReport`]. Each stage is attempted once; the first failure ends the run.
#[derive(Clone)]
pub struct MetarReportService {
    metar_api: Arc<dyn MetarApi>,
    decoder: Arc<dyn MetarDecoder>,
}

impl fmt::Debug for MetarReportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetarReportService").finish()
    }
}

impl MetarReportService {
    pub fn new(metar_api: Arc<dyn MetarApi>, decoder: Arc<dyn MetarDecoder>) -> Self {
        Self { metar_api, decoder }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn weather_report(&self, airport_code: &AirportCode) -> WeatherReport {
        let raw_metar = match self.metar_api.latest_metar(airport_code).await {
            Ok(body) => body.trim().to_string(),
            Err(error) => {
                tracing::error!(%airport_code, %error, "failed to fetch METAR");
                return Self::failed(airport_code, ReportFailure::WeatherSourceUnavailable);
            },
        };

        if raw_metar.is_empty() {
            tracing::info!(%airport_code, "no METAR reported for airport");
            return Self::failed(
                airport_code,
                ReportFailure::NoDataFound { airport_code: airport_code.clone() },
            );
        }

        match self.decoder.decode(&raw_metar).await {
            Ok(summary) => {
                tracing::debug!(%airport_code, %raw_metar, "decoded METAR");
                WeatherReport::Decoded {
                    airport_code: airport_code.clone(),
                    raw_metar,
                    summary,
                }
            },
            Err(error) => {
                tracing::error!(%airport_code, %raw_metar, %error, "failed to decode METAR");
                Self::failed(airport_code, ReportFailure::DecodeFailure { raw_metar })
            },
        }
    }

    fn failed(airport_code: &AirportCode, failure: ReportFailure) -> WeatherReport {
        let kind: &'static str = (&failure).into();
        tracing::debug!(%airport_code, failure=%kind, "weather report failed");
        WeatherReport::Failed { airport_code: airport_code.clone(), failure }
    }
}
