use super::errors::ApiError;
use crate::model::MetarReportService;
use crate::services::{AviationWeatherApi, OpenAiMetarDecoder};
use crate::Settings;
use axum::extract::FromRef;
use std::fmt;
use std::sync::Arc;

#[tracing::instrument(level = "trace", skip(settings))]
pub fn initialize_app_state(settings: &Settings) -> Result<AppState, ApiError> {
    let metar_api = AviationWeatherApi::from_settings(&settings.aviation_weather)?;
    let decoder = OpenAiMetarDecoder::from_settings(&settings.decoder)?;
    let report_service = MetarReportService::new(Arc::new(metar_api), Arc::new(decoder));
    Ok(AppState { report_service })
}

#[derive(Clone)]
pub struct AppState {
    pub report_service: MetarReportService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish()
    }
}

impl FromRef<AppState> for MetarReportService {
    fn from_ref(app: &AppState) -> Self {
        app.report_service.clone()
    }
}
