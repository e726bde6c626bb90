use super::state::AppState;
use crate::model::{
    validate_airport_code, MetarReportService, ValidationError, WeatherReport, WeatherReportBody,
};
use axum::extract::{RawQuery, State};
use axum::{routing, Router};
use utoipa::{IntoParams, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(serve_weather_report),
    components(schemas(WeatherReportBody)),
    tags((name = "weather", description = "Plain-English METAR weather reports"))
)]
pub struct WeatherApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route("/", routing::get(serve_weather_report))
}

#[derive(Debug, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherParams {
    /// ICAO airport code, 3-4 letters or digits (e.g. KJFK, EGLL, YSSY).
    #[param(example = "KJFK")]
    pub airport: Option<String>,
}

impl WeatherParams {
    /// Reads the first `airport` value; repeated keys and unrelated parameters are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let airport = query.and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "airport")
                .map(|(_, value)| value.into_owned())
        });

        Self { airport }
    }
}

#[utoipa::path(
    get,
    path = "/weather",
    context_path = "/api",
    tag = "weather",
    params(WeatherParams),
    responses(
        (status = 200, description = "Raw METAR and its plain-English summary", body = WeatherReportBody),
        (status = 400, description = "Airport code missing or malformed", body = WeatherReportBody),
        (status = 404, description = "METAR could not be retrieved or decoded", body = WeatherReportBody),
    ),
)]
#[axum::debug_handler(state = AppState)]
#[tracing::instrument(level = "debug", skip(report_service))]
async fn serve_weather_report(
    State(report_service): State<MetarReportService>, RawQuery(query): RawQuery,
) -> Result<WeatherReport, ValidationError> {
    let params = WeatherParams::from_query(query.as_deref());
    let airport_code = validate_airport_code(params.airport.as_deref()).map_err(|error| {
        let kind: &'static str = (&error).into();
        tracing::info!(%error, rejection=%kind, "rejected airport code");
        error
    })?;

    Ok(report_service.weather_report(&airport_code).await)
}
