use crate::model::{ValidationError, WeatherReport, WeatherReportBody};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Every pipeline outcome is anticipated, so a report is either 200 (decoded) or 404 (any
/// classified failure); there is no internal-error path.
pub const fn report_status(report: &WeatherReport) -> StatusCode {
    match report {
        WeatherReport::Decoded { .. } => StatusCode::OK,
        WeatherReport::Failed { .. } => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for WeatherReport {
    fn into_response(self) -> Response {
        let status = report_status(&self);
        (status, Json(WeatherReportBody::from(self))).into_response()
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(WeatherReportBody::from(self))).into_response()
    }
}
