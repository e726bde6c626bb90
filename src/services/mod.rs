mod aviation_weather;
mod decoder;

pub use aviation_weather::{AviationWeatherApi, AviationWeatherError, MetarApi};
pub use decoder::{fallback_summary, DecoderError, MetarDecoder, OpenAiMetarDecoder};

use url::Url;

fn log_response(label: &str, endpoint: &Url, response: &reqwest::Response) {
    const MESSAGE: &str = "response recd from upstream";
    let status = response.status();
    if status.is_success() || status.is_informational() {
        tracing::debug!(%endpoint, ?status, "{label}: {MESSAGE}");
    } else {
        tracing::warn!(%endpoint, ?status, "{label}: {MESSAGE}");
    }
}
