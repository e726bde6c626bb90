use super::log_response;
use crate::model::AirportCode;
use crate::settings::AviationWeatherSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[async_trait]
pub trait MetarApi: Send + Sync {
    /// Fetches the latest raw METAR for the station. An empty (or blank) body is a valid reply
    /// meaning the station has no current observation.
    async fn latest_metar(&self, airport_code: &AirportCode)
        -> Result<String, AviationWeatherError>;
}

#[derive(Debug, Error)]
pub enum AviationWeatherError {
    #[error("supplied Aviation Weather API url is not a base url to query: {0}")]
    NotABaseUrl(Url),

    #[error("invalid User-Agent for Aviation Weather API: {0}")]
    UserAgent(#[from] InvalidHeaderValue),

    #[error("Aviation Weather API call failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Aviation Weather API responded with status {status}")]
    HttpStatus { status: StatusCode },
}

/// Client for the Aviation Weather Center data API (aviationweather.gov).
#[derive(Debug, Clone)]
pub struct AviationWeatherApi {
    client: reqwest::Client,
    base_url: Url,
}

impl AviationWeatherApi {
    pub fn new(
        base_url: impl Into<Url>, user_agent: HeaderValue, timeout: Duration,
    ) -> Result<Self, AviationWeatherError> {
        let base_url = base_url.into();
        if base_url.cannot_be_a_base() {
            return Err(AviationWeatherError::NotABaseUrl(base_url));
        }

        let client = Self::make_http_client(user_agent, timeout)?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &AviationWeatherSettings) -> Result<Self, AviationWeatherError> {
        let user_agent = HeaderValue::from_str(&settings.user_agent)?;
        Self::new(settings.base_url.clone(), user_agent, settings.timeout)
    }

    fn make_http_client(
        user_agent: HeaderValue, timeout: Duration,
    ) -> Result<reqwest::Client, AviationWeatherError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .default_headers(headers)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .build()?;

        Ok(client)
    }

    fn metar_url(&self, airport_code: &AirportCode) -> Result<Url, AviationWeatherError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AviationWeatherError::NotABaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "data", "metar"]);
        url.query_pairs_mut().append_pair("ids", airport_code.as_str());
        Ok(url)
    }
}

#[async_trait]
impl MetarApi for AviationWeatherApi {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn latest_metar(
        &self, airport_code: &AirportCode,
    ) -> Result<String, AviationWeatherError> {
        const LABEL: &str = "metar";

        let url = self.metar_url(airport_code)?;
        let response = self.client.get(url.clone()).send().await?;
        log_response(LABEL, &url, &response);

        let status = response.status();
        if !status.is_success() {
            return Err(AviationWeatherError::HttpStatus { status });
        }

        let body = response.text().await?;
        tracing::debug!(%body, %url, "{LABEL} response body");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::KJFK_RAW;
    use claims::{assert_err, assert_ok};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AviationWeatherApi {
        let base_url = Url::parse(&server.uri()).unwrap();
        AviationWeatherApi::new(
            base_url,
            HeaderValue::from_static("metar-test"),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn kjfk() -> AirportCode {
        AirportCode::parse("KJFK").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_metar_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/metar"))
            .and(query_param("ids", "KJFK"))
            .and(header("user-agent", "metar-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{KJFK_RAW}\n")))
            .expect(1)
            .mount(&server)
            .await;

        let body = assert_ok!(client_for(&server).latest_metar(&kjfk()).await);
        assert_eq!(body, format!("{KJFK_RAW}\n"));
    }

    #[tokio::test]
    async fn test_empty_body_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/metar"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let body = assert_ok!(client_for(&server).latest_metar(&kjfk()).await);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/metar"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let error = assert_err!(client_for(&server).latest_metar(&kjfk()).await);
        assert!(matches!(
            error,
            AviationWeatherError::HttpStatus { status } if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let base_url = Url::parse(&server.uri()).unwrap();
        let client = AviationWeatherApi::new(
            base_url,
            HeaderValue::from_static("metar-test"),
            Duration::from_millis(100),
        )
        .unwrap();

        let error = assert_err!(client.latest_metar(&kjfk()).await);
        assert!(matches!(error, AviationWeatherError::HttpRequest(_)));
    }

    #[test]
    fn test_metar_url_keeps_base_path() {
        let base_url = Url::parse("https://example.com/proxy/").unwrap();
        let client =
            AviationWeatherApi::new(base_url, HeaderValue::from_static("t"), Duration::from_secs(1))
                .unwrap();
        let url = client.metar_url(&AirportCode::parse("egll").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/proxy/api/data/metar?ids=EGLL");
    }

    #[test]
    fn test_reject_non_base_url() {
        let base_url = Url::parse("data:text/plain,metar").unwrap();
        let error = assert_err!(AviationWeatherApi::new(
            base_url,
            HeaderValue::from_static("t"),
            Duration::from_secs(1)
        ));
        assert!(matches!(error, AviationWeatherError::NotABaseUrl(_)));
    }
}
