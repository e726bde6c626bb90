mod cli_options;

pub use cli_options::CliOptions;

use crate::errors::MetarError;
use config::{Config, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;
use url::Url;

const DEFAULT_SETTINGS: &str = include_str!("../resources/application.yaml");
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http_api: HttpApiSettings,
    pub aviation_weather: AviationWeatherSettings,
    pub decoder: DecoderSettings,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpApiSettings {
    pub host: String,
    pub port: u16,

    #[serde(rename = "timeout_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
}

impl HttpApiSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AviationWeatherSettings {
    pub base_url: Url,

    #[serde(rename = "timeout_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,

    pub user_agent: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    pub base_url: Url,
    pub api_key: Secret<String>,
    pub model: String,
    pub max_completion_tokens: u32,

    #[serde(rename = "timeout_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
}

impl Settings {
    /// Layers, lowest to highest precedence: embedded defaults, `<resources>/<environment>`,
    /// the `--config` file, the `--secrets` file, then `APP__`-prefixed environment variables
    /// (e.g. `APP__DECODER__API_KEY`).
    #[tracing::instrument(level = "debug", skip(options))]
    pub fn load(options: &CliOptions, app_environment: Option<&str>) -> Result<Self, MetarError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Yaml));

        if let Some(environment) = app_environment {
            let path = options.resources.join(environment);
            tracing::debug!(?path, "looking for environment settings");
            builder = builder.add_source(File::from(path).required(false));
        }

        if let Some(config) = &options.config {
            builder = builder.add_source(File::from(config.clone()));
        }

        if let Some(secrets) = &options.secrets {
            builder = builder.add_source(File::from(secrets.clone()));
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), MetarError> {
        if self.aviation_weather.base_url.cannot_be_a_base() {
            return Err(MetarError::InvalidSetting {
                key: "aviation_weather.base_url",
                reason: format!("{} cannot be a base url", self.aviation_weather.base_url),
            });
        }

        if self.decoder.base_url.cannot_be_a_base() {
            return Err(MetarError::InvalidSetting {
                key: "decoder.base_url",
                reason: format!("{} cannot be a base url", self.decoder.base_url),
            });
        }

        if self.decoder.max_completion_tokens == 0 {
            return Err(MetarError::InvalidSetting {
                key: "decoder.max_completion_tokens",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    const APP_VARS: [&str; 4] = [
        "APP__HTTP_API__PORT",
        "APP__DECODER__API_KEY",
        "APP__DECODER__BASE_URL",
        "APP__AVIATION_WEATHER__TIMEOUT_SECS",
    ];

    fn options() -> CliOptions {
        CliOptions {
            config: None,
            secrets: None,
            resources: PathBuf::from("resources"),
        }
    }

    #[test]
    fn test_load_embedded_defaults() {
        temp_env::with_vars_unset(APP_VARS.to_vec(), || {
            let settings = assert_ok!(Settings::load(&options(), None));
            assert_eq!(settings.http_api.address(), "0.0.0.0:8080");
            assert_eq!(settings.http_api.timeout, Duration::from_secs(120));
            assert_eq!(settings.aviation_weather.base_url.as_str(), "https://aviationweather.gov/");
            assert_eq!(settings.aviation_weather.timeout, Duration::from_secs(10));
            assert_eq!(settings.decoder.model, "gpt-4o");
            assert_eq!(settings.decoder.max_completion_tokens, 1024);
            assert_eq!(settings.decoder.api_key.expose_secret(), "");
        });
    }

    #[test]
    fn test_environment_overrides_defaults() {
        temp_env::with_vars(
            vec![
                ("APP__HTTP_API__PORT", Some("9090")),
                ("APP__DECODER__API_KEY", Some("sk-test-key")),
                ("APP__DECODER__BASE_URL", None),
                ("APP__AVIATION_WEATHER__TIMEOUT_SECS", Some("3")),
            ],
            || {
                let settings = assert_ok!(Settings::load(&options(), None));
                assert_eq!(settings.http_api.port, 9090);
                assert_eq!(settings.decoder.api_key.expose_secret(), "sk-test-key");
                assert_eq!(settings.aviation_weather.timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let path = std::env::temp_dir().join("metar_settings_override_test.yaml");
        assert_ok!(std::fs::write(
            &path,
            "decoder:\n  model: \"gpt-4o-mini\"\n  max_completion_tokens: 256\n"
        ));

        temp_env::with_vars_unset(APP_VARS.to_vec(), || {
            let options = CliOptions { config: Some(path.clone()), ..options() };
            let settings = assert_ok!(Settings::load(&options, None));
            assert_eq!(settings.decoder.model, "gpt-4o-mini");
            assert_eq!(settings.decoder.max_completion_tokens, 256);
            assert_eq!(settings.http_api.port, 8080);
        });

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_environment_file_is_optional() {
        temp_env::with_vars_unset(APP_VARS.to_vec(), || {
            assert_ok!(Settings::load(&options(), Some("no-such-environment")));
        });
    }

    #[test]
    fn test_reject_non_base_decoder_url() {
        temp_env::with_vars(
            vec![
                ("APP__HTTP_API__PORT", None),
                ("APP__DECODER__API_KEY", None),
                ("APP__DECODER__BASE_URL", Some("mailto:ops@example.com")),
                ("APP__AVIATION_WEATHER__TIMEOUT_SECS", None),
            ],
            || {
                let error = assert_err!(Settings::load(&options(), None));
                assert!(matches!(
                    error,
                    MetarError::InvalidSetting { key: "decoder.base_url", .. }
                ));
            },
        );
    }
}
