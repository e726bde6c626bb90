use crate::services::{AviationWeatherError, DecoderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("HTTP engine error: {0}")]
    HttpEngine(#[from] hyper::Error),

    #[error("failed joining with thread: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to initialize aviation weather client: {0}")]
    AviationWeather(#[from] AviationWeatherError),

    #[error("failed to initialize METAR decoder: {0}")]
    Decoder(#[from] DecoderError),
}
