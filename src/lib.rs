#![forbid(unsafe_code)]
#![warn(clippy::cargo, clippy::suspicious, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions)]

mod errors;
pub mod model;
mod server;
pub mod services;
mod settings;
pub mod tracing;

pub use errors::MetarError;
pub use server::Server;
pub use settings::{
    AviationWeatherSettings, CliOptions, DecoderSettings, HttpApiSettings, Settings,
};
