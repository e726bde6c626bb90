use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about = "Serves plain-English METAR weather reports")]
pub struct CliOptions {
    /// Explicit configuration file layered over the embedded defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Secrets configuration file, e.g. holding `decoder.api_key`.
    #[arg(short, long)]
    pub secrets: Option<PathBuf>,

    /// Directory searched for the `APP_ENVIRONMENT` settings file.
    #[arg(short, long, default_value = "resources")]
    pub resources: PathBuf,
}

impl CliOptions {
    pub const fn env_app_environment() -> &'static str {
        "APP_ENVIRONMENT"
    }
}
