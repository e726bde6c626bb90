use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = metar::tracing::get_tracing_subscriber("info");
    metar::tracing::init_subscriber(subscriber)?;

    let options = parse_options();
    let settings = load_settings(&options)?;

    let server = metar::Server::build(&settings).await?;
    server.run_until_stopped().await.map_err(|err| err.into())
}

fn parse_options() -> metar::CliOptions {
    let options = metar::CliOptions::parse();
    if options.secrets.is_none() {
        tracing::warn!("No secrets configuration provided. The language model API key should be confined in a secret configuration or sourced from the environment.");
    }

    options
}

fn load_settings(options: &metar::CliOptions) -> anyhow::Result<metar::Settings> {
    let app_environment = std::env::var(metar::CliOptions::env_app_environment()).ok();
    if app_environment.is_none() {
        tracing::info!("No environment configuration override provided.");
    }

    Ok(metar::Settings::load(options, app_environment.as_deref())?)
}
