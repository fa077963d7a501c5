use terraform_provider_neo4j::provider::Provider;
use terraform_provider_neo4j::serve::{serve, Server};
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // stdout carries the protocol, so logs go to stderr.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,neo4rs=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let provider = Provider::new();
    provider.internal_validate()?;
    info!(version = env!("CARGO_PKG_VERSION"), "serving provider");

    serve(Server::new(provider), BufReader::new(stdin()), stdout()).await?;
    Ok(())
}
