use clap::Parser;
use tokio::net::TcpListener;

mod api;
mod config;
mod keyword;
mod search;
mod token;
mod views;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    // Initialize color_eyre
    color_eyre::install()?;

    let config = config::Config::parse();

    // Initialize tracing subscriber
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Start server
    let state = api::AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.bind).await?;

    tracing::info!(
        "Listening on {}, searching {} for {:?}",
        config.bind,
        config.search_url,
        config.search_keyword
    );

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
