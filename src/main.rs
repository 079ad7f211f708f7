use crypto_blog::{build_app, connect_store, Config, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 {err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run(config).await {
        error!("🔥 {err}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let port = config.port;
    let app = build_app(config, store).await;

    let listener = tokio::net::TcpListener::bind(format!("[::]:{port}")).await?;
    info!("✅ listening on port {port}");

    axum::serve(listener, app).await?;
    Ok(())
}
