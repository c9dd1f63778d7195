use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use stock_analyzer_backend::app;
use stock_analyzer_backend::config::{AppConfig, ProviderKind};
use stock_analyzer_backend::external::mock::MockProvider;
use stock_analyzer_backend::external::price_provider::PriceProvider;
use stock_analyzer_backend::external::yahoo::YahooProvider;
use stock_analyzer_backend::logging::{init_logging, LoggingConfig};
use stock_analyzer_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env().context("invalid configuration")?;

    let provider: Arc<dyn PriceProvider> = match config.provider {
        ProviderKind::Yahoo => {
            tracing::info!("📊 Using price provider: Yahoo Finance ({})", config.upstream.base_url);
            Arc::new(YahooProvider::new(&config.upstream).context("failed to create Yahoo provider")?)
        }
        ProviderKind::Mock => {
            tracing::info!("📊 Using price provider: offline mock");
            Arc::new(MockProvider::new())
        }
    };

    tracing::info!(
        "⚙️  Defaults: strategy={}, baseline={}, history_days={}, min_history={}",
        config.analysis.strategy,
        config.analysis.baseline,
        config.analysis.history_days,
        config.analysis.min_history
    );

    let state = AppState::new(provider, config.analysis.clone());
    let app = app::create_app(state);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Stock analyzer backend running at http://{}/", addr);
    tracing::info!("API endpoint: http://{}/api/stock?symbol=AAPL", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
