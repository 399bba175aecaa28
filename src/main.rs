mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::binance::BinanceMarketData;
use crate::external::market_data::MarketDataSource;
use crate::services::stream_service::{self, Subscribers};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let market: Arc<dyn MarketDataSource> = Arc::new(BinanceMarketData::new());
    let subscribers = Arc::new(Subscribers::new());

    // One broadcaster task feeds every stream subscriber.
    stream_service::spawn(Arc::clone(&market), Arc::clone(&subscribers));

    let state = AppState {
        pool,
        market,
        subscribers,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Cryptofolio backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
