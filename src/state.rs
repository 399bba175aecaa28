use std::sync::Arc;

use sqlx::PgPool;

use crate::external::market_data::MarketDataSource;
use crate::services::stream_service::Subscribers;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market: Arc<dyn MarketDataSource>,
    pub subscribers: Arc<Subscribers>,
}
