use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, error};
use uuid::Uuid;

use crate::external::market_data::MarketDataSource;
use crate::models::{PriceSnapshot, SnapshotQuote};

/// Symbols pushed on every tick of the price stream.
pub const TRACKED_SYMBOLS: [&str; 10] = [
    "BTC", "ETH", "BNB", "SOL", "ADA", "DOT", "AVAX", "MATIC", "LINK", "UNI",
];

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Lifecycle-scoped registry of stream subscribers, owned by the server
/// process and handed to connections through `AppState`.
///
/// Each subscriber gets its own channel; a slow or vanished subscriber
/// never blocks the broadcast for the others.
pub struct Subscribers {
    channels: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.channels.insert(id, tx);
        (id, rx)
    }

    /// Removing an id twice, or an id that was already pruned, is a no-op.
    pub fn unsubscribe(&self, id: Uuid) {
        self.channels.remove(&id);
    }

    /// Push `payload` to every live subscriber, pruning the ones whose
    /// receiving end has gone away.
    pub fn broadcast(&self, payload: &str) {
        self.channels
            .retain(|_, tx| tx.send(payload.to_string()).is_ok());
    }

    pub fn count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the broadcaster: one task ticking every second, fanning the
/// snapshot out to every subscriber. Ticks without subscribers skip the
/// upstream fetches entirely.
pub fn spawn(
    market: Arc<dyn MarketDataSource>,
    subscribers: Arc<Subscribers>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(TICK_PERIOD);
        loop {
            tick.tick().await;
            if subscribers.is_empty() {
                continue;
            }

            let snapshot = build_snapshot(market.as_ref()).await;
            match serde_json::to_string(&snapshot) {
                Ok(json) => subscribers.broadcast(&json),
                Err(e) => error!("Failed to serialize price snapshot: {}", e),
            }
        }
    })
}

/// One tick's payload. A symbol whose quote is unavailable is omitted
/// from the snapshot; it never fails the tick for the other symbols.
pub async fn build_snapshot(market: &dyn MarketDataSource) -> PriceSnapshot {
    let mut prices = BTreeMap::new();

    for symbol in TRACKED_SYMBOLS {
        let ticker = market.current_price(symbol).await;
        if ticker.price == 0.0 {
            debug!("omitting {} from tick: quote unavailable", symbol);
            continue;
        }

        let stats = market.change_24h(symbol).await;
        prices.insert(
            symbol.to_string(),
            SnapshotQuote {
                price: ticker.price,
                change_24h: stats.price_change_percent,
                price_change: stats.price_change,
                last_price: stats.last_price,
            },
        );
    }

    PriceSnapshot {
        timestamp: Utc::now().to_rfc3339(),
        prices,
    }
}
