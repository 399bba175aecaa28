use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// A named grouping of holdings owned by one user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub symbol: String,
    pub amount: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A manually entered position as submitted by the client. The purchase
/// date arrives as a `YYYY-MM-DD` string; anything unparsable falls back
/// to the time of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingEntry {
    pub symbol: String,
    pub amount: f64,
    pub purchase_price: f64,
    pub purchase_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePortfolioRequest {
    pub email: String,
    pub username: Option<String>,
    pub portfolio_name: Option<String>,
    pub holdings: Vec<HoldingEntry>,
}

#[derive(Debug, Serialize)]
pub struct SaveReceipt {
    pub user_id: Uuid,
    pub portfolio_id: Uuid,
    pub portfolio_name: String,
    pub holdings: Vec<Holding>,
}

/// A stored holding enriched with the live quote. Enrichment fields are
/// zero when the quote is unavailable; the holding itself is still listed.
#[derive(Debug, Serialize)]
pub struct HoldingView {
    pub symbol: String,
    pub amount: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub current_price: f64,
    pub change_24h: f64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct PortfolioView {
    pub user_id: Uuid,
    pub holdings: Vec<HoldingView>,
    pub total_value: f64,
}
