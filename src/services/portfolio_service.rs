use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::market_data::MarketDataSource;
use crate::models::{HoldingView, PortfolioView, SavePortfolioRequest, SaveReceipt};

const DEFAULT_PORTFOLIO_NAME: &str = "Main";

/// Replace all holdings for a (user, portfolio-name) pair.
///
/// The user and portfolio rows are created on first save. The existing
/// holdings are deleted and the submitted set inserted wholesale; the
/// whole operation commits or rolls back as one transaction.
pub async fn save(pool: &PgPool, req: SavePortfolioRequest) -> Result<SaveReceipt, AppError> {
    let portfolio_name = req
        .portfolio_name
        .clone()
        .unwrap_or_else(|| DEFAULT_PORTFOLIO_NAME.to_string());
    let username = req.username.clone().unwrap_or_else(|| local_part(&req.email));

    let mut tx = pool.begin().await?;

    let user = db::user_queries::find_or_create(&mut tx, &req.email, &username).await?;
    let portfolio =
        db::portfolio_queries::find_or_create(&mut tx, user.id, &portfolio_name).await?;

    db::holding_queries::delete_for_portfolio(&mut tx, portfolio.id).await?;

    let mut saved = Vec::with_capacity(req.holdings.len());
    for entry in &req.holdings {
        let purchase_date = parse_purchase_date(&entry.purchase_date);
        let holding =
            db::holding_queries::insert(&mut tx, portfolio.id, entry, purchase_date).await?;
        saved.push(holding);
    }

    db::portfolio_queries::touch(&mut tx, portfolio.id).await?;
    tx.commit().await?;

    info!(
        "Saved {} holdings for user {} into portfolio {}",
        saved.len(),
        user.id,
        portfolio.id
    );

    Ok(SaveReceipt {
        user_id: user.id,
        portfolio_id: portfolio.id,
        portfolio_name,
        holdings: saved,
    })
}

/// Stored holdings for a user, enriched with the live quote and position
/// value. A holding whose quote is unavailable keeps its row with zeroed
/// enrichment fields. A user with no portfolio gets an empty list.
pub async fn holdings_view(
    pool: &PgPool,
    market: &dyn MarketDataSource,
    user_id: Uuid,
) -> Result<PortfolioView, AppError> {
    let holdings = db::holding_queries::fetch_for_user(pool, user_id).await?;

    let mut views = Vec::with_capacity(holdings.len());
    let mut total_value = 0.0;

    for holding in holdings {
        let ticker = market.current_price(&holding.symbol).await;
        let stats = market.change_24h(&holding.symbol).await;
        let value = holding.amount * ticker.price;
        total_value += value;

        views.push(HoldingView {
            symbol: holding.symbol,
            amount: holding.amount,
            purchase_price: holding.purchase_price,
            purchase_date: holding.purchase_date,
            current_price: ticker.price,
            change_24h: stats.price_change_percent,
            value,
        });
    }

    Ok(PortfolioView {
        user_id,
        holdings: views,
        total_value,
    })
}

/// Purchase dates arrive as `YYYY-MM-DD` strings; anything unparsable
/// falls back to the time of the request.
fn parse_purchase_date(raw: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
