mod forecast;
mod market;
mod portfolio;

pub use forecast::{AnalysisSummary, ForecastPoint, SymbolForecast};
pub use market::{
    Candle, OrderBook, OrderBookLevel, PriceSnapshot, SnapshotQuote, SymbolQuote, Ticker24h,
    TickerPrice,
};
pub use portfolio::{
    Holding, HoldingEntry, HoldingView, Portfolio, PortfolioView, SavePortfolioRequest,
    SaveReceipt, User,
};
