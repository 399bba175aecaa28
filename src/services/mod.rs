pub mod forecast_service;
pub mod portfolio_service;
pub mod quote_service;
pub mod stream_service;
