pub mod currency_service;
pub mod dividend_service;
pub mod holdings_service;
pub mod merge_service;
pub mod performance_service;
pub mod quantity_service;
pub mod split_service;
pub mod valuation_service;
