//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`).
//!
//! Covers futures (`GC=F`), crypto pairs (`BTC-USD`) and equities with a
//! single unauthenticated endpoint, one request per symbol.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::YahooChartProvider;
