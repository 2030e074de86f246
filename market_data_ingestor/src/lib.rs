//! Vendor-agnostic market data models and the providers that fill them.
//!
//! [`models`] holds the canonical OHLCV [`Bar`](models::bar::Bar) and
//! [`BarSeries`](models::bar::BarSeries) types plus [`TimeFrame`](models::timeframe::TimeFrame).
//! [`providers`] defines the [`DataProvider`](providers::DataProvider) trait and
//! its concrete implementations.

pub mod models;
pub mod providers;
