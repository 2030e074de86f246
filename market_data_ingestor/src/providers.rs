//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching time-series bar data from any market data vendor (e.g., Yahoo Finance).
//!
//! Each concrete provider implementation should implement [`DataProvider`] to handle
//! vendor-specific API logic and validation.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarSeries>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```
//!

pub mod yahoo_rest;

use std::time::Duration;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
///
/// Implement this trait for each concrete data vendor.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarSeries>)` - One series per symbol that returned data. A symbol with
    ///   no bars in range may be absent or present with an empty `bars` vector.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError>;

    /// Upper bound on how long a single `fetch_bars` call may take.
    ///
    /// Callers use this to put an outer deadline around the fetch.
    fn request_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }
}

#[async_trait]
impl<T: DataProvider + ?Sized> DataProvider for Box<T> {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        (**self).fetch_bars(params).await
    }

    fn request_timeout(&self) -> Duration {
        (**self).request_timeout()
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Base URL is not an absolute http(s) URL.
    #[snafu(display("Invalid base URL: {url}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., unknown symbol).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::timeframe::{TimeFrame, TimeFrameUnit};

    use super::*;

    struct EmptyProvider;
    struct FailingProvider;

    #[async_trait]
    impl DataProvider for EmptyProvider {
        async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl DataProvider for FailingProvider {
        async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            ApiSnafu { message: "down for maintenance" }.fail()
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
    }

    // This function decides AT RUNTIME which provider to give back.
    fn get_provider(name: &str) -> Box<dyn DataProvider> {
        if name == "empty" {
            Box::new(EmptyProvider)
        } else {
            Box::new(FailingProvider)
        }
    }

    fn params() -> BarsRequestParams {
        BarsRequestParams {
            symbols: vec!["GC=F".to_string()],
            timeframe: TimeFrame::new(15, TimeFrameUnit::Minute),
            start: Utc::now(),
            end: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let provider = get_provider("empty");
        let result = provider.fetch_bars(params()).await;
        assert!(result.unwrap().is_empty());
        assert_eq!(provider.request_timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_boxed_provider_forwards_errors_and_timeout() {
        let provider = get_provider("failing");
        let err = provider.fetch_bars(params()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
        assert_eq!(err.to_string(), "API error: down for maintenance");
        assert_eq!(provider.request_timeout(), Duration::from_secs(1));
    }
}
