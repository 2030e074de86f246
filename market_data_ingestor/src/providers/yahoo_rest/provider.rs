use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::BarSeries, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InternalSnafu, InvalidBaseUrlSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu,
        yahoo_rest::{
            params::{construct_params, validate_range, validate_timeframe},
            response::{ChartBody, ChartEnvelope},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// The endpoint answers 429 to clients without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl YahooChartProvider {
    /// Creates a provider pointed at the public Yahoo Finance host.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a provider against an alternative host (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return InvalidBaseUrlSnafu { url: base_url }.fail();
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::direct(Quota::per_second(nonzero!(2u32))),
        })
    }

    /// Replaces the outbound request budget.
    pub fn with_rate_limit(mut self, requests_per_second: NonZeroU32) -> Self {
        self.limiter = RateLimiter::direct(Quota::per_second(requests_per_second));
        self
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        query: &[(String, String)],
        params: &BarsRequestParams,
    ) -> Result<BarSeries, ProviderError> {
        self.limiter.until_ready().await;

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!(%symbol, %url, "requesting chart");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        // Error bodies still use the chart envelope, so try that first for a better message.
        let envelope = serde_json::from_str::<ChartEnvelope>(&body);
        if let Ok(ChartEnvelope {
            chart: ChartBody { error: Some(err), .. },
        }) = &envelope
        {
            return ApiSnafu {
                message: format!(
                    "{symbol}: {} ({})",
                    err.code,
                    err.description.as_deref().unwrap_or("no description")
                ),
            }
            .fail();
        }
        if !status.is_success() {
            return ApiSnafu {
                message: format!("{symbol}: HTTP {status}: {}", snippet(&body)),
            }
            .fail();
        }

        let envelope = envelope.map_err(|e| {
            InternalSnafu {
                message: format!("{symbol}: malformed chart payload: {e}"),
            }
            .build()
        })?;

        let bars = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|result| result.into_bars())
            .unwrap_or_default();

        Ok(BarSeries {
            symbol: symbol.to_string(),
            timeframe: params.timeframe,
            bars,
        })
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        let interval = validate_timeframe(&params.timeframe)?;
        validate_range(&params)?;

        let query = construct_params(&params, interval);
        let mut result = Vec::with_capacity(params.symbols.len());
        for symbol in &params.symbols {
            result.push(self.fetch_symbol(symbol, &query, &params).await?);
        }
        Ok(result)
    }

    fn request_timeout(&self) -> Duration {
        REQUEST_TIMEOUT
    }
}
