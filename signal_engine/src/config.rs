//! Startup configuration: credentials from the environment, everything else
//! from an optional TOML file with defaults for every key.
//!
//! ```toml
//! timeframe = "15m"
//! lookback = "5d"
//! mode = "standard"            # or "high_accuracy"
//! evaluation_bar = "last_closed"  # or "latest"
//! sleep_slice_secs = 5
//!
//! [[instruments]]
//! symbol = "GC=F"
//! name = "GOLD (GC=F)"
//!
//! [notify]
//! timeout_secs = 10
//! max_attempts = 3
//! backoff_step_ms = 1500
//! ```

use std::{collections::HashSet, path::Path, time::Duration};

use market_data_ingestor::{
    models::timeframe::{TimeFrame, TimeFrameUnit},
    providers::yahoo_rest::params::interval_code,
};
use secrecy::SecretString;
use serde::Deserialize;
use shared_utils::env::get_env_vars;
use signal_notifier::RetryPolicy;

use crate::{
    classifier::{ClassifierConfig, EvaluationBar, SignalMode},
    errors::EngineError,
    scheduler::{Instrument, SchedulerSettings},
};

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Notification channel identity. Both values are required.
#[derive(Debug)]
pub struct Credentials {
    pub bot_token: SecretString,
    pub chat_id: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, EngineError> {
        let [bot_token, chat_id] = get_env_vars([BOT_TOKEN_VAR, CHAT_ID_VAR])?;
        Ok(Self {
            bot_token: SecretString::new(bot_token.into()),
            chat_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_step_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            backoff_step_ms: 1500,
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_step: Duration::from_millis(self.backoff_step_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Bar granularity; also the pause between rounds.
    pub timeframe: TimeFrame,
    /// How far back each fetch reaches.
    pub lookback: TimeFrame,
    pub mode: SignalMode,
    pub evaluation_bar: EvaluationBar,
    pub sleep_slice_secs: u64,
    pub instruments: Vec<Instrument>,
    pub notify: NotifyConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            timeframe: TimeFrame::new(15, TimeFrameUnit::Minute),
            lookback: TimeFrame::new(5, TimeFrameUnit::Day),
            mode: SignalMode::default(),
            evaluation_bar: EvaluationBar::default(),
            sleep_slice_secs: 5,
            instruments: vec![
                Instrument::new("GC=F", "GOLD (GC=F)"),
                Instrument::new("BTC-USD", "BITCOIN (BTC)"),
            ],
            notify: NotifyConfig::default(),
        }
    }
}

impl BotConfig {
    /// Reads and validates the file at `path`, or returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.instruments.is_empty() {
            return Err(EngineError::InvalidConfig("at least one instrument is required".into()));
        }
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.symbol.trim().is_empty() {
                return Err(EngineError::InvalidConfig("instrument symbol must not be empty".into()));
            }
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate instrument symbol: {}",
                    instrument.symbol
                )));
            }
        }
        if interval_code(&self.timeframe).is_none() {
            return Err(EngineError::InvalidConfig(format!(
                "timeframe {} is not offered by the market data provider",
                self.timeframe
            )));
        }
        if self.notify.timeout_secs == 0 {
            return Err(EngineError::InvalidConfig("notify.timeout_secs must be at least 1".into()));
        }
        if self.notify.max_attempts == 0 {
            return Err(EngineError::InvalidConfig("notify.max_attempts must be at least 1".into()));
        }
        if self.sleep_slice_secs == 0 {
            return Err(EngineError::InvalidConfig("sleep_slice_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn scheduler_settings(&self) -> Result<SchedulerSettings, EngineError> {
        let lookback = chrono::Duration::from_std(self.lookback.to_duration())
            .map_err(|e| EngineError::InvalidConfig(format!("lookback {} is out of range: {e}", self.lookback)))?;
        Ok(SchedulerSettings {
            timeframe: self.timeframe,
            lookback,
            classifier: ClassifierConfig {
                mode: self.mode,
                evaluation_bar: self.evaluation_bar,
                ..Default::default()
            },
            retry: self.notify.retry_policy(),
            sleep_slice: Duration::from_secs(self.sleep_slice_secs),
        })
    }
}
