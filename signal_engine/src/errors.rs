use market_data_ingestor::providers::ProviderInitError;
use shared_utils::env::MissingEnvVarError;
use signal_notifier::DeliveryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Fetch failed, timed out or returned no bars. Recovered by skipping the
    /// instrument for the round.
    #[error("Market data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Retries exhausted. The dedup state is left unadvanced.
    #[error("Failed to deliver signal for {symbol}: {source}")]
    DeliveryFailure {
        symbol: String,
        #[source]
        source: DeliveryError,
    },

    #[error(transparent)]
    ConfigurationMissing(#[from] MissingEnvVarError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialise market data provider: {0}")]
    ProviderInit(#[from] ProviderInitError),

    #[error("Failed to initialise notifier: {0}")]
    NotifierInit(#[source] reqwest::Error),
}
