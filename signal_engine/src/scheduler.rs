//! The poll loop: fetch, classify, dedup-check and notify, one instrument at
//! a time, then sleep until the next bar.

use std::time::Duration;

use chrono::Utc;
use market_data_ingestor::{
    models::{
        bar::BarSeries,
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::DataProvider,
};
use serde::Deserialize;
use signal_notifier::{Notifier, RetryPolicy, deliver_with_retry};
use tracing::{debug, error, info, warn};

use crate::{
    classifier::{ClassifierConfig, Direction, NoSignalReason, evaluate},
    dedup::{DedupState, DedupVerdict},
    errors::EngineError,
    message::format_signal,
    shutdown::ShutdownToken,
};

/// Extra time granted on top of the provider's own request timeout.
const FETCH_GRACE: Duration = Duration::from_secs(5);

/// A tracked market: provider ticker plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSettings {
    pub timeframe: TimeFrame,
    pub lookback: chrono::Duration,
    pub classifier: ClassifierConfig,
    pub retry: RetryPolicy,
    pub sleep_slice: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            timeframe: TimeFrame::new(15, TimeFrameUnit::Minute),
            lookback: chrono::Duration::days(5),
            classifier: ClassifierConfig::default(),
            retry: RetryPolicy::default(),
            sleep_slice: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentOutcome {
    /// Fetch failed or returned nothing.
    Skipped { reason: String },
    /// Decision was NONE; any stored direction was cleared.
    NoSignal { reason: Option<NoSignalReason> },
    /// Same direction as the last announcement.
    Suppressed(Direction),
    Announced { direction: Direction, attempts: u32 },
    /// Retries exhausted, dedup state untouched.
    DeliveryFailed { direction: Direction, error: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    /// One entry per processed instrument, in tracking order.
    pub outcomes: Vec<(String, InstrumentOutcome)>,
    /// Shutdown was requested before every instrument was processed.
    pub interrupted: bool,
}

impl RoundReport {
    pub fn outcome(&self, symbol: &str) -> Option<&InstrumentOutcome> {
        self.outcomes.iter().find(|(s, _)| s == symbol).map(|(_, o)| o)
    }

    pub fn announced(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, InstrumentOutcome::Announced { .. }))
            .count()
    }
}

pub struct PollScheduler<P, N> {
    provider: P,
    notifier: N,
    instruments: Vec<Instrument>,
    settings: SchedulerSettings,
    dedup: DedupState,
    shutdown: ShutdownToken,
}

impl<P, N> PollScheduler<P, N>
where
    P: DataProvider,
    N: Notifier,
{
    pub fn new(
        provider: P,
        notifier: N,
        instruments: Vec<Instrument>,
        settings: SchedulerSettings,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            provider,
            notifier,
            instruments,
            settings,
            dedup: DedupState::new(),
            shutdown,
        }
    }

    pub fn dedup(&self) -> &DedupState {
        &self.dedup
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Runs rounds until the shutdown token is cancelled. Returns the number
    /// of rounds started.
    pub async fn run(&mut self) -> u64 {
        let interval = self.settings.timeframe.to_duration();
        let mut rounds = 0;
        info!(
            instruments = self.instruments.len(),
            timeframe = %self.settings.timeframe,
            mode = ?self.settings.classifier.mode,
            "scheduler started"
        );
        while !self.shutdown.is_cancelled() {
            rounds += 1;
            let report = self.run_round().await;
            debug!(round = rounds, announced = report.announced(), "round finished");
            if !self.shutdown.sleep(interval, self.settings.sleep_slice).await {
                break;
            }
        }
        info!(rounds, "shutdown requested, scheduler stopped");
        rounds
    }

    /// Processes every instrument once, in order.
    pub async fn run_round(&mut self) -> RoundReport {
        let mut report = RoundReport::default();
        for i in 0..self.instruments.len() {
            if self.shutdown.is_cancelled() {
                report.interrupted = true;
                break;
            }
            let instrument = self.instruments[i].clone();
            let outcome = self.process(&instrument).await;
            report.outcomes.push((instrument.symbol, outcome));
        }
        report
    }

    async fn process(&mut self, instrument: &Instrument) -> InstrumentOutcome {
        let symbol = instrument.symbol.as_str();

        let series = match self.fetch(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!(%symbol, error = %e, "skipping instrument this round");
                return InstrumentOutcome::Skipped { reason: e.to_string() };
            }
        };

        let decision = evaluate(symbol, &series, &self.settings.classifier);
        info!(
            %symbol,
            direction = %decision.direction,
            bars = series.len(),
            reason = ?decision.reason,
            "classified"
        );

        let direction = decision.direction;
        match self.dedup.gate(symbol, direction) {
            DedupVerdict::Cleared { rearmed } => {
                if rearmed {
                    info!(%symbol, "signal gone, re-armed");
                }
                InstrumentOutcome::NoSignal { reason: decision.reason }
            }
            DedupVerdict::Unchanged => {
                info!(%symbol, %direction, "unchanged direction, not notifying");
                InstrumentOutcome::Suppressed(direction)
            }
            DedupVerdict::Announce => {
                let Some(text) = format_signal(&instrument.name, &decision, &self.settings.timeframe) else {
                    return InstrumentOutcome::NoSignal { reason: decision.reason };
                };
                match deliver_with_retry(&self.notifier, &text, &self.settings.retry).await {
                    Ok(attempts) => {
                        self.dedup.confirm(symbol, direction);
                        info!(%symbol, %direction, attempts, "signal sent");
                        InstrumentOutcome::Announced { direction, attempts }
                    }
                    Err(source) => {
                        let e = EngineError::DeliveryFailure {
                            symbol: symbol.to_string(),
                            source,
                        };
                        error!(%symbol, %direction, error = %e, "signal not delivered");
                        InstrumentOutcome::DeliveryFailed {
                            direction,
                            error: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    async fn fetch(&self, symbol: &str) -> Result<BarSeries, EngineError> {
        let unavailable = |reason: String| EngineError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };
        let params = BarsRequestParams::trailing(
            vec![symbol.to_string()],
            self.settings.timeframe,
            self.settings.lookback,
            Utc::now(),
        );
        let deadline = self.provider.request_timeout() + FETCH_GRACE;

        let result = tokio::time::timeout(deadline, self.provider.fetch_bars(params))
            .await
            .map_err(|_| unavailable(format!("no response within {}s", deadline.as_secs())))?;
        let series = result
            .map_err(|e| unavailable(e.to_string()))?
            .into_iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| unavailable("no series returned".into()))?;

        if series.is_empty() {
            return Err(unavailable("empty series".into()));
        }
        if !series.is_strictly_increasing() {
            return Err(unavailable("timestamps are not strictly increasing".into()));
        }
        Ok(series)
    }
}
