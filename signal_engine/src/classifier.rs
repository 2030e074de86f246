//! BUY / SELL / NONE classification of one instrument's indicator frame.
//!
//! Classification is a pure function of the frame and the [`ClassifierConfig`]:
//! the same inputs always produce the same [`SignalDecision`].

use std::fmt;

use chrono::{DateTime, Utc};
use market_data_ingestor::models::bar::BarSeries;
use serde::{Deserialize, Serialize};

use crate::frame::{IndicatorFrame, IndicatorParams, IndicatorRow};

/// Fewer fully-defined rows than this and the frame is not trusted.
pub const MIN_DEFINED_ROWS: usize = 5;

const BUY_RSI_BELOW: f64 = 35.0;
const SELL_RSI_ABOVE: f64 = 65.0;

const STOP_PCT: f64 = 0.003;
const TARGET_PCT: f64 = 0.006;
const ATR_STOP_MULT: f64 = 1.6;
const ATR_TARGET_MULT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Buy,
    Sell,
    NoSignal,
}

impl Direction {
    pub fn is_actionable(self) -> bool {
        !matches!(self, Direction::NoSignal)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::NoSignal => "NONE",
        })
    }
}

/// Which stop/target policy and filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// ADX > 20, stops at 0.3% / 0.6% of the entry.
    #[default]
    Standard,
    /// ADX > 22 and ATR above its mean, stops at 1.6 / 3.0 ATR.
    HighAccuracy,
}

impl SignalMode {
    pub fn adx_threshold(self) -> f64 {
        match self {
            SignalMode::Standard => 20.0,
            SignalMode::HighAccuracy => 22.0,
        }
    }

    /// Shortest series that is worth running the indicators on.
    pub fn min_bars(self) -> usize {
        match self {
            SignalMode::Standard => 50,
            SignalMode::HighAccuracy => 150,
        }
    }
}

/// Which row of the frame the rule is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationBar {
    /// Second-to-last row; the newest bar may still be forming.
    #[default]
    LastClosed,
    Latest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierConfig {
    pub mode: SignalMode,
    pub evaluation_bar: EvaluationBar,
    pub indicators: IndicatorParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSignalReason {
    /// The fetched series is shorter than the mode's minimum.
    InsufficientHistory { bars: usize, required: usize },
    /// Too few rows survived the warm-up filter.
    InsufficientIndicatorRows { rows: usize },
    ConditionsNotMet,
}

impl fmt::Display for NoSignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoSignalReason::InsufficientHistory { bars, required } => {
                write!(f, "insufficient history: {bars} bars, {required} required")
            }
            NoSignalReason::InsufficientIndicatorRows { rows } => {
                write!(f, "only {rows} fully-defined indicator rows")
            }
            NoSignalReason::ConditionsNotMet => f.write_str("conditions not met"),
        }
    }
}

/// Result of one classification. Created fresh every round.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDecision {
    pub instrument: String,
    pub direction: Direction,
    /// Present exactly when `direction` is BUY or SELL.
    pub levels: Option<TradeLevels>,
    /// Timestamp of the evaluated row, when one was reached.
    pub evaluated_at: Option<DateTime<Utc>>,
    pub mode: SignalMode,
    /// Present exactly when `direction` is NONE.
    pub reason: Option<NoSignalReason>,
}

impl SignalDecision {
    fn none(
        instrument: &str,
        mode: SignalMode,
        reason: NoSignalReason,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            instrument: instrument.to_string(),
            direction: Direction::NoSignal,
            levels: None,
            evaluated_at,
            mode,
            reason: Some(reason),
        }
    }
}

/// Classifies the evaluation row of `frame`.
pub fn classify(instrument: &str, frame: &IndicatorFrame, config: &ClassifierConfig) -> SignalDecision {
    let rows = frame.rows();
    if rows.len() < MIN_DEFINED_ROWS {
        return SignalDecision::none(
            instrument,
            config.mode,
            NoSignalReason::InsufficientIndicatorRows { rows: rows.len() },
            None,
        );
    }

    let row = match config.evaluation_bar {
        EvaluationBar::LastClosed => rows[rows.len() - 2],
        EvaluationBar::Latest => rows[rows.len() - 1],
    };

    let direction = if trend_filter(&row, frame, config.mode) {
        direction_of(&row)
    } else {
        Direction::NoSignal
    };
    if !direction.is_actionable() {
        return SignalDecision::none(
            instrument,
            config.mode,
            NoSignalReason::ConditionsNotMet,
            Some(row.timestamp),
        );
    }

    SignalDecision {
        instrument: instrument.to_string(),
        direction,
        levels: Some(levels(&row, direction, config.mode)),
        evaluated_at: Some(row.timestamp),
        mode: config.mode,
        reason: None,
    }
}

/// Rejects short series, then computes the frame and classifies it.
pub fn evaluate(instrument: &str, series: &BarSeries, config: &ClassifierConfig) -> SignalDecision {
    let required = config.mode.min_bars();
    let insufficient = NoSignalReason::InsufficientHistory {
        bars: series.len(),
        required,
    };
    if series.len() < required {
        return SignalDecision::none(instrument, config.mode, insufficient, None);
    }
    match IndicatorFrame::compute(series, &config.indicators) {
        Ok(frame) => classify(instrument, &frame, config),
        Err(_) => SignalDecision::none(instrument, config.mode, insufficient, None),
    }
}

fn trend_filter(row: &IndicatorRow, frame: &IndicatorFrame, mode: SignalMode) -> bool {
    if row.adx <= mode.adx_threshold() {
        return false;
    }
    match mode {
        SignalMode::Standard => true,
        SignalMode::HighAccuracy => frame.mean_atr().is_some_and(|mean| row.atr > mean),
    }
}

fn direction_of(row: &IndicatorRow) -> Direction {
    if row.close > row.ema_long && row.rsi < BUY_RSI_BELOW && row.macd > row.macd_signal {
        Direction::Buy
    } else if row.close < row.ema_long && row.rsi > SELL_RSI_ABOVE && row.macd < row.macd_signal {
        Direction::Sell
    } else {
        Direction::NoSignal
    }
}

fn levels(row: &IndicatorRow, direction: Direction, mode: SignalMode) -> TradeLevels {
    let price = row.close;
    let (risk, reward) = match mode {
        SignalMode::Standard => (price * STOP_PCT, price * TARGET_PCT),
        SignalMode::HighAccuracy => (row.atr * ATR_STOP_MULT, row.atr * ATR_TARGET_MULT),
    };
    let (stop_loss, take_profit) = match direction {
        Direction::Sell => (price + risk, price - reward),
        _ => (price - risk, price + reward),
    };
    TradeLevels {
        entry: price,
        stop_loss,
        take_profit,
    }
}
