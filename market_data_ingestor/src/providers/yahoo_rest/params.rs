use crate::{
    models::{
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Maps a [`TimeFrame`] onto one of the interval codes the chart API accepts.
pub fn interval_code(timeframe: &TimeFrame) -> Option<&'static str> {
    use TimeFrameUnit::*;

    let code = match (timeframe.unit, timeframe.amount) {
        (Minute, 1) => "1m",
        (Minute, 2) => "2m",
        (Minute, 5) => "5m",
        (Minute, 15) => "15m",
        (Minute, 30) => "30m",
        (Minute, 60) | (Hour, 1) => "60m",
        (Minute, 90) => "90m",
        (Day, 1) => "1d",
        (Day, 5) => "5d",
        (Week, 1) => "1wk",
        (Month, 1) => "1mo",
        (Month, 3) => "3mo",
        _ => return None,
    };
    Some(code)
}

pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    interval_code(timeframe).ok_or_else(|| {
        ValidationSnafu {
            message: format!("timeframe {timeframe} is not supported by the chart API"),
        }
        .build()
    })
}

pub fn validate_range(params: &BarsRequestParams) -> Result<(), ProviderError> {
    if params.start >= params.end {
        return ValidationSnafu {
            message: format!("empty range: start {} is not before end {}", params.start, params.end),
        }
        .fail();
    }
    if params.symbols.is_empty() {
        return ValidationSnafu { message: "no symbols requested" }.fail();
    }
    Ok(())
}

/// Query string for one symbol's chart request.
pub fn construct_params(params: &BarsRequestParams, interval: &str) -> Vec<(String, String)> {
    vec![
        ("period1".to_string(), params.start.timestamp().to_string()),
        ("period2".to_string(), params.end.timestamp().to_string()),
        ("interval".to_string(), interval.to_string()),
        ("includePrePost".to_string(), "false".to_string()),
        ("events".to_string(), "history".to_string()),
    ]
}
