use std::fmt::Write as _;

use market_data_ingestor::models::timeframe::TimeFrame;

use crate::classifier::{Direction, SignalDecision, SignalMode};

/// Renders an actionable decision as the chat message.
///
/// Returns `None` for NONE decisions. The timestamp shown is the evaluated
/// bar's, not the wall clock.
pub fn format_signal(name: &str, decision: &SignalDecision, timeframe: &TimeFrame) -> Option<String> {
    let levels = decision.levels?;
    let evaluated_at = decision.evaluated_at?;
    let direction = match decision.direction {
        Direction::Buy => "BUY 🟢",
        Direction::Sell => "SELL 🔴",
        Direction::NoSignal => return None,
    };
    let title = match decision.mode {
        SignalMode::Standard => "SIGNAL",
        SignalMode::HighAccuracy => "HIGH-ACCURACY SIGNAL",
    };

    let mut text = String::new();
    let _ = writeln!(text, "📊 {name} {title}");
    let _ = writeln!(text, "🕒 {} UTC", evaluated_at.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(text);
    let _ = writeln!(text, "📈 Direction: {direction}");
    let _ = writeln!(text, "🎯 Entry: {:.2}", levels.entry);
    let _ = writeln!(text, "🛑 Stop Loss: {:.2}", levels.stop_loss);
    let _ = writeln!(text, "🏁 Take Profit: {:.2}", levels.take_profit);
    let _ = write!(text, "⏱ Timeframe: {timeframe}");
    Some(text)
}
