use anyhow::{Context, Result};
use clap::Parser;
use market_data_ingestor::providers::yahoo_rest::YahooChartProvider;
use signal_engine::{
    EngineError, PollScheduler, ShutdownToken,
    cli::Cli,
    config::{BotConfig, Credentials},
};
use signal_notifier::TelegramNotifier;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the variables may come from the real environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let credentials = Credentials::from_env().inspect_err(|e| error!(error = %e, "cannot start"))?;
    let config = BotConfig::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    let settings = config.scheduler_settings()?;

    let provider = YahooChartProvider::new().map_err(EngineError::from)?;
    let notifier = TelegramNotifier::new(credentials.bot_token, credentials.chat_id, config.notify.timeout())
        .map_err(EngineError::NotifierInit)?;

    let shutdown = ShutdownToken::new();
    spawn_signal_watcher(shutdown.clone());

    info!(
        instruments = config.instruments.len(),
        timeframe = %config.timeframe,
        lookback = %config.lookback,
        "signal bot starting"
    );
    let mut scheduler = PollScheduler::new(provider, notifier, config.instruments, settings, shutdown);

    if cli.once {
        let report = scheduler.run_round().await;
        for (symbol, outcome) in &report.outcomes {
            info!(%symbol, ?outcome, "round outcome");
        }
    } else {
        scheduler.run().await;
    }
    Ok(())
}

/// Cancels `token` on Ctrl-C, or SIGTERM on unix.
fn spawn_signal_watcher(token: ShutdownToken) {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                info!("shutdown requested, finishing the current step");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for shutdown signals"),
        }
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
