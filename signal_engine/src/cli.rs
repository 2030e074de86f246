use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Polls market data and announces trend signals to Telegram")]
pub struct Cli {
    /// Path to the settings file (signal_bot.toml). Built-in defaults apply without it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single round and exit
    #[arg(long)]
    pub once: bool,
}
