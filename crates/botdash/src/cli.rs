//! Command-line interface.

use botdash_api::StartBotRequest;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Trading bot dashboard
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (can also be set via BOTDASH_CONFIG env var)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mount the dashboard, poll trades and log the view-model until Ctrl-C
    Watch,
    /// Mount once and print the view-model as JSON
    Snapshot {
        /// Also print Prometheus metrics
        #[arg(long)]
        metrics: bool,
    },
    /// Start a new bot pipeline
    StartBot(StartBotArgs),
    /// Stop a running pipeline
    StopBot {
        #[arg(long)]
        pipeline_id: u64,
    },
    /// Delete a pipeline
    DeleteBot {
        #[arg(long)]
        pipeline_id: u64,
    },
}

#[derive(Args, Debug)]
pub struct StartBotArgs {
    #[arg(long)]
    pub symbol: String,
    #[arg(long)]
    pub strategy: String,
    #[arg(long)]
    pub candle_size: String,
    #[arg(long)]
    pub exchange: String,
    /// Trade on the test account
    #[arg(long)]
    pub paper: bool,
    #[arg(long, default_value_t = 1)]
    pub leverage: u32,
    #[arg(long)]
    pub allocation: Option<Decimal>,
    #[arg(long)]
    pub color: Option<String>,
    /// Strategy parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, serde_json::Value)>,
}

impl StartBotArgs {
    pub fn into_request(self) -> StartBotRequest {
        StartBotRequest {
            symbol: self.symbol,
            strategy: self.strategy,
            candle_size: self.candle_size,
            exchanges: self.exchange,
            params: self.params.into_iter().collect(),
            paper_trading: self.paper,
            leverage: self.leverage,
            color: self.color,
            allocation: self.allocation,
        }
    }
}

/// `key=value`; the value is read as JSON when it parses, else as a string.
fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in {raw:?}"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
