//! LT orchestrator binary.
//!
//! `lt-trading train [--start …] [--end …]` runs a one-shot supervised
//! training pass; `lt-trading run` starts the periodic prediction loop.
//! Configuration is loaded in layers (defaults → TOML file → `LT_*` env).

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::error;

use lt_core::config::AppConfig;
use lt_market_data::okx::OkxRestClient;
use lt_market_data::FetchRange;
use lt_ml::lstm::LstmFactory;
use lt_trading::context::InstrumentContext;
use lt_trading::{predict, train};

/// LT price-prediction orchestrator.
#[derive(Parser, Debug)]
#[command(name = "lt-trading", about = "Candle fetching, training, and prediction")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON logs instead of pretty output.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one supervised training pass and persist the model.
    Train {
        /// Range start: epoch milliseconds, RFC 3339, or `YYYY-MM-DD`.
        #[arg(long)]
        start: Option<String>,
        /// Range end, same formats as `--start`. Defaults to now.
        #[arg(long)]
        end: Option<String>,
    },
    /// Run the periodic prediction loop until interrupted.
    Run,
}

/// Parse a range bound: epoch milliseconds, RFC 3339, or a bare UTC date.
fn parse_bound(s: &str) -> Result<i64> {
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(date) = s.parse::<NaiveDate>() {
        let dt = date
            .and_hms_opt(0, 0, 0)
            .context("invalid midnight timestamp")?
            .and_utc();
        return Ok(dt.timestamp_millis());
    }
    anyhow::bail!("unrecognized time bound {s:?} (epoch ms, RFC 3339, or YYYY-MM-DD)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = AppConfig::load(args.config)?;

    lt_core::logging::init_tracing(args.json_logs);

    let ctx = InstrumentContext::from_config(&cfg);
    let source = OkxRestClient::new(&cfg.source)?;

    tracing::info!(
        inst_id = %ctx.inst_id,
        started_at = %Utc::now(),
        "starting lt-trading"
    );

    match args.command {
        Command::Train { start, end } => {
            let range = FetchRange {
                start: start.as_deref().map(parse_bound).transpose()?,
                end: end.as_deref().map(parse_bound).transpose()?,
            };
            if let Err(e) = train::run(&cfg, &ctx, source, Box::new(LstmFactory), range).await {
                error!(error = %e, "training run failed");
                return Err(e.into());
            }
            Ok(())
        }
        Command::Run => {
            predict::run_loop(&cfg, &ctx, source, Box::new(LstmFactory))
                .await
                .map_err(Into::into)
        }
    }
}
