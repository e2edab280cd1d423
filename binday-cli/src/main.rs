//! `binday`: tells you the evening before which bins go out tomorrow.
//!
//! Meant to be started by cron or a systemd timer; it exits on its own after one run.

mod channels;
mod cli;
mod extract;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use binday_core::{
    clock::SystemClock,
    config::Configuration,
    ports::RunError,
    service::{BindayService, RunOutcome},
};
use binday_recollect::RecollectSchedulePort;
use clap::Parser;
use reqwest::Client;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::channels::HttpChannels;
use crate::cli::Arguments;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; binday/", env!("CARGO_PKG_VERSION"), ")");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Arguments::parse();
    let config_path = args.config.clone().unwrap_or_else(Configuration::default_path);
    tracing::debug!("Using configuration at {}", config_path.display());

    if args.config_help {
        extract::print_config_help();
        return Ok(ExitCode::SUCCESS);
    }

    if args.extract_ids {
        let saved = extract::run(&config_path)?;
        return Ok(if saved {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // HTTP + service setup
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    let service = BindayService::new(
        Arc::new(SystemClock),
        Arc::new(RecollectSchedulePort::new(client.clone())),
        Arc::new(HttpChannels::new(client)),
    )
    .with_trigger_day(args.trigger_day);

    let outcome = service.run(&config_path, args.force).await;
    report(&outcome);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Skipped { .. } => {}
        RunOutcome::NoPickup { date } => tracing::info!("Nothing to put out for {date}"),
        RunOutcome::Dispatched { results, .. } => {
            let delivered = results.values().filter(|result| result.success).count();
            tracing::info!("Delivered through {delivered} of {} channels", results.len());
        }
        RunOutcome::Failed(RunError::Config(_) | RunError::Io(_)) => {
            tracing::error!("Run `binday --config-help` to learn how to find your identifiers");
        }
        RunOutcome::Failed(_) => tracing::error!("Failed to retrieve collection data"),
    }
}
