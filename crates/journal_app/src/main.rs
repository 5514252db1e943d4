//! Command-line runner: resolves the batch inputs from flags and relays
//! progress to the log. All automation lives in `journal_engine`.

mod logging;

use std::time::Duration;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::LevelFilter;

use journal_core::{Credentials, DateRange};
use journal_engine::{BatchEvent, BatchHandle, BatchInputs, BatchSettings, WebDriverSettings};
use journal_logging::{journal_error, journal_info, journal_warn};

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "journal-autofill", version, about = "Daily journal auto-fill runner")]
struct Args {
    /// Login page of the target system.
    #[arg(long, default_value = "https://psf.nchu.edu.tw/punch/Menu.jsp")]
    endpoint: String,

    /// Account identifier.
    #[arg(long)]
    account: String,

    /// Account secret.
    #[arg(long, env = "JOURNAL_SECRET", hide_env_values = true)]
    secret: String,

    /// Category identifier selected on each entry.
    #[arg(long)]
    category: String,

    /// First date to fill, ISO format (e.g. 2024-01-01).
    #[arg(long)]
    start: NaiveDate,

    /// Last date to fill, inclusive.
    #[arg(long)]
    end: NaiveDate,

    /// Free-text content filled into every entry.
    #[arg(long)]
    content: String,

    /// Seconds to wait between one submission and the next.
    #[arg(long, default_value_t = 1)]
    delay: u64,

    /// Address of the running WebDriver server.
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Also write logs to ./journal.log.
    #[arg(long)]
    log_file: bool,

    /// Log at debug level.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let destination = if args.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(destination, level);

    if args.start > args.end {
        bail!("start date {} is after end date {}", args.start, args.end);
    }
    if args.content.trim().is_empty() {
        bail!("content must not be empty");
    }
    if args.delay == 0 {
        bail!("delay must be a positive number of seconds");
    }

    let inputs = BatchInputs {
        credentials: Credentials {
            endpoint: args.endpoint,
            account: args.account,
            secret: args.secret,
        },
        category: args.category,
        range: DateRange::new(args.start, args.end),
        base_content: args.content,
        inter_submission_delay: Duration::from_secs(args.delay),
    };
    let webdriver = WebDriverSettings {
        server_url: args.webdriver_url,
        headless: args.headless,
        ..WebDriverSettings::default()
    };

    journal_info!(
        "filling {} through {} ({} day(s))",
        inputs.range.start,
        inputs.range.end,
        inputs.range.days().len()
    );

    let handle = BatchHandle::spawn(webdriver, BatchSettings::default(), inputs);
    while let Some(event) = handle.recv() {
        match event {
            BatchEvent::Progress(progress) => {
                journal_info!(
                    "progress {}/{}: {} succeeded, {} failed",
                    progress.processed,
                    progress.total,
                    progress.succeeded,
                    progress.failed
                );
            }
            BatchEvent::Fault { message } => {
                journal_error!("batch fault: {message}");
            }
            BatchEvent::Completed { result } => {
                journal_info!(
                    "done: {}/{} processed, {} succeeded, {} failed",
                    result.processed(),
                    result.total,
                    result.succeeded,
                    result.failed
                );
                for record in &result.records {
                    journal_info!("  {} -> {:?}", record.date, record.outcome);
                }
                if result.total > 0 && result.failed == result.total {
                    journal_warn!("every day failed; check the log for field roles");
                }
                if result.failed > 0 || result.total == 0 {
                    std::process::exit(1);
                }
                break;
            }
        }
    }

    Ok(())
}
