mod check;
mod run;

use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use invsync_core::{AppConfig, FetchMode, SourceFamily};
use invsync_ebay::{DryRunWriter, EbayClient, InventoryWriter};
use invsync_notify::{NoopNotifier, Notifier, TelegramNotifier};
use invsync_scraper::HttpFetcher;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::run::{Reconciler, RunOptions};

#[derive(Debug, Parser)]
#[command(name = "invsync")]
#[command(about = "Zero linked eBay quantities when source listings sell out")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile every ledger row once
    Run {
        /// Only process rows of this source family (e.g. mercari, amazon)
        #[arg(long)]
        source: Option<SourceFamily>,
        /// Log intended writes instead of calling eBay
        #[arg(long)]
        dry_run: bool,
        /// Override `INVSYNC_FETCH_MODE` (http or headless)
        #[arg(long)]
        fetch_mode: Option<FetchMode>,
        /// Repeat passes, sleeping `INVSYNC_LOOP_INTERVAL_MS` between them
        #[arg(long)]
        watch: bool,
    },
    /// Fetch one listing and print its signals and resolved status
    Check {
        url: String,
        #[arg(long, default_value = "http")]
        fetch_mode: FetchMode,
        #[arg(long, default_value_t = 25_000)]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            source,
            dry_run,
            fetch_mode,
            watch,
        }) => {
            let mut config = invsync_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            config.dry_run |= dry_run;
            if let Some(mode) = fetch_mode {
                config.fetch_mode = mode;
            }
            run_command(&config, source, watch).await
        }
        Some(Commands::Check {
            url,
            fetch_mode,
            timeout_ms,
        }) => {
            init_tracing("warn")?;
            check::run_check(&url, fetch_mode, timeout_ms).await
        }
        None => {
            println!("invsync: use `invsync run` to reconcile the ledger or `invsync check <url>` to inspect a listing");
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `fallback` is used as the filter directive.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

async fn run_command(
    config: &AppConfig,
    source: Option<SourceFamily>,
    watch: bool,
) -> anyhow::Result<()> {
    let reconciler = build_reconciler(config, source)?;
    tracing::info!(
        ledger = %config.ledger_source,
        fetch_mode = %config.fetch_mode,
        dry_run = config.dry_run,
        source = ?source,
        watch,
        "invsync starting"
    );

    loop {
        let run_id = Uuid::new_v4();
        let pass = run_pass(&reconciler, config)
            .instrument(tracing::info_span!("reconcile_run", %run_id));

        match pass.await {
            Ok(()) => {}
            Err(e) if watch => tracing::error!(error = %e, "pass aborted, retrying next interval"),
            Err(e) => return Err(e),
        }

        if !watch {
            return Ok(());
        }

        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(config.loop_interval_ms)) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping watch loop");
                return Ok(());
            }
        }
    }
}

async fn run_pass(reconciler: &Reconciler, config: &AppConfig) -> anyhow::Result<()> {
    let started = Utc::now();
    let rows = invsync_ledger::load_ledger(&config.ledger_source, config.request_timeout_ms).await?;

    let summary = reconciler.run_pass(&rows).await;

    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    tracing::info!(
        rows = rows.len(),
        matched = summary.matched,
        skipped_no_identifier = summary.skipped_no_identifier,
        unknown = summary.unknown,
        no_action = summary.no_action,
        suppressed = summary.suppressed,
        zeroed = summary.zeroed,
        failed = summary.failed,
        fetch_failures = summary.fetch_failures,
        writes = summary.writes_attempted(),
        elapsed_ms,
        "reconcile pass complete"
    );
    Ok(())
}

fn build_reconciler(config: &AppConfig, source: Option<SourceFamily>) -> anyhow::Result<Reconciler> {
    let fetcher = HttpFetcher::from_config(config)?;

    let writer: Box<dyn InventoryWriter> = if config.dry_run {
        Box::new(DryRunWriter)
    } else {
        let credentials = config.ebay.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "EBAY_AUTH_TOKEN, EBAY_DEV_ID, EBAY_APP_ID and EBAY_CERT_ID are required unless --dry-run is set"
            )
        })?;
        Box::new(EbayClient::with_endpoint(
            credentials,
            config.ebay_site_id,
            config.request_timeout_ms,
            &config.ebay_endpoint,
        )?)
    };

    let notifier: Box<dyn Notifier> = match &config.telegram {
        Some(telegram) => Box::new(TelegramNotifier::new(telegram)?),
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set, notifications are disabled");
            Box::new(NoopNotifier)
        }
    };

    Ok(Reconciler::new(
        Box::new(fetcher),
        writer,
        notifier,
        RunOptions {
            source_filter: source,
            notify_fetch_failures: config.notify_fetch_failures,
        },
    ))
}
