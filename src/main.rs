// src/main.rs

//! ReleaseRacer CLI
//!
//! Boots the per-channel pollers, or runs one-shot scrape/validate
//! commands against the configured release channels.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use releaseracer::{
    error::{AppError, Result},
    models::{Config, ReleaseChannel},
    poller::{ChannelPoller, PollerSet},
    services::{BuildFetcher, BuildSource, Notification, Notifier, WebhookDestination},
    storage::{JsonStore, ReleaseTracker},
    utils::http,
};

/// ReleaseRacer - Discord build release poller
#[derive(Parser, Debug)]
#[command(name = "releaseracer", version, about = "Discord build release poller")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Boot the pollers and run until interrupted
    Run,

    /// Fetch build information for one channel and print it
    Scrape {
        /// Release channel name (stable, ptb, canary)
        channel: String,
    },

    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run => run(config).await,
        Command::Scrape { channel } => scrape(&config, &channel).await,
        Command::Validate => validate(&config),
    }
}

/// Boot one poller per configured channel and run until Ctrl-C.
async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let client = http::create_client(&config.http)?;

    let store = JsonStore::open(&config.storage.releases_file).await?;
    let tracker = Arc::new(ReleaseTracker::new(store));

    let fetcher: Arc<dyn BuildSource> = Arc::new(BuildFetcher::new(
        client.clone(),
        &config.poller.base_domain,
        Duration::from_secs(config.poller.download_timeout_secs),
    ));

    let mut notifier = Notifier::new();
    for feed in &config.feeds {
        let destination = WebhookDestination::new(&feed.id, &feed.url, client.clone());
        notifier.register(Arc::new(destination), feed.channels.iter());
    }
    log::info!("registered {} notification feeds", notifier.destination_count());

    let poller = Arc::new(ChannelPoller::new(
        fetcher,
        tracker,
        Arc::new(notifier),
        Duration::from_secs(config.poller.poll_interval_secs),
    ));

    let mut pollers = PollerSet::new(poller, config.poller.channels.clone());
    pollers.boot();

    tokio::signal::ctrl_c().await?;
    log::info!("shutting down");

    for (channel, status) in pollers.statuses() {
        log::info!("{channel}: {status}");
        if let Some(error) = pollers.last_error(channel) {
            log::info!("{channel}: last error: {error}");
        }
    }

    pollers.stop_all();
    pollers.join_all().await;
    Ok(())
}

/// One-shot fetch of a channel's build information.
async fn scrape(config: &Config, channel_name: &str) -> Result<()> {
    let channel: ReleaseChannel = channel_name.parse().map_err(AppError::config)?;

    let client = http::create_client(&config.http)?;
    let fetcher = BuildFetcher::new(
        client,
        &config.poller.base_domain,
        Duration::from_secs(config.poller.download_timeout_secs),
    );

    let build = fetcher.fetch(channel).await.map_err(AppError::from)?;
    let notification = Notification::render(&build);

    println!("{}", notification.title);
    println!("{}", notification.hash_listing);
    println!("Size: {}", notification.size);
    println!("{}", notification.footer);
    Ok(())
}

/// Check the configuration for basic sanity.
fn validate(config: &Config) -> Result<()> {
    config.validate()?;
    println!(
        "Configuration OK: {} channels, {} feeds, poll every {}s",
        config.poller.channels.len(),
        config.feeds.len(),
        config.poller.poll_interval_secs
    );
    Ok(())
}
