// Wgsentry - Telegram control and health monitoring for wg-easy
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use wgsentry::bot::Bot;
use wgsentry::commands::CommandService;
use wgsentry::config::Config;
use wgsentry::monitor::Monitor;
use wgsentry::probe::DockerRuntime;
use wgsentry::telegram::{AdminNotifier, TelegramClient};
use wgsentry::version::build_info;

#[derive(Parser, Debug)]
#[command(name = "wgsentry")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    /// Show detailed build information
    #[arg(long)]
    build_info: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle version flag
    if cli.version {
        println!("{}", build_info().format_display());
        return Ok(());
    }

    // Handle build info flag
    if cli.build_info {
        println!("{}", build_info().format_display());
        println!("\n{}", build_info().format_build_info());
        return Ok(());
    }

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Fail fast on missing configuration, before any loop starts
    let config = Config::from_env()?;
    tracing::info!(
        "wgsentry starting, watching container '{}'",
        config.container_name
    );

    run_bot(config).await
}

async fn run_bot(config: Config) -> Result<()> {
    let runtime = Arc::new(DockerRuntime::new(&config.container_name));
    let client = TelegramClient::new(&config.telegram_token)?;
    let notifier = Arc::new(AdminNotifier::new(client.clone(), config.admin_id));

    let monitor = Arc::new(Monitor::new(
        runtime.clone(),
        notifier,
        config.container_name.clone(),
        config.monitor_interval,
    ));
    monitor.start();

    let commands = CommandService::new(
        runtime.clone(),
        runtime,
        monitor.clone(),
        config.wg_easy_url.clone(),
    )?;
    let bot = Bot::new(client, commands, config.admin_id);

    let result = tokio::select! {
        result = bot.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    };

    monitor.stop().await;
    println!("Wgsentry exited. Goodbye!");
    result
}
