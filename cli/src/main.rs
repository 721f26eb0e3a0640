// adrail — ad presentation coordinator demo CLI
//
// Drives a scripted banner/interstitial session against the simulated
// collaborators so the whole lifecycle can be watched from a terminal.

mod config;

use adrail_core::sim::{
    SimulatedAdNetwork, SimulatedConnectivity, SimulatedLifecycle, SimulatedViewHost,
};
use adrail_core::{AdKind, AdPresentationCoordinator};
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "adrail")]
#[command(about = "adrail — banner and interstitial ad session demo", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted ad session
    Run {
        /// Override the number of interstitial present/dismiss cycles
        #[arg(short, long)]
        presentations: Option<u32>,
    },
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { presentations } => cmd_run(presentations).await,
        Commands::Config { action } => cmd_config(action),
    }
}

async fn cmd_run(presentations: Option<u32>) -> Result<()> {
    let mut config = config::Config::load()?;
    if let Some(presentations) = presentations {
        config.demo.presentations = presentations;
    }
    let step = Duration::from_millis(config.demo.step_millis);

    let network = Arc::new(SimulatedAdNetwork::new());
    let host = Arc::new(SimulatedViewHost::new());
    let lifecycle = Arc::new(SimulatedLifecycle::new(true));
    let connectivity = Arc::new(SimulatedConnectivity::new(true));
    let coordinator = AdPresentationCoordinator::new(
        network.clone(),
        host.clone(),
        lifecycle.clone(),
        connectivity.clone(),
    );

    let frame_before = host.host_frame();

    println!("{}", "Starting ad session".bold());
    coordinator.configure(config.ads.clone())?;
    coordinator.start()?;
    println!(
        "  host wrapped, banner region at {} ({})",
        config.ads.placement,
        host.banner_frame()
            .map(|f| format!("{}x{}", f.width, f.height))
            .unwrap_or_else(|| "-".to_string())
    );
    tokio::time::sleep(step).await;

    // Initial loads complete.
    if let Some(handle) = network.complete(AdKind::Banner) {
        tracing::info!(%handle, "delivering banner load completion");
        coordinator.on_ad_loaded(handle);
    }
    if let Some(handle) = network.complete(AdKind::Interstitial) {
        tracing::info!(%handle, "delivering interstitial load completion");
        coordinator.on_ad_loaded(handle);
    }
    println!("  banner visible: {}", host.attached_banner().is_some());
    tokio::time::sleep(step).await;

    // Rotate to landscape and back.
    println!("{}", "Rotating device".bold());
    coordinator.on_orientation_will_change(false);
    println!(
        "  banner height now {}",
        host.banner_frame().map(|f| f.height).unwrap_or(0)
    );
    tokio::time::sleep(step).await;
    coordinator.on_orientation_will_change(true);

    // Drop connectivity, then recover; the edge triggers one reload cycle.
    println!("{}", "Simulating connectivity drop".bold());
    coordinator.on_unreachable();
    tokio::time::sleep(step).await;
    coordinator.on_reachable();
    if let Some(handle) = network.complete(AdKind::Banner) {
        coordinator.on_ad_loaded(handle);
    }
    if let Some(handle) = network.complete(AdKind::Interstitial) {
        coordinator.on_ad_loaded(handle);
    }

    // Interstitial cycles, the way a tab switch would trigger them.
    for round in 1..=config.demo.presentations {
        println!("{}", format!("Interstitial cycle {}", round).bold());
        let presented = coordinator.present_interstitial()?;
        println!("  presented: {}", presented);
        if presented {
            tokio::time::sleep(step).await;
            coordinator.on_interstitial_dismissed();
            if let Some(handle) = network.complete(AdKind::Interstitial) {
                coordinator.on_ad_loaded(handle);
            }
        }
    }

    println!("{}", "Stopping ad session".bold());
    coordinator.stop()?;
    let restored = host.host_frame() == frame_before && !host.is_wrapped();
    println!(
        "  layout restored: {}",
        if restored {
            "yes".green()
        } else {
            "no".red()
        }
    );
    tracing::info!(state = %coordinator.state(), "session ended");

    let stats = coordinator.stats();
    println!();
    println!("{}", "Session summary".bold());
    println!("  banner requests:       {}", stats.banner_requests);
    println!("  interstitial requests: {}", stats.interstitial_requests);
    println!("  presentations:         {}", stats.presentations);
    println!("  load failures:         {}", stats.load_failures);

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = config::Config::load()?;

    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} {} = {}", "set".green(), key, value);
        }
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{} = {}", key, value),
            None => anyhow::bail!("Unknown config key: {}", key),
        },
        ConfigAction::List => {
            for (key, value) in config.list() {
                println!("{:<20} {}", key, value);
            }
        }
    }

    Ok(())
}
