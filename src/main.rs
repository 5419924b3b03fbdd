use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use launch_bootstrap::platform::simulated::SimulatedPlatform;
use launch_bootstrap::{
    logging, LaunchConfig, Platform, StartupOrchestrator, StartupReport, StepDetail, StepStatus,
};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = resolve_config(&cli)?;
    debug!(
        "Launch config: maps key {}, AR check {}, camera check {}",
        config.maps_key(),
        config.enable_ar_check,
        config.enable_camera_check
    );

    let platform = Arc::new(build_platform(&cli));
    let orchestrator = StartupOrchestrator::new(Platform::from_shared(platform));

    match orchestrator.run_standard(&config) {
        Ok(report) => {
            let wait = Duration::from_millis(cli.wait_ms);
            if tokio::time::timeout(wait, report.settled()).await.is_err() {
                warn!(
                    "⚠️  Still waiting on {} step(s) after {:?}",
                    report.pending().len(),
                    wait
                );
            }
            print_report(&report, cli.json)?;
            Ok(())
        }
        Err(err) => {
            print_report(err.report(), cli.json)?;
            Err(err).context("Launch bootstrap aborted")
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<LaunchConfig> {
    let mut config = match cli.config.clone().or_else(LaunchConfig::default_path) {
        Some(path) => LaunchConfig::load(&path)?,
        None => LaunchConfig::default(),
    }
    .with_env_overrides();

    if let Some(key) = &cli.maps_key {
        config.google_maps_key = Some(key.clone());
    }
    if cli.no_ar_check {
        config.enable_ar_check = false;
    }
    if cli.no_camera_check {
        config.enable_camera_check = false;
    }

    Ok(config)
}

fn build_platform(cli: &Cli) -> SimulatedPlatform {
    let mut platform = SimulatedPlatform::new()
        .ar_supported(cli.ar_supported)
        .camera(cli.camera)
        .camera_delay(Duration::from_millis(cli.camera_delay_ms));
    if cli.fail_registration {
        platform = platform.failing_registration("incompatible plugin state");
    }
    if cli.reject_maps_key {
        platform = platform.rejecting_maps_key();
    }
    platform
}

fn print_report(report: &StartupReport, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(&report.snapshot())
            .context("Failed to serialize startup report")?;
        println!("{}", output);
        return Ok(());
    }

    println!("Launch {} ({:?})", report.run_id(), report.phase());
    for entry in report.entries() {
        let line = match &entry.status {
            StepStatus::Pending => "⏳ pending".to_string(),
            StepStatus::Succeeded { detail } => match detail {
                StepDetail::None => "✅ succeeded".to_string(),
                StepDetail::Permission(outcome) => format!("✅ succeeded ({})", outcome),
                StepDetail::ArSupport(supported) => {
                    format!("✅ succeeded (supported: {})", supported)
                }
            },
            StepStatus::Failed { reason } => format!("❌ failed: {}", reason),
            StepStatus::Skipped { reason } => format!("⏭️  skipped: {}", reason),
        };
        println!("   {}: {}", entry.name, line);
    }

    Ok(())
}
