use std::path::PathBuf;

use clap::Parser;
use launch_bootstrap::platform::simulated::CameraBehavior;

/// Launch bootstrap - rehearse the app launch sequence against a simulated platform
#[derive(Parser)]
#[command(name = "launch-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Launch config file (defaults to <config dir>/launch-bootstrap/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Mapping-service API key
    #[arg(long)]
    pub maps_key: Option<String>,

    /// Skip the AR hardware check
    #[arg(long)]
    pub no_ar_check: bool,

    /// Skip the camera permission request
    #[arg(long)]
    pub no_camera_check: bool,

    /// Make plugin registration fail
    #[arg(long)]
    pub fail_registration: bool,

    /// Make the mapping SDK reject the key
    #[arg(long)]
    pub reject_maps_key: bool,

    /// Whether the simulated device supports AR
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub ar_supported: bool,

    /// How the simulated user answers the camera prompt
    #[arg(long, value_enum, default_value_t = CameraBehavior::Granted)]
    pub camera: CameraBehavior,

    /// Delay before the camera prompt is answered
    #[arg(long, default_value_t = 0)]
    pub camera_delay_ms: u64,

    /// How long to wait for asynchronous steps before printing the report
    #[arg(long, default_value_t = 2000)]
    pub wait_ms: u64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
