//! Launch configuration.
//!
//! The host supplies a single flat record at launch. It can be read from a
//! JSON file, overridden from the environment, and finally overridden by
//! whoever builds the record in code (the CLI does this with its flags).
//!
//! ```json
//! {
//!   "googleMapsKey": "AIza...",
//!   "enableARCheck": true,
//!   "enableCameraCheck": true
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable overriding the mapping-service key
pub const MAPS_KEY_ENV: &str = "LAUNCH_GOOGLE_MAPS_KEY";

/// Environment variable toggling the AR hardware probe
pub const AR_CHECK_ENV: &str = "LAUNCH_ENABLE_AR_CHECK";

/// Environment variable toggling the camera permission request
pub const CAMERA_CHECK_ENV: &str = "LAUNCH_ENABLE_CAMERA_CHECK";

/// Configuration record consumed by the startup orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    /// Mapping-service API key. `None` means the host never configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_key: Option<String>,

    /// Probe the device for AR hardware support
    #[serde(default = "default_true", rename = "enableARCheck")]
    pub enable_ar_check: bool,

    /// Ask the platform for camera access
    #[serde(default = "default_true")]
    pub enable_camera_check: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            google_maps_key: None,
            enable_ar_check: true,
            enable_camera_check: true,
        }
    }
}

/// How the configured mapping-service key should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapsKey<'a> {
    /// No key was configured at all
    Absent,
    /// A blank or sentinel value that must never be sent to the service
    Placeholder,
    /// A real-looking key
    Configured(&'a str),
}

impl std::fmt::Display for MapsKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapsKey::Absent => write!(f, "absent"),
            MapsKey::Placeholder => write!(f, "placeholder"),
            // Never print the key itself
            MapsKey::Configured(_) => write!(f, "configured"),
        }
    }
}

impl LaunchConfig {
    /// Default config file location (`<config dir>/launch-bootstrap/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("launch-bootstrap").join("config.json"))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No launch config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read launch config: {:?}", path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse launch config JSON: {:?}", path))
    }

    /// Apply `LAUNCH_*` environment overrides on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(MAPS_KEY_ENV) {
            self.google_maps_key = Some(key);
        }
        if let Some(enabled) = env_flag(AR_CHECK_ENV) {
            self.enable_ar_check = enabled;
        }
        if let Some(enabled) = env_flag(CAMERA_CHECK_ENV) {
            self.enable_camera_check = enabled;
        }
        self
    }

    /// Classify the configured mapping-service key.
    pub fn maps_key(&self) -> MapsKey<'_> {
        match self.google_maps_key.as_deref() {
            None => MapsKey::Absent,
            Some(key) if is_placeholder_key(key) => MapsKey::Placeholder,
            Some(key) => MapsKey::Configured(key.trim()),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring {}={:?}: expected a boolean", name, other);
            None
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(your[_-].*|<[^>]*>|changeme)$").expect("placeholder pattern is valid")
    })
}

/// Whether a key is blank or a sentinel such as `YOUR_GOOGLE_MAPS_API_KEY`.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || placeholder_pattern().is_match(key)
}
