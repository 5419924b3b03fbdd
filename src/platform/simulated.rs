//! In-process stand-in for the device platform.
//!
//! Every collaborator call is recorded so callers can check what the
//! orchestrator actually invoked and in which order. The permission prompt
//! is answered from a separate thread, as a real permission subsystem would.

use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use super::{
    ArCapability, CameraPermissions, InvalidKeyError, MapsKeyProvider, PermissionOutcome,
    PermissionResponder, PlatformError, PluginRegistrar,
};

/// How the simulated permission subsystem answers the camera prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CameraBehavior {
    #[default]
    Granted,
    Denied,
    /// Refuse to start the prompt
    Error,
    /// Start the prompt, then drop it without an answer
    Dropped,
    /// Start the prompt and never answer
    Never,
}

/// A collaborator call observed by the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    RegisterPlugins,
    RequestCameraAccess,
    IsArSupported,
    ProvideMapsKey(String),
}

/// Configurable fake for every platform collaborator.
#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    registration_error: Option<String>,
    ar_supported: bool,
    camera: CameraBehavior,
    camera_delay: Duration,
    reject_maps_key: bool,
    calls: Mutex<Vec<PlatformCall>>,
    unanswered: Mutex<Vec<PermissionResponder>>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_registration(mut self, reason: impl Into<String>) -> Self {
        self.registration_error = Some(reason.into());
        self
    }

    pub fn ar_supported(mut self, supported: bool) -> Self {
        self.ar_supported = supported;
        self
    }

    pub fn camera(mut self, behavior: CameraBehavior) -> Self {
        self.camera = behavior;
        self
    }

    pub fn camera_delay(mut self, delay: Duration) -> Self {
        self.camera_delay = delay;
        self
    }

    pub fn rejecting_maps_key(mut self) -> Self {
        self.reject_maps_key = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Keys handed to the mapping SDK.
    pub fn provided_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::ProvideMapsKey(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        debug!("Simulated platform call: {:?}", call);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl PluginRegistrar for SimulatedPlatform {
    fn register_plugins(&self) -> Result<(), PlatformError> {
        self.record(PlatformCall::RegisterPlugins);
        match &self.registration_error {
            Some(reason) => Err(PlatformError::Registration(reason.clone())),
            None => Ok(()),
        }
    }
}

impl CameraPermissions for SimulatedPlatform {
    fn request_camera_access(&self, responder: PermissionResponder) -> Result<(), PlatformError> {
        self.record(PlatformCall::RequestCameraAccess);

        let outcome = match self.camera {
            CameraBehavior::Granted => PermissionOutcome::Granted,
            CameraBehavior::Denied => PermissionOutcome::Denied,
            CameraBehavior::Error => {
                return Err(PlatformError::PermissionUnavailable(
                    "camera permission service unavailable".to_string(),
                ))
            }
            CameraBehavior::Never => {
                if let Ok(mut pending) = self.unanswered.lock() {
                    pending.push(responder);
                }
                return Ok(());
            }
            CameraBehavior::Dropped => {
                let delay = self.camera_delay;
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    drop(responder);
                });
                return Ok(());
            }
        };

        let delay = self.camera_delay;
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            responder.resolve(outcome);
        });
        Ok(())
    }
}

impl ArCapability for SimulatedPlatform {
    fn is_ar_supported(&self) -> bool {
        self.record(PlatformCall::IsArSupported);
        self.ar_supported
    }
}

impl MapsKeyProvider for SimulatedPlatform {
    fn provide_maps_key(&self, key: &str) -> Result<(), InvalidKeyError> {
        self.record(PlatformCall::ProvideMapsKey(key.to_string()));
        if key.trim().is_empty() {
            return Err(InvalidKeyError::Empty);
        }
        if self.reject_maps_key {
            return Err(InvalidKeyError::Rejected(
                "API key not valid for this application".to_string(),
            ));
        }
        Ok(())
    }
}
