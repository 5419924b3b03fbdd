//! Platform collaborators.
//!
//! The orchestrator never talks to the device directly. Plugin registration,
//! the camera permission prompt, the AR capability query and the mapping SDK
//! sit behind these traits so that launch policy can be exercised with fakes.

mod permission;
pub mod simulated;

use std::sync::Arc;

use thiserror::Error;

pub use permission::{PermissionOutcome, PermissionRequest, PermissionResponder};

/// Failure of a platform service itself, as opposed to a negative answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Plugins could not be registered (incompatible plugin state)
    #[error("plugin registration failed: {0}")]
    Registration(String),
    /// The permission subsystem refused to start the request
    #[error("permission request could not be issued: {0}")]
    PermissionUnavailable(String),
    /// The permission subsystem dropped the request without answering
    #[error("permission request was abandoned by the platform")]
    PermissionAbandoned,
    /// No async runtime to await a callback on
    #[error("no async runtime available to receive the permission outcome")]
    NoRuntime,
}

/// Rejection of a mapping-service key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidKeyError {
    #[error("maps key is empty")]
    Empty,
    #[error("maps key is a placeholder: {0}")]
    Placeholder(String),
    #[error("maps key was rejected: {0}")]
    Rejected(String),
}

/// Registers third-party plugins. Must succeed before anything else runs.
pub trait PluginRegistrar: Send + Sync {
    fn register_plugins(&self) -> Result<(), PlatformError>;
}

/// Issues the camera permission prompt.
///
/// Implementations return immediately and resolve `responder` later, from
/// any thread, at most once. An `Err` means the prompt never started.
pub trait CameraPermissions: Send + Sync {
    fn request_camera_access(&self, responder: PermissionResponder) -> Result<(), PlatformError>;
}

/// Answers whether the device supports AR sessions.
pub trait ArCapability: Send + Sync {
    fn is_ar_supported(&self) -> bool;
}

/// Hands the API key to the mapping SDK.
pub trait MapsKeyProvider: Send + Sync {
    fn provide_maps_key(&self, key: &str) -> Result<(), InvalidKeyError>;
}

/// The set of collaborators a launch runs against.
#[derive(Clone)]
pub struct Platform {
    pub registrar: Arc<dyn PluginRegistrar>,
    pub camera: Arc<dyn CameraPermissions>,
    pub ar: Arc<dyn ArCapability>,
    pub maps: Arc<dyn MapsKeyProvider>,
}

impl Platform {
    pub fn new(
        registrar: Arc<dyn PluginRegistrar>,
        camera: Arc<dyn CameraPermissions>,
        ar: Arc<dyn ArCapability>,
        maps: Arc<dyn MapsKeyProvider>,
    ) -> Self {
        Self {
            registrar,
            camera,
            ar,
            maps,
        }
    }

    /// Use one object for every collaborator.
    pub fn from_shared<P>(platform: Arc<P>) -> Self
    where
        P: PluginRegistrar + CameraPermissions + ArCapability + MapsKeyProvider + 'static,
    {
        Self {
            registrar: platform.clone(),
            camera: platform.clone(),
            ar: platform.clone(),
            maps: platform,
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
