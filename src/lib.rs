//! Launch-time startup orchestration.
//!
//! Registers platform plugins, then runs the optional launch steps (maps key
//! provisioning, camera permission prompt, AR capability probe) against
//! injected platform collaborators, collecting the outcome in a
//! [`StartupReport`].

pub mod config;
pub mod logging;
pub mod platform;
pub mod startup;

pub use config::{is_placeholder_key, LaunchConfig, MapsKey};
pub use platform::{
    ArCapability, CameraPermissions, InvalidKeyError, MapsKeyProvider, PermissionOutcome,
    PermissionRequest, PermissionResponder, Platform, PlatformError, PluginRegistrar,
};
pub use startup::{
    FatalBootstrapError, OptionalStepError, PlanError, ReportEntry, ReportSnapshot, StartupPhase,
    StartupOrchestrator, StartupPlan, StartupReport, StartupStep, StepDetail, StepError, StepId,
    StepKind, StepStatus,
};
