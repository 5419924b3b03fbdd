//! Launch orchestration.
//!
//! ```text
//! NotStarted -> Registering -> Fatal
//!                           -> ProvisioningOptionalSteps -> Completed
//! ```
//!
//! Synchronous steps run in plan order, each after the previous one has
//! returned. The camera prompt is fired in order but never awaited here:
//! its outcome is written into the report by a background task whenever
//! the platform answers, which may be after `run` has returned or never.

use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use super::report::{StartupPhase, StartupReport, StepDetail, StepStatus};
use super::step::{StartupPlan, StartupStep, StepId};
use crate::config::{LaunchConfig, MapsKey};
use crate::platform::{InvalidKeyError, PermissionRequest, Platform, PlatformError};

/// Why a single step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),
}

/// Failure of a step that is allowed to fail. Logged and recorded only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("optional step '{step}' failed: {source}")]
pub struct OptionalStepError {
    pub step: StepId,
    pub source: StepError,
}

/// A required step failed and the rest of the launch was abandoned.
#[derive(Debug, Error)]
#[error("startup aborted at '{step}': {source}")]
pub struct FatalBootstrapError {
    step: StepId,
    source: StepError,
    not_run: Vec<StepId>,
    report: StartupReport,
}

impl FatalBootstrapError {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn cause(&self) -> &StepError {
        &self.source
    }

    /// Steps that were planned but never started.
    pub fn not_run(&self) -> &[StepId] {
        &self.not_run
    }

    /// The report up to and including the failed step.
    pub fn report(&self) -> &StartupReport {
        &self.report
    }

    pub fn into_report(self) -> StartupReport {
        self.report
    }
}

enum StepRun {
    Done(StepStatus),
    /// Turned off by configuration; leaves no entry
    Disabled,
    /// Entry written as `Pending`; the outcome arrives later
    Fired,
}

/// Runs the launch plan against a set of platform collaborators.
///
/// Holds no per-run state: every call to [`run`](Self::run) starts a fresh
/// report and executes every step again.
///
/// # Example
/// ```ignore
/// let orchestrator = StartupOrchestrator::new(platform);
/// let report = orchestrator.run(&StartupPlan::standard(), &config)?;
/// // launch continues; the camera outcome lands in `report` later
/// ```
#[derive(Debug, Clone)]
pub struct StartupOrchestrator {
    platform: Platform,
}

impl StartupOrchestrator {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Run the standard plan.
    pub fn run_standard(&self, config: &LaunchConfig) -> Result<StartupReport, FatalBootstrapError> {
        self.run(&StartupPlan::standard(), config)
    }

    /// Execute `plan` once.
    ///
    /// Returns as soon as every synchronous step has been attempted. Only a
    /// failed required step produces an `Err`; everything else is in the
    /// report. Call from within a Tokio runtime, otherwise the camera step
    /// is recorded as failed.
    pub fn run(
        &self,
        plan: &StartupPlan,
        config: &LaunchConfig,
    ) -> Result<StartupReport, FatalBootstrapError> {
        let report = StartupReport::new();
        info!(
            run_id = %report.run_id(),
            "🚀 Starting launch bootstrap ({} steps)",
            plan.len()
        );
        report.set_phase(StartupPhase::Registering);

        let steps = plan.steps();
        for (index, step) in steps.iter().enumerate() {
            let status = match self.execute(step, config, &report) {
                Ok(StepRun::Done(status)) => status,
                Ok(StepRun::Disabled) => {
                    debug!("Step '{}' disabled by configuration", step.id);
                    continue;
                }
                Ok(StepRun::Fired) => continue,
                Err(source) if step.required => {
                    error!("❌ {} failed: {}", step.id, source);
                    report.record(
                        step.id,
                        StepStatus::Failed {
                            reason: source.to_string(),
                        },
                    );
                    report.set_phase(StartupPhase::Fatal);

                    let not_run: Vec<StepId> =
                        steps[index + 1..].iter().map(|step| step.id).collect();
                    if !not_run.is_empty() {
                        error!("   Abandoning {} remaining step(s)", not_run.len());
                    }
                    return Err(FatalBootstrapError {
                        step: step.id,
                        source,
                        not_run,
                        report,
                    });
                }
                Err(source) => {
                    let err = OptionalStepError {
                        step: step.id,
                        source,
                    };
                    warn!("⚠️  {}", err);
                    StepStatus::Failed {
                        reason: err.source.to_string(),
                    }
                }
            };

            report.record(step.id, status);
            if index == 0 {
                report.set_phase(StartupPhase::ProvisioningOptionalSteps);
            }
        }

        report.set_phase(StartupPhase::Completed);
        let pending = report.pending();
        if pending.is_empty() {
            info!("✅ Launch bootstrap complete");
        } else {
            info!(
                "✅ Launch bootstrap complete, {} step(s) awaiting the platform",
                pending.len()
            );
        }

        Ok(report)
    }

    fn execute(
        &self,
        step: &StartupStep,
        config: &LaunchConfig,
        report: &StartupReport,
    ) -> Result<StepRun, StepError> {
        match step.id {
            StepId::RegisterPlugins => {
                info!("🔌 Registering platform plugins...");
                self.platform.registrar.register_plugins()?;
                info!("✅ Plugins registered");
                Ok(StepRun::Done(StepStatus::succeeded()))
            }
            StepId::ProvisionMapsKey => match config.maps_key() {
                MapsKey::Absent => Ok(StepRun::Disabled),
                MapsKey::Placeholder => {
                    warn!("⚠️  Maps key is empty or a placeholder, not provisioning it");
                    Ok(StepRun::Done(StepStatus::Skipped {
                        reason: "maps key is empty or a placeholder".to_string(),
                    }))
                }
                MapsKey::Configured(key) => {
                    info!("🗺️  Provisioning mapping-service key...");
                    self.platform.maps.provide_maps_key(key)?;
                    Ok(StepRun::Done(StepStatus::succeeded()))
                }
            },
            StepId::CheckArSupport => {
                if !config.enable_ar_check {
                    return Ok(StepRun::Disabled);
                }
                let supported = self.platform.ar.is_ar_supported();
                info!("   AR supported: {}", supported);
                Ok(StepRun::Done(StepStatus::Succeeded {
                    detail: StepDetail::ArSupport(supported),
                }))
            }
            StepId::RequestCameraAccess => {
                if !config.enable_camera_check {
                    return Ok(StepRun::Disabled);
                }
                self.fire_camera_request(report)?;
                Ok(StepRun::Fired)
            }
        }
    }

    fn fire_camera_request(&self, report: &StartupReport) -> Result<(), PlatformError> {
        let handle = Handle::try_current().map_err(|_| PlatformError::NoRuntime)?;

        info!("📷 Requesting camera access...");
        let (responder, request) = PermissionRequest::channel();
        // Pending goes in first so a fast answer cannot be overwritten by it.
        report.record(StepId::RequestCameraAccess, StepStatus::Pending);
        self.platform.camera.request_camera_access(responder)?;

        let report = report.clone();
        handle.spawn(async move {
            let status = match request.await {
                Ok(outcome) => {
                    if outcome.is_granted() {
                        info!("✅ Camera permission granted");
                    } else {
                        warn!("⚠️  Camera permission denied");
                    }
                    StepStatus::Succeeded {
                        detail: StepDetail::Permission(outcome),
                    }
                }
                Err(err) => {
                    warn!("⚠️  Camera permission request failed: {}", err);
                    StepStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            report.record(StepId::RequestCameraAccess, status);
        });

        Ok(())
    }
}
