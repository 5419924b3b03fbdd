//! Startup steps and the validated plan they run in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The known launch steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    RegisterPlugins,
    ProvisionMapsKey,
    RequestCameraAccess,
    CheckArSupport,
}

impl StepId {
    /// Human-readable identifier used in reports and logs
    pub fn name(&self) -> &'static str {
        match self {
            StepId::RegisterPlugins => "Register platform plugins",
            StepId::ProvisionMapsKey => "Provision mapping-service key",
            StepId::RequestCameraAccess => "Request camera access",
            StepId::CheckArSupport => "Check AR hardware support",
        }
    }

    /// How this step actually executes
    pub fn kind(&self) -> StepKind {
        match self {
            StepId::RequestCameraAccess => StepKind::AsynchronousCallback,
            _ => StepKind::Synchronous,
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a step completes inline or hands off to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Synchronous,
    AsynchronousCallback,
}

/// One unit of launch work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupStep {
    pub id: StepId,
    /// Failure aborts the launch instead of being logged.
    /// Only synchronous steps can be required.
    pub required: bool,
    pub kind: StepKind,
}

impl StartupStep {
    pub fn register_plugins() -> Self {
        Self {
            id: StepId::RegisterPlugins,
            required: true,
            kind: StepKind::Synchronous,
        }
    }

    pub fn provision_maps_key() -> Self {
        Self {
            id: StepId::ProvisionMapsKey,
            required: false,
            kind: StepKind::Synchronous,
        }
    }

    pub fn request_camera_access() -> Self {
        Self {
            id: StepId::RequestCameraAccess,
            required: false,
            kind: StepKind::AsynchronousCallback,
        }
    }

    pub fn check_ar_support() -> Self {
        Self {
            id: StepId::CheckArSupport,
            required: false,
            kind: StepKind::Synchronous,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("startup plan has no steps")]
    Empty,
    #[error("startup plan must begin with plugin registration, found {0}")]
    RegistrationNotFirst(StepId),
    #[error("plugin registration must be a required step")]
    RegistrationOptional,
    #[error("step listed more than once: {0}")]
    Duplicate(StepId),
    #[error("step declared with the wrong kind: {0}")]
    KindMismatch(StepId),
    #[error("asynchronous step cannot be required: {0}")]
    RequiredAsync(StepId),
}

/// An ordered, validated list of steps.
///
/// Registration is always first and required; every step appears once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPlan {
    steps: Vec<StartupStep>,
}

impl StartupPlan {
    pub fn new(steps: Vec<StartupStep>) -> Result<Self, PlanError> {
        let first = steps.first().ok_or(PlanError::Empty)?;
        if first.id != StepId::RegisterPlugins {
            return Err(PlanError::RegistrationNotFirst(first.id));
        }
        if !first.required {
            return Err(PlanError::RegistrationOptional);
        }

        for (index, step) in steps.iter().enumerate() {
            if steps[..index].iter().any(|earlier| earlier.id == step.id) {
                return Err(PlanError::Duplicate(step.id));
            }
            if step.kind != step.id.kind() {
                return Err(PlanError::KindMismatch(step.id));
            }
            // Its outcome may arrive after `run` returns, too late to abort.
            if step.required && step.kind == StepKind::AsynchronousCallback {
                return Err(PlanError::RequiredAsync(step.id));
            }
        }

        Ok(Self { steps })
    }

    /// Registration, maps key, camera, AR.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                StartupStep::register_plugins(),
                StartupStep::provision_maps_key(),
                StartupStep::request_camera_access(),
                StartupStep::check_ar_support(),
            ],
        }
    }

    pub fn steps(&self) -> &[StartupStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StartupPlan {
    fn default() -> Self {
        Self::standard()
    }
}
