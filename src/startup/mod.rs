//! Startup orchestration.
//!
//! This module runs the launch sequence once per call:
//! - register platform plugins (required, always first)
//! - provision the mapping-service key (optional)
//! - request camera access (optional, answered asynchronously)
//! - check AR hardware support (optional, informational)
//!
//! Only a failed required step stops the launch. Everything else, including
//! a denied permission or missing AR hardware, is recorded in the report.

mod orchestrator;
mod report;
mod step;
#[cfg(test)]
mod tests;

pub use orchestrator::{FatalBootstrapError, OptionalStepError, StartupOrchestrator, StepError};
pub use report::{
    ReportEntry, ReportSnapshot, StartupPhase, StartupReport, StepDetail, StepStatus,
};
pub use step::{PlanError, StartupPlan, StartupStep, StepId, StepKind};
