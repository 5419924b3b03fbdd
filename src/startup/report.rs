//! Startup report.
//!
//! The report is written by the launch path and, later, by the task that
//! receives the camera permission outcome. It lives in a `watch` channel so
//! writers are serialized and readers can wait for late entries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use super::step::StepId;
use crate::platform::PermissionOutcome;

/// Orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupPhase {
    #[default]
    NotStarted,
    Registering,
    ProvisioningOptionalSteps,
    Fatal,
    Completed,
}

impl StartupPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StartupPhase::Fatal | StartupPhase::Completed)
    }
}

/// Data recorded alongside a successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDetail {
    None,
    Permission(PermissionOutcome),
    ArSupport(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// Fired, outcome not delivered yet
    Pending,
    Succeeded { detail: StepDetail },
    Failed { reason: String },
    Skipped { reason: String },
}

impl StepStatus {
    pub fn succeeded() -> Self {
        StepStatus::Succeeded {
            detail: StepDetail::None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StepStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepStatus::Skipped { .. })
    }

    pub fn detail(&self) -> Option<StepDetail> {
        match self {
            StepStatus::Succeeded { detail } => Some(*detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub step: StepId,
    pub name: &'static str,
    #[serde(flatten)]
    pub status: StepStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ReportState {
    phase: StartupPhase,
    entries: Vec<ReportEntry>,
}

/// Serializable point-in-time copy of a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phase: StartupPhase,
    pub entries: Vec<ReportEntry>,
}

/// Outcome of one launch, keyed by step.
///
/// Clones share the same underlying report.
#[derive(Debug, Clone)]
pub struct StartupReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    state: Arc<watch::Sender<ReportState>>,
}

impl StartupReport {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(ReportState::default());
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: Arc::new(tx),
        }
    }

    /// Record a step's status.
    ///
    /// A step may move from `Pending` to a terminal status once; any later
    /// write for the same step is ignored and `false` is returned.
    pub(crate) fn record(&self, step: StepId, status: StepStatus) -> bool {
        let mut accepted = true;
        self.state.send_modify(|state| {
            let now = Utc::now();
            match state.entries.iter_mut().find(|entry| entry.step == step) {
                Some(entry) if entry.status.is_pending() => {
                    entry.status = status;
                    entry.updated_at = now;
                }
                Some(_) => accepted = false,
                None => state.entries.push(ReportEntry {
                    step,
                    name: step.name(),
                    status,
                    updated_at: now,
                }),
            }
        });
        if !accepted {
            warn!("Ignoring duplicate outcome for step '{}'", step);
        }
        accepted
    }

    pub(crate) fn set_phase(&self, phase: StartupPhase) {
        self.state.send_modify(|state| state.phase = phase);
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn phase(&self) -> StartupPhase {
        self.state.borrow().phase
    }

    /// Entries in the order their steps first reported.
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.state.borrow().entries.clone()
    }

    pub fn status(&self, step: StepId) -> Option<StepStatus> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|entry| entry.step == step)
            .map(|entry| entry.status.clone())
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.status(step).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Steps fired but not yet resolved.
    pub fn pending(&self) -> Vec<StepId> {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.status.is_pending())
            .map(|entry| entry.step)
            .collect()
    }

    pub fn is_settled(&self) -> bool {
        self.pending().is_empty()
    }

    /// Wait until no step is pending.
    ///
    /// A permission prompt may never be answered; wrap this in a timeout.
    pub async fn settled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx
            .wait_for(|state| state.entries.iter().all(|entry| !entry.status.is_pending()))
            .await;
    }

    /// Wait for a step to leave `Pending`. `None` if the step never ran.
    pub async fn wait_for_step(&self, step: StepId) -> Option<StepStatus> {
        let mut rx = self.state.subscribe();
        let _ = rx
            .wait_for(|state| {
                state
                    .entries
                    .iter()
                    .find(|entry| entry.step == step)
                    .map_or(true, |entry| !entry.status.is_pending())
            })
            .await;
        self.status(step)
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        let state = self.state.borrow();
        ReportSnapshot {
            run_id: self.run_id,
            started_at: self.started_at,
            phase: state.phase,
            entries: state.entries.clone(),
        }
    }
}
