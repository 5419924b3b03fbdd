//! One-shot camera permission hand-off.
//!
//! The platform resolves a permission prompt on its own schedule. The
//! responder half goes to the platform, the request half stays with the
//! orchestrator and is awaited off the launch path.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::PlatformError;

/// The user's answer to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

impl PermissionOutcome {
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            PermissionOutcome::Granted
        } else {
            PermissionOutcome::Denied
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionOutcome::Granted)
    }
}

impl std::fmt::Display for PermissionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionOutcome::Granted => write!(f, "granted"),
            PermissionOutcome::Denied => write!(f, "denied"),
        }
    }
}

/// Platform-side half of a permission request. Consumed by [`resolve`].
///
/// Dropping it without resolving means the platform gave up on the request.
///
/// [`resolve`]: PermissionResponder::resolve
#[derive(Debug)]
pub struct PermissionResponder {
    tx: oneshot::Sender<PermissionOutcome>,
}

impl PermissionResponder {
    /// Deliver the outcome. Returns `false` if nobody is listening anymore.
    pub fn resolve(self, outcome: PermissionOutcome) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

/// Orchestrator-side half: resolves once the platform answers.
#[derive(Debug)]
pub struct PermissionRequest {
    rx: oneshot::Receiver<PermissionOutcome>,
}

impl PermissionRequest {
    pub fn channel() -> (PermissionResponder, PermissionRequest) {
        let (tx, rx) = oneshot::channel();
        (PermissionResponder { tx }, PermissionRequest { rx })
    }
}

impl Future for PermissionRequest {
    type Output = Result<PermissionOutcome, PlatformError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| PlatformError::PermissionAbandoned))
    }
}
