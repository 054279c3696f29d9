//! Interaction observers.
//!
//! The gateway reports every verb it performs as an [`InteractionEvent`].
//! [`TracingObserver`] forwards events to `tracing`; [`RecordingObserver`]
//! keeps them in memory so tests can assert on diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Gateway verb an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Element resolution
    Resolve,
    /// Clear and type
    Type,
    /// Click
    Click,
    /// Read rendered text
    ReadText,
    /// Read control value
    ReadValue,
    /// Read an attribute
    ReadAttribute,
    /// Select a dropdown option
    Select,
    /// Visibility or presence probe
    Probe,
    /// Wait for a dialog
    WaitForAlert,
    /// Accept a dialog
    AcceptAlert,
    /// Dismiss a dialog
    DismissAlert,
    /// Navigation
    Navigate,
    /// Script execution
    Script,
    /// Attribute assertion
    Assert,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolve => "resolve",
            Self::Type => "type",
            Self::Click => "click",
            Self::ReadText => "read_text",
            Self::ReadValue => "read_value",
            Self::ReadAttribute => "read_attribute",
            Self::Select => "select",
            Self::Probe => "probe",
            Self::WaitForAlert => "wait_for_alert",
            Self::AcceptAlert => "accept_alert",
            Self::DismissAlert => "dismiss_alert",
            Self::Navigate => "navigate",
            Self::Script => "script",
            Self::Assert => "assert",
        })
    }
}

/// How a verb ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The verb completed
    Succeeded,
    /// A visibility or presence check found nothing in time
    Absent,
    /// The verb failed
    Failed {
        /// Error description
        reason: String,
    },
}

impl Outcome {
    /// Whether the verb failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One gateway verb and its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Unique event id
    pub id: String,
    /// Verb performed
    pub action: Action,
    /// Locator or URL the verb targeted
    pub target: String,
    /// Outcome
    pub outcome: Outcome,
    /// Wall time spent, in milliseconds
    pub elapsed_ms: u64,
}

impl InteractionEvent {
    /// Create an event
    #[must_use]
    pub fn new(action: Action, target: impl Into<String>, outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            target: target.into(),
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Receives gateway events
pub trait InteractionObserver: Send {
    /// Handle one event
    fn record(&mut self, event: &InteractionEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl InteractionObserver for TracingObserver {
    fn record(&mut self, event: &InteractionEvent) {
        match &event.outcome {
            Outcome::Succeeded => tracing::info!(
                action = %event.action,
                target = %event.target,
                elapsed_ms = event.elapsed_ms,
                "interaction succeeded"
            ),
            Outcome::Absent => tracing::debug!(
                action = %event.action,
                target = %event.target,
                elapsed_ms = event.elapsed_ms,
                "nothing matched"
            ),
            Outcome::Failed { reason } => tracing::warn!(
                action = %event.action,
                target = %event.target,
                elapsed_ms = event.elapsed_ms,
                %reason,
                "interaction failed"
            ),
        }
    }
}

/// Stores events in a shared buffer; clones share the buffer
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    #[must_use]
    pub fn events(&self) -> Vec<InteractionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded failures
    #[must_use]
    pub fn failures(&self) -> Vec<InteractionEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.outcome.is_failure())
            .collect()
    }

    /// Number of recorded events for `action`
    #[must_use]
    pub fn count(&self, action: Action) -> usize {
        self.events().iter().filter(|e| e.action == action).count()
    }

    /// Events as a JSON array
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events())
    }
}

impl InteractionObserver for RecordingObserver {
    fn record(&mut self, event: &InteractionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
