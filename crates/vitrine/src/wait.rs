//! Wait primitives.
//!
//! [`Waiter`] is the only place that sleeps. It polls a probe at a fixed
//! interval until the probe yields a value or the timeout elapses. The
//! probe always runs at least once, and the loop never overshoots the
//! timeout by more than one poll interval.

use crate::error::SessionResult;
use crate::locator::Locator;
use crate::session::{BrowserSession, ElementHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Maximum time to keep polling
    pub timeout: Duration,
    /// Sleep between attempts
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set polling interval (at least 1ms)
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Result of a wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The probe produced a value
    Satisfied {
        /// Value produced by the probe
        value: T,
        /// Time spent waiting
        elapsed: Duration,
        /// Number of probe calls
        attempts: u32,
    },
    /// The timeout elapsed first
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
        /// Number of probe calls
        attempts: u32,
    },
}

impl<T> WaitOutcome<T> {
    /// Value, if the wait was satisfied
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Satisfied { value, .. } => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// Number of probe calls made
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Satisfied { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    /// Time spent waiting
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Satisfied { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }
}

/// Polling loop
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options in use
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `probe` until it returns `Some` or the timeout elapses
    ///
    /// # Errors
    ///
    /// Returns the first error the probe returns; polling stops there.
    pub fn until<T, E, F>(&self, mut probe: F) -> Result<WaitOutcome<T>, E>
    where
        F: FnMut() -> Result<Option<T>, E>,
    {
        let start = Instant::now();
        let mut attempts = 0;
        loop {
            attempts += 1;
            if let Some(value) = probe()? {
                return Ok(WaitOutcome::Satisfied {
                    value,
                    elapsed: start.elapsed(),
                    attempts,
                });
            }
            let elapsed = start.elapsed();
            if elapsed >= self.options.timeout {
                return Ok(WaitOutcome::TimedOut { elapsed, attempts });
            }
            let remaining = self.options.timeout - elapsed;
            std::thread::sleep(self.options.poll_interval.min(remaining));
        }
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Predicate a wait polls for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitCondition {
    /// At least one node matches
    Present,
    /// At least one matching node is displayed
    Visible,
    /// At least one matching node is displayed and enabled
    Clickable,
    /// At least one node matches and every match is displayed
    AllPresentAndVisible,
    /// A native dialog is open; the locator is ignored
    AlertPresent,
}

impl WaitCondition {
    /// Whether the condition is evaluated against located elements
    #[must_use]
    pub const fn applies_to_elements(&self) -> bool {
        !matches!(self, Self::AlertPresent)
    }

    /// Evaluate once against the session without changing page state
    ///
    /// Returns the satisfying elements, or `None` while the condition does
    /// not hold. A node that goes stale mid-check counts as not satisfying.
    /// `AlertPresent` yields an empty list when a dialog is open.
    ///
    /// # Errors
    ///
    /// Propagates session errors other than stale elements.
    pub fn evaluate<S>(
        &self,
        session: &mut S,
        locator: &Locator,
    ) -> SessionResult<Option<Vec<ElementHandle>>>
    where
        S: BrowserSession + ?Sized,
    {
        if matches!(self, Self::AlertPresent) {
            return Ok(session.alert_text()?.map(|_| Vec::new()));
        }

        let found = session.find_elements(locator)?;
        if found.is_empty() {
            return Ok(None);
        }

        match self {
            Self::Present => Ok(Some(found)),
            Self::Visible | Self::Clickable => {
                let mut holding = Vec::new();
                for element in found {
                    if self.holds_for(session, &element)? {
                        holding.push(element);
                    }
                }
                Ok((!holding.is_empty()).then_some(holding))
            }
            Self::AllPresentAndVisible => {
                for element in &found {
                    if !self.holds_for(session, element)? {
                        return Ok(None);
                    }
                }
                Ok(Some(found))
            }
            Self::AlertPresent => Ok(None),
        }
    }

    fn holds_for<S>(&self, session: &mut S, element: &ElementHandle) -> SessionResult<bool>
    where
        S: BrowserSession + ?Sized,
    {
        let check = |session: &mut S| -> SessionResult<bool> {
            if !session.is_displayed(element)? {
                return Ok(false);
            }
            if matches!(self, Self::Clickable) {
                return session.is_enabled(element);
            }
            Ok(true)
        };
        match check(session) {
            Err(err) if err.is_stale() => Ok(false),
            other => other,
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::AllPresentAndVisible => "all present and visible",
            Self::AlertPresent => "alert present",
        })
    }
}
