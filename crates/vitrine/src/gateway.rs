//! Element interaction gateway.
//!
//! [`Gateway`] is the only path from page objects to the browser. Every
//! verb re-resolves its locator under the condition the action needs
//! (click needs `Clickable`; type and read need `Visible`) and never keeps
//! element handles between calls.
//!
//! ```
//! use vitrine::mock::{MockElement, MockSession};
//! use vitrine::{Gateway, GatewayConfig, Locator};
//!
//! const EMAIL: Locator = Locator::id("Email");
//!
//! let session = MockSession::new().with_element("email", MockElement::input("Email"));
//! let mut gateway = Gateway::new(session, GatewayConfig::default());
//!
//! gateway.type_text(&EMAIL, "a@example.com").unwrap();
//! gateway.type_text(&EMAIL, "b@example.com").unwrap();
//! assert_eq!(gateway.read_value(&EMAIL).unwrap(), "b@example.com");
//! ```

use crate::alert::AlertState;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult, SessionError};
use crate::locator::Locator;
use crate::observe::{Action, InteractionEvent, InteractionObserver, Outcome, TracingObserver};
use crate::page::PageObject;
use crate::session::{BrowserSession, ElementHandle, ScriptArg};
use crate::wait::{WaitCondition, WaitOutcome, Waiter};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView({block: 'center'});";
const SCROLL_TO_FOOTER: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Waits and safe interactions on top of a [`BrowserSession`]
pub struct Gateway<S: BrowserSession> {
    session: S,
    config: GatewayConfig,
    observer: Box<dyn InteractionObserver>,
    session_id: Uuid,
    span: tracing::Span,
}

impl<S: BrowserSession> fmt::Debug for Gateway<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("session_id", &self.session_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: BrowserSession> Gateway<S> {
    /// Wrap a session; events go to [`TracingObserver`]
    pub fn new(session: S, config: GatewayConfig) -> Self {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("gateway", session = %session_id);
        Self {
            session,
            config,
            observer: Box::new(TracingObserver),
            session_id,
            span,
        }
    }

    /// Replace the observer
    #[must_use]
    pub fn with_observer(mut self, observer: impl InteractionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Settings in use
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Timeout used when a verb takes none
    pub const fn default_timeout(&self) -> Duration {
        self.config.default_timeout
    }

    /// Id attached to this gateway's log span
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Underlying session
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Underlying session, mutably
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Give the session back
    pub fn into_session(self) -> S {
        self.session
    }

    /// Close the underlying session
    ///
    /// # Errors
    ///
    /// Propagates the session's close error.
    pub fn close(&mut self) -> GatewayResult<()> {
        self.session.close()?;
        tracing::info!(session = %self.session_id, "session closed");
        Ok(())
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Poll until `condition` holds for `locator`; return the first
    /// satisfying element
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidCondition`] for `AlertPresent`
    /// - [`GatewayError::ElementNotFound`] when the timeout elapses
    /// - [`GatewayError::Session`] for session failures other than stale
    ///   elements
    pub fn resolve(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> GatewayResult<ElementHandle> {
        self.act(Action::Resolve, locator, |gw| gw.first(locator, condition, timeout))
    }

    /// Poll until every match is visible; return all of them
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] when the timeout elapses.
    pub fn resolve_all(&mut self, locator: &Locator, timeout: Duration) -> GatewayResult<Vec<ElementHandle>> {
        self.act(Action::Resolve, locator, |gw| {
            gw.wait_for(locator, WaitCondition::AllPresentAndVisible, timeout)
        })
    }

    /// Matches right now, without waiting
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn find_all(&mut self, locator: &Locator) -> GatewayResult<Vec<ElementHandle>> {
        let found = self.session.find_elements(locator)?;
        if found.is_empty() {
            tracing::info!(%locator, "no elements found");
        } else {
            tracing::debug!(%locator, count = found.len(), "elements found");
        }
        Ok(found)
    }

    // =========================================================================
    // VERBS
    // =========================================================================

    /// Clear the field, then type `text`; the field ends up holding exactly
    /// `text`
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the field never becomes visible.
    pub fn type_text(&mut self, locator: &Locator, text: &str) -> GatewayResult<()> {
        self.act(Action::Type, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Visible, gw.config.default_timeout)?;
            gw.session.clear(&element)?;
            gw.session.send_keys(&element, text)?;
            Ok(())
        })
    }

    /// Scroll into view and click; `false` on any failure
    pub fn click(&mut self, locator: &Locator) -> bool {
        self.click_within(locator, self.config.default_timeout)
    }

    /// [`click`](Self::click) with an explicit timeout
    pub fn click_within(&mut self, locator: &Locator, timeout: Duration) -> bool {
        match self.try_click(locator, timeout) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%locator, error = %err, "click failed");
                false
            }
        }
    }

    /// Scroll into view and click, reporting why a click failed
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ElementNotFound`] if nothing becomes clickable
    ///   within `timeout`
    /// - [`GatewayError::Session`] when the session rejects a command,
    ///   e.g. while a dialog is open
    pub fn try_click(&mut self, locator: &Locator, timeout: Duration) -> GatewayResult<()> {
        self.act(Action::Click, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Clickable, timeout)?;
            gw.session
                .execute_script(SCROLL_INTO_VIEW, &[ScriptArg::Element(element.clone())])?;
            gw.session.click(&element)?;
            Ok(())
        })
    }

    /// Trimmed rendered text
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the element never becomes
    /// visible.
    pub fn read_text(&mut self, locator: &Locator) -> GatewayResult<String> {
        self.act(Action::ReadText, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Visible, gw.config.default_timeout)?;
            Ok(gw.session.text(&element)?.trim().to_string())
        })
    }

    /// Trimmed text of every match once all of them are visible
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if no match shows within
    /// `timeout`.
    pub fn read_all_text(&mut self, locator: &Locator, timeout: Duration) -> GatewayResult<Vec<String>> {
        self.act(Action::ReadText, locator, |gw| {
            let elements = gw.wait_for(locator, WaitCondition::AllPresentAndVisible, timeout)?;
            let mut texts = Vec::with_capacity(elements.len());
            for element in &elements {
                texts.push(gw.session.text(element)?.trim().to_string());
            }
            Ok(texts)
        })
    }

    /// Current `value` of a control; empty when it has none
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the control never becomes
    /// visible.
    pub fn read_value(&mut self, locator: &Locator) -> GatewayResult<String> {
        self.act(Action::ReadValue, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Visible, gw.config.default_timeout)?;
            Ok(value_to_string(gw.session.property(&element, "value")?))
        })
    }

    /// Attribute of the first present match
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if nothing matches in time.
    pub fn read_attribute(&mut self, locator: &Locator, name: &str) -> GatewayResult<Option<String>> {
        self.read_attribute_within(locator, name, self.config.default_timeout)
    }

    pub(crate) fn read_attribute_within(
        &mut self,
        locator: &Locator,
        name: &str,
        timeout: Duration,
    ) -> GatewayResult<Option<String>> {
        self.act(Action::ReadAttribute, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Present, timeout)?;
            Ok(gw.session.attribute(&element, name)?)
        })
    }

    /// Select the dropdown option whose label equals `visible_text`
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ElementNotFound`] if the dropdown never becomes
    ///   clickable
    /// - [`GatewayError::OptionNotFound`] if no label matches exactly
    pub fn select_option(&mut self, locator: &Locator, visible_text: &str) -> GatewayResult<()> {
        self.act(Action::Select, locator, |gw| {
            let timeout = gw.config.default_timeout;
            gw.first(locator, WaitCondition::Clickable, timeout)?;
            let element = gw.first(locator, WaitCondition::Visible, timeout)?;
            let options = gw.session.options(&element)?;
            let available: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
            tracing::debug!(%locator, ?available, "dropdown options");

            let index = options
                .iter()
                .position(|o| o.label == visible_text)
                .ok_or_else(|| GatewayError::OptionNotFound {
                    locator: locator.clone(),
                    label: visible_text.to_string(),
                    available,
                })?;
            gw.session.select_index(&element, index)?;
            Ok(())
        })
    }

    /// Label of the selected option
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the dropdown never becomes
    /// visible.
    pub fn selected_option(&mut self, locator: &Locator) -> GatewayResult<Option<String>> {
        self.act(Action::ReadValue, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Visible, gw.config.default_timeout)?;
            Ok(gw
                .session
                .options(&element)?
                .into_iter()
                .find(|o| o.selected)
                .map(|o| o.label))
        })
    }

    /// Checked state of a checkbox or radio button
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the control never appears.
    pub fn is_checked(&mut self, locator: &Locator) -> GatewayResult<bool> {
        self.act(Action::ReadValue, locator, |gw| {
            let element = gw.first(locator, WaitCondition::Present, gw.config.default_timeout)?;
            Ok(gw
                .session
                .property(&element, "checked")?
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false))
        })
    }

    /// Whether a match becomes visible within `timeout`
    pub fn is_visible(&mut self, locator: &Locator, timeout: Duration) -> bool {
        self.probe(locator, WaitCondition::Visible, timeout)
    }

    /// Whether a match appears within `timeout`
    pub fn is_present(&mut self, locator: &Locator, timeout: Duration) -> bool {
        self.probe(locator, WaitCondition::Present, timeout)
    }

    // =========================================================================
    // ALERTS
    // =========================================================================

    /// Wait for a dialog and return its text; the dialog stays open
    ///
    /// # Errors
    ///
    /// [`GatewayError::AlertNotFound`] when the timeout elapses.
    pub fn wait_for_alert(&mut self, timeout: Duration) -> GatewayResult<String> {
        self.act(Action::WaitForAlert, "alert", |gw| {
            let waiter = Waiter::new(gw.config.wait_options(timeout));
            let session = &mut gw.session;
            match waiter.until(|| session.alert_text())? {
                WaitOutcome::Satisfied { value, attempts, .. } => {
                    tracing::debug!(attempts, text = %value, "alert present");
                    Ok(value)
                }
                WaitOutcome::TimedOut { attempts, .. } => {
                    tracing::error!(attempts, timeout_ms = timeout.as_millis() as u64, "no alert appeared");
                    Err(GatewayError::AlertNotFound { timeout })
                }
            }
        })
    }

    /// Accept the open dialog
    ///
    /// # Errors
    ///
    /// [`GatewayError::NoActiveAlert`] when no dialog is open.
    pub fn accept_alert(&mut self) -> GatewayResult<()> {
        self.act(Action::AcceptAlert, "alert", |gw| {
            gw.require_alert()?;
            gw.session.accept_alert().map_err(no_active_alert)
        })
    }

    /// Dismiss the open dialog
    ///
    /// # Errors
    ///
    /// [`GatewayError::NoActiveAlert`] when no dialog is open.
    pub fn dismiss_alert(&mut self) -> GatewayResult<()> {
        self.act(Action::DismissAlert, "alert", |gw| {
            gw.require_alert()?;
            gw.session.dismiss_alert().map_err(no_active_alert)
        })
    }

    /// Current dialog state
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn alert_state(&mut self) -> GatewayResult<AlertState> {
        Ok(AlertState::from_text(self.session.alert_text()?))
    }

    // =========================================================================
    // NAVIGATION AND SCRIPTS
    // =========================================================================

    /// Navigate to `path` relative to the base URL
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn open(&mut self, path: &str) -> GatewayResult<()> {
        let url = self.config.url_for(path);
        self.act(Action::Navigate, &url, |gw| Ok(gw.session.navigate(&url)?))
    }

    /// Navigate to a page and wait for its ready marker
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the marker never becomes
    /// visible.
    pub fn open_page<P: PageObject + ?Sized>(&mut self, page: &P) -> GatewayResult<()> {
        self.open(page.path())?;
        if let Some(marker) = page.ready_marker() {
            let timeout = page.load_timeout().unwrap_or(self.config.default_timeout);
            self.resolve(&marker, WaitCondition::Visible, timeout)?;
        }
        tracing::info!(page = page.page_name(), "page ready");
        Ok(())
    }

    /// URL of the current document
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn current_url(&mut self) -> GatewayResult<String> {
        Ok(self.session.current_url()?)
    }

    /// Scroll to the bottom of the document
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn scroll_to_footer(&mut self) -> GatewayResult<()> {
        self.execute_script(SCROLL_TO_FOOTER, &[]).map(|_| ())
    }

    /// Run a script in the page
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> GatewayResult<Value> {
        self.act(Action::Script, "script", |gw| Ok(gw.session.execute_script(script, args)?))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn act<T, F>(&mut self, action: Action, target: impl fmt::Display, f: F) -> GatewayResult<T>
    where
        F: FnOnce(&mut Self) -> GatewayResult<T>,
    {
        let span = self.span.clone();
        let _entered = span.enter();
        let started = Instant::now();
        let result = f(self);
        let outcome = match &result {
            Ok(_) => Outcome::Succeeded,
            Err(err) => Outcome::Failed {
                reason: err.to_string(),
            },
        };
        self.report(action, target, outcome, started);
        result
    }

    fn report(&mut self, action: Action, target: impl fmt::Display, outcome: Outcome, started: Instant) {
        self.observer.record(&InteractionEvent::new(
            action,
            target.to_string(),
            outcome,
            started.elapsed(),
        ));
    }

    /// Nothing matching within `timeout` is reported as [`Outcome::Absent`]
    fn probe(&mut self, locator: &Locator, condition: WaitCondition, timeout: Duration) -> bool {
        let span = self.span.clone();
        let _entered = span.enter();
        let started = Instant::now();
        let (found, outcome) = match self.poll(locator, condition, timeout) {
            Ok(WaitOutcome::Satisfied { .. }) => (true, Outcome::Succeeded),
            Ok(WaitOutcome::TimedOut { attempts, .. }) => {
                tracing::debug!(
                    %locator,
                    %condition,
                    attempts,
                    timeout_ms = timeout.as_millis() as u64,
                    "nothing matched before timeout"
                );
                (false, Outcome::Absent)
            }
            Err(err) => {
                tracing::warn!(%locator, error = %err, "visibility check failed");
                (false, Outcome::Failed { reason: err.to_string() })
            }
        };
        self.report(Action::Probe, locator, outcome, started);
        found
    }

    fn first(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> GatewayResult<ElementHandle> {
        self.wait_for(locator, condition, timeout)?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::ElementNotFound {
                locator: locator.clone(),
                condition,
                timeout,
            })
    }

    fn poll(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> GatewayResult<WaitOutcome<Vec<ElementHandle>>> {
        if !condition.applies_to_elements() {
            return Err(GatewayError::InvalidCondition { condition });
        }
        let waiter = Waiter::new(self.config.wait_options(timeout));
        let session = &mut self.session;
        Ok(waiter.until(|| match condition.evaluate(session, locator) {
            Err(err) if err.is_stale() => Ok(None),
            other => other,
        })?)
    }

    fn wait_for(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> GatewayResult<Vec<ElementHandle>> {
        match self.poll(locator, condition, timeout)? {
            WaitOutcome::Satisfied {
                value,
                elapsed,
                attempts,
            } => {
                tracing::debug!(
                    %locator,
                    %condition,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "condition met"
                );
                Ok(value)
            }
            WaitOutcome::TimedOut { elapsed, attempts } => {
                tracing::error!(
                    %locator,
                    %condition,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout_ms = timeout.as_millis() as u64,
                    "condition not met before timeout"
                );
                Err(GatewayError::ElementNotFound {
                    locator: locator.clone(),
                    condition,
                    timeout,
                })
            }
        }
    }

    fn require_alert(&mut self) -> GatewayResult<()> {
        match self.session.alert_text()? {
            Some(_) => Ok(()),
            None => Err(GatewayError::NoActiveAlert),
        }
    }
}

fn no_active_alert(err: SessionError) -> GatewayError {
    match err {
        SessionError::NoSuchAlert => GatewayError::NoActiveAlert,
        other => other.into(),
    }
}

fn value_to_string(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}
