//! Chromium session over the Chrome DevTools Protocol.
//!
//! Available with the `browser` feature. The session owns a tokio runtime
//! and drives chromiumoxide with `block_on`, so its surface stays
//! synchronous like every other [`BrowserSession`].
//!
//! Located nodes are kept in an in-page registry (`window.__vitrineNodes`)
//! keyed by a numeric id. A registered node that is no longer connected to
//! the document, or a registry lost to navigation, reports
//! [`SessionError::StaleElement`].
//!
//! While a native dialog is open, `Runtime.evaluate` cannot complete, so
//! every DOM command first checks the dialog state tracked from
//! `Page.javascriptDialogOpening`/`Closed` and fails with
//! [`SessionError::UnexpectedAlert`]. Clicks are dispatched from a
//! `setTimeout` for the same reason.

use crate::alert::{Dialog, DialogType};
use crate::config::BrowserConfig;
use crate::error::{SessionError, SessionResult};
use crate::locator::{js_string, Locator};
use crate::session::{BrowserSession, ElementHandle, ScriptArg, SelectOption};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogClosed, EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::fmt;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

const REGISTRY: &str = "const __reg = window.__vitrineNodes || \
     (window.__vitrineNodes = { next: 1, nodes: new Map() }); \
     const __node = (id) => { const el = __reg.nodes.get(Number(id)); \
     return el && el.isConnected ? el : null; };";

#[derive(Debug, Default)]
struct DialogLog {
    open: Option<Dialog>,
    handled: Vec<Dialog>,
}

type SharedDialogs = Arc<Mutex<DialogLog>>;

fn lock(dialogs: &SharedDialogs) -> std::sync::MutexGuard<'_, DialogLog> {
    dialogs.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`BrowserSession`] backed by a launched Chromium
pub struct ChromiumSession {
    runtime: Runtime,
    browser: Browser,
    page: Page,
    dialogs: SharedDialogs,
    tasks: Vec<JoinHandle<()>>,
}

impl fmt::Debug for ChromiumSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumSession")
            .field("dialogs", &self.dialogs)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl ChromiumSession {
    /// Launch a browser and open a blank page
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Launch`] if the runtime, the browser or the
    /// page cannot be started.
    pub fn launch(config: &BrowserConfig) -> SessionResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(launch_error)?;

        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(launch_error)?;

        let (browser, mut handler) = runtime
            .block_on(Browser::launch(cdp_config))
            .map_err(launch_error)?;
        let mut tasks = vec![runtime.spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        })];

        let page = runtime
            .block_on(browser.new_page("about:blank"))
            .map_err(launch_error)?;

        let dialogs = SharedDialogs::default();
        let (mut opening, mut closed) = runtime
            .block_on(async {
                let opening = page.event_listener::<EventJavascriptDialogOpening>().await?;
                let closed = page.event_listener::<EventJavascriptDialogClosed>().await?;
                Ok::<_, chromiumoxide::error::CdpError>((opening, closed))
            })
            .map_err(launch_error)?;

        let on_open = Arc::clone(&dialogs);
        tasks.push(runtime.spawn(async move {
            while let Some(event) = opening.next().await {
                let kind = DialogType::from_cdp(&format!("{:?}", event.r#type).to_ascii_lowercase());
                tracing::debug!(message = %event.message, ?kind, "dialog opened");
                lock(&on_open).open = Some(Dialog::new(kind, event.message.clone()));
            }
        }));
        let on_close = Arc::clone(&dialogs);
        tasks.push(runtime.spawn(async move {
            while closed.next().await.is_some() {
                let mut log = lock(&on_close);
                if let Some(dialog) = log.open.take() {
                    log.handled.push(dialog);
                }
            }
        }));

        tracing::info!(
            headless = config.headless,
            width = config.viewport_width,
            height = config.viewport_height,
            "chromium launched"
        );
        Ok(Self {
            runtime,
            browser,
            page,
            dialogs,
            tasks,
        })
    }

    /// Dialogs closed so far, oldest first
    #[must_use]
    pub fn dialogs(&self) -> Vec<Dialog> {
        lock(&self.dialogs).handled.clone()
    }

    fn ensure_no_alert(&self) -> SessionResult<()> {
        match &lock(&self.dialogs).open {
            Some(dialog) => Err(SessionError::UnexpectedAlert {
                text: dialog.message().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn eval(&self, js: String) -> SessionResult<Value> {
        self.ensure_no_alert()?;
        let result = self
            .runtime
            .block_on(self.page.evaluate(js))
            .map_err(|e| SessionError::Script {
                message: e.to_string(),
            })?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    /// Run `body` with the node bound to `el`; the body's return value is
    /// passed back
    fn on_element(&self, element: &ElementHandle, body: &str) -> SessionResult<Value> {
        let js = format!(
            "(() => {{ {REGISTRY} const el = __node({id}); \
             if (!el) return {{ stale: true }}; \
             return {{ ok: (() => {{ {body} }})() }}; }})()",
            id = js_string(&element.id)
        );
        unwrap_reply(self.eval(js)?, element)
    }

    fn handle_dialog(&mut self, accept: bool) -> SessionResult<()> {
        let Some(mut dialog) = lock(&self.dialogs).open.take() else {
            return Err(SessionError::NoSuchAlert);
        };
        self.runtime
            .block_on(self.page.execute(HandleJavaScriptDialogParams::new(accept)))
            .map_err(command_error)?;
        if accept {
            dialog.accept();
        } else {
            dialog.dismiss();
        }
        lock(&self.dialogs).handled.push(dialog);
        Ok(())
    }
}

impl BrowserSession for ChromiumSession {
    fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.ensure_no_alert()?;
        self.runtime
            .block_on(self.page.goto(url))
            .map_err(|e| SessionError::command(format!("navigation to {url} failed: {e}")))?;
        tracing::debug!(url, "navigated");
        Ok(())
    }

    fn current_url(&mut self) -> SessionResult<String> {
        let url = self.runtime.block_on(self.page.url()).map_err(command_error)?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    fn find_elements(&mut self, locator: &Locator) -> SessionResult<Vec<ElementHandle>> {
        let js = format!(
            "(() => {{ {REGISTRY} return {query}.map((el) => {{ \
             let id = el.__vitrineId; \
             if (!id || __reg.nodes.get(id) !== el) {{ id = __reg.next++; el.__vitrineId = id; __reg.nodes.set(id, el); }} \
             return {{ id: String(id), tag: el.tagName.toLowerCase() }}; }}); }})()",
            query = locator.to_js_query()
        );
        let Value::Array(found) = self.eval(js)? else {
            return Ok(Vec::new());
        };
        Ok(found
            .iter()
            .filter_map(|node| {
                let id = node.get("id")?.as_str()?;
                let tag = node.get("tag")?.as_str()?;
                Some(ElementHandle::new(id, tag))
            })
            .collect())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        let shown = self.on_element(
            element,
            "const s = getComputedStyle(el); const r = el.getBoundingClientRect(); \
             return s.display !== 'none' && s.visibility !== 'hidden' && (r.width > 0 || r.height > 0);",
        )?;
        Ok(shown.as_bool().unwrap_or(false))
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        Ok(self.on_element(element, "return !el.disabled;")?.as_bool().unwrap_or(true))
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<String>> {
        let value = self.on_element(element, &format!("return el.getAttribute({});", js_string(name)))?;
        Ok(value.as_str().map(str::to_string))
    }

    fn property(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<Value>> {
        let value = self.on_element(element, &format!("return el[{}];", js_string(name)))?;
        Ok((!value.is_null()).then_some(value))
    }

    fn text(&mut self, element: &ElementHandle) -> SessionResult<String> {
        let value = self.on_element(element, "return el.innerText || '';")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn clear(&mut self, element: &ElementHandle) -> SessionResult<()> {
        self.on_element(
            element,
            "el.focus(); el.value = ''; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true }));",
        )?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> SessionResult<()> {
        self.on_element(element, "el.focus();")?;
        self.runtime
            .block_on(self.page.execute(InsertTextParams::new(text)))
            .map_err(command_error)?;
        self.on_element(element, "el.dispatchEvent(new Event('change', { bubbles: true }));")?;
        Ok(())
    }

    fn click(&mut self, element: &ElementHandle) -> SessionResult<()> {
        self.on_element(element, "setTimeout(() => el.click(), 0); return true;")?;
        Ok(())
    }

    fn options(&mut self, element: &ElementHandle) -> SessionResult<Vec<SelectOption>> {
        let value = self.on_element(
            element,
            "return Array.from(el.options || []).map((o) => \
             ({ label: o.text, value: o.value, selected: o.selected }));",
        )?;
        serde_json::from_value(value).map_err(|e| SessionError::Script {
            message: format!("unexpected options payload: {e}"),
        })
    }

    fn select_index(&mut self, element: &ElementHandle, index: usize) -> SessionResult<()> {
        let ok = self.on_element(
            element,
            &format!(
                "if ({index} >= el.options.length) return false; \
                 el.selectedIndex = {index}; \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;"
            ),
        )?;
        if ok.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(SessionError::command(format!("option index {index} out of range")))
        }
    }

    fn alert_text(&mut self) -> SessionResult<Option<String>> {
        Ok(lock(&self.dialogs).open.as_ref().map(|d| d.message().to_string()))
    }

    fn accept_alert(&mut self) -> SessionResult<()> {
        self.handle_dialog(true)
    }

    fn dismiss_alert(&mut self) -> SessionResult<()> {
        self.handle_dialog(false)
    }

    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> SessionResult<Value> {
        let js = build_script(script, args);
        let reply = self.eval(js)?;
        if let Some(id) = reply.get("stale").and_then(Value::as_str) {
            return Err(SessionError::StaleElement { id: id.to_string() });
        }
        Ok(reply.get("ok").cloned().unwrap_or(Value::Null))
    }

    fn close(&mut self) -> SessionResult<()> {
        let browser = &mut self.browser;
        self.runtime
            .block_on(browser.close())
            .map_err(command_error)?;
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::info!("chromium closed");
        Ok(())
    }
}

/// Wrap a Selenium-style script (`arguments[i]`) so element arguments are
/// looked up in the registry
fn build_script(script: &str, args: &[ScriptArg]) -> String {
    let mut js = format!("(() => {{ {REGISTRY} const __args = [];");
    for arg in args {
        match arg {
            ScriptArg::Value(value) => {
                let _ = write!(js, " __args.push({value});");
            }
            ScriptArg::Element(handle) => {
                let id = js_string(&handle.id);
                let _ = write!(
                    js,
                    " {{ const el = __node({id}); if (!el) return {{ stale: {id} }}; __args.push(el); }}"
                );
            }
        }
    }
    let _ = write!(
        js,
        " return {{ ok: (function() {{ {script} }}).apply(null, __args) }}; }})()"
    );
    js
}

fn unwrap_reply(reply: Value, element: &ElementHandle) -> SessionResult<Value> {
    if reply.get("stale").is_some() {
        return Err(SessionError::StaleElement {
            id: element.id.clone(),
        });
    }
    Ok(reply.get("ok").cloned().unwrap_or(Value::Null))
}

fn launch_error(err: impl fmt::Display) -> SessionError {
    SessionError::Launch {
        message: err.to_string(),
    }
}

fn command_error(err: impl fmt::Display) -> SessionError {
    SessionError::command(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_script_binds_arguments() {
        let js = build_script(
            "arguments[0].scrollIntoView(); return arguments[1];",
            &[
                ScriptArg::Element(ElementHandle::new("7", "button")),
                ScriptArg::Value(serde_json::json!({"n": 1})),
            ],
        );
        assert!(js.contains(r#"__node("7")"#));
        assert!(js.contains(r#"return { stale: "7" }"#));
        assert!(js.contains(r#"__args.push({"n":1})"#));
        assert!(js.contains(".apply(null, __args)"));
    }

    #[test]
    fn test_unwrap_reply() {
        let handle = ElementHandle::new("3", "input");
        let stale = unwrap_reply(serde_json::json!({"stale": true}), &handle).unwrap_err();
        assert_eq!(stale, SessionError::StaleElement { id: "3".into() });
        let ok = unwrap_reply(serde_json::json!({"ok": "x"}), &handle).unwrap();
        assert_eq!(ok, Value::String("x".into()));
        assert_eq!(unwrap_reply(serde_json::json!({}), &handle).unwrap(), Value::Null);
    }

    #[test]
    #[ignore = "requires a local Chrome or Chromium"]
    fn test_launch_and_navigate() {
        let config = BrowserConfig::new().with_no_sandbox();
        let mut session = ChromiumSession::launch(&config).unwrap();
        session
            .navigate("data:text/html,<input id='q' placeholder='Search'>")
            .unwrap();
        let found = session.find_elements(&Locator::id("q")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            session.attribute(&found[0], "placeholder").unwrap().as_deref(),
            Some("Search")
        );
        session.close().unwrap();
    }
}
