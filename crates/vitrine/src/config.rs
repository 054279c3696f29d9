//! Configuration for the gateway, the browser and a test suite.
//!
//! [`SuiteConfig`] reads the environment through an injectable lookup, so
//! tests never touch process-wide variables:
//!
//! ```
//! use vitrine::config::SuiteConfig;
//!
//! let config = SuiteConfig::from_lookup(|key| match key {
//!     "EXPLICIT_WAIT" => Some("5".to_string()),
//!     "HEADLESS" => Some("yes".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert!(config.headless);
//! assert_eq!(config.gateway_config().default_timeout.as_secs(), 5);
//! ```

use crate::error::{GatewayError, GatewayResult};
use crate::logging::{LogConfig, LogFormat};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use std::path::PathBuf;
use std::time::Duration;

/// Storefront used when `BASE_URL` is unset
pub const DEFAULT_BASE_URL: &str = "https://demo.nopcommerce.com/";

/// Suite-level explicit wait when `EXPLICIT_WAIT` is unset (seconds)
pub const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 20;

// =============================================================================
// GATEWAY
// =============================================================================

/// Settings a gateway is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Timeout for verbs that take none explicitly
    pub default_timeout: Duration,
    /// Sleep between condition checks
    pub poll_interval: Duration,
    /// Base URL relative paths are joined to
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Wait options for a given timeout
    #[must_use]
    pub fn wait_options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout)
            .with_poll_interval(self.poll_interval)
    }

    /// Resolve `path` against the base URL; absolute URLs pass through
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("about:") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// Supported browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    /// Chrome or Chromium over CDP
    #[default]
    Chrome,
}

impl std::str::FromStr for BrowserKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            other => Err(GatewayError::config(format!(
                "unsupported browser {other:?}; only chrome is supported"
            ))),
        }
    }
}

/// Launch settings for a Chromium session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Explicit browser binary
    pub executable: Option<PathBuf>,
    /// Run with the Chrome sandbox
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            executable: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport size
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the browser binary
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Disable the Chrome sandbox (needed in most containers)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// =============================================================================
// SUITE
// =============================================================================

/// Environment-driven settings for a test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Storefront root URL (`BASE_URL`)
    pub base_url: String,
    /// Browser to drive (`BROWSER`)
    pub browser: BrowserKind,
    /// Run headless (`HEADLESS`)
    pub headless: bool,
    /// Default wait timeout (`EXPLICIT_WAIT`, seconds)
    pub explicit_wait: Duration,
    /// Poll interval (`POLL_INTERVAL_MS`)
    pub poll_interval: Duration,
    /// Test data file (`TEST_DATA_PATH`)
    pub test_data_path: Option<PathBuf>,
    /// Log file (`LOG_FILE_PATH`)
    pub log_file_path: Option<PathBuf>,
    /// Log format (`LOG_FORMAT`: `text` or `json`)
    pub log_format: LogFormat,
    /// Log filter directives (`LOG_LEVEL`)
    pub log_filter: String,
    /// Chrome binary (`CHROME_PATH`)
    pub chrome_path: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            explicit_wait: Duration::from_secs(DEFAULT_EXPLICIT_WAIT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            test_data_path: None,
            log_file_path: None,
            log_format: LogFormat::Text,
            log_filter: "info".to_string(),
            chrome_path: None,
        }
    }
}

impl SuiteConfig {
    /// Read settings from process environment variables
    ///
    /// # Errors
    ///
    /// See [`SuiteConfig::from_lookup`].
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] for an unsupported browser, a
    /// non-numeric wait or interval, or an unknown log format.
    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("BASE_URL") {
            config.base_url = url;
        }
        if let Some(browser) = get("BROWSER") {
            config.browser = browser.parse()?;
        }
        if let Some(headless) = get("HEADLESS") {
            config.headless = parse_flag(&headless);
        }
        if let Some(wait) = get("EXPLICIT_WAIT") {
            config.explicit_wait = Duration::from_secs(parse_number("EXPLICIT_WAIT", &wait)?);
        }
        if let Some(interval) = get("POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(parse_number("POLL_INTERVAL_MS", &interval)?);
        }
        config.test_data_path = get("TEST_DATA_PATH").map(PathBuf::from);
        config.log_file_path = get("LOG_FILE_PATH").map(PathBuf::from);
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        if let Some(filter) = get("LOG_LEVEL") {
            config.log_filter = filter;
        }
        config.chrome_path = get("CHROME_PATH").map(PathBuf::from);

        tracing::debug!(?config, "loaded suite configuration");
        Ok(config)
    }

    /// Gateway settings for this run
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new()
            .with_default_timeout(self.explicit_wait)
            .with_poll_interval(self.poll_interval)
            .with_base_url(self.base_url.clone())
    }

    /// Logging settings for this run
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::new()
            .with_filter(self.log_filter.clone())
            .with_format(self.log_format);
        match &self.log_file_path {
            Some(path) => config.with_file(path.clone()),
            None => config,
        }
    }

    /// Browser launch settings for this run
    #[must_use]
    pub fn browser_config(&self) -> BrowserConfig {
        let config = BrowserConfig::new().with_headless(self.headless);
        match &self.chrome_path {
            Some(path) => config.with_executable(path.clone()),
            None => config,
        }
    }
}

/// Truthy values: `true`, `1`, `t`, `y`, `yes` (case-insensitive)
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "y" | "yes"
    )
}

fn parse_number(key: &str, value: &str) -> GatewayResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::config(format!("{key} must be a whole number, got {value:?}")))
}
