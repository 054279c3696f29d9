//! Login page and the account header links.

use crate::data::Credentials;
use crate::{require_click, set_input_type};
use vitrine::{
    AttributeAssertions, BrowserSession, Gateway, GatewayResult, Locator, MismatchReport,
    PageObject, PageRoute,
};

/// Email field
pub const EMAIL: Locator = Locator::id("Email");
/// Inline error under the email field
pub const EMAIL_ERROR: Locator = Locator::id("Email-error");
/// Password field
pub const PASSWORD: Locator = Locator::id("Password");
/// Inline error under the password field
pub const PASSWORD_ERROR: Locator = Locator::id("Password-error");
/// "Remember me?" checkbox
pub const REMEMBER_ME: Locator = Locator::id("RememberMe");
/// "Forgot password?" link
pub const FORGOT_PASSWORD: Locator = Locator::link_text("Forgot password?");
/// "Log in" button
pub const SUBMIT: Locator = Locator::class_name("login-button");
/// Banner shown when the credentials are rejected
pub const ERROR_SUMMARY: Locator = Locator::class_name("message-error validation-summary-errors");

/// "Log in" header link
pub const LOGIN_LINK: Locator = Locator::class_name("ico-login");
/// "Log out" header link
pub const LOGOUT_LINK: Locator = Locator::class_name("ico-logout");
/// "My account" header link, shown only when signed in
pub const MY_ACCOUNT: Locator = Locator::class_name("ico-account");

/// "Change password" entry in the account menu
pub const CHANGE_PASSWORD_LINK: Locator = Locator::css("a[href='/customer/changepassword']");
/// Current password
pub const OLD_PASSWORD: Locator = Locator::id("OldPassword");
/// New password
pub const NEW_PASSWORD: Locator = Locator::id("NewPassword");
/// New password repeated
pub const CONFIRM_NEW_PASSWORD: Locator = Locator::id("ConfirmNewPassword");
/// "Change password" submit button
pub const CHANGE_PASSWORD_BUTTON: Locator = Locator::class_name("change-password-button");
/// Close button of the "Password was changed" bar
pub const NOTIFICATION_CLOSE: Locator = Locator::class_name("close");

/// Placeholders the login form is expected to show
pub const PLACEHOLDERS: [(Locator, &'static str); 2] =
    [(EMAIL, "Email"), (PASSWORD, "Password")];

/// `/login`
#[derive(Debug)]
pub struct LoginPage<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<S: BrowserSession> PageObject for LoginPage<'_, S> {
    fn path(&self) -> &str {
        "login?returnUrl=%2F"
    }

    fn ready_marker(&self) -> Option<Locator> {
        Some(EMAIL)
    }
}

impl<'g, S: BrowserSession> LoginPage<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Navigate here and wait for the email field
    ///
    /// # Errors
    ///
    /// Fails if the form does not render in time.
    pub fn open(&mut self) -> GatewayResult<()> {
        let route = PageRoute::of(&*self);
        self.gateway.open_page(&route)
    }

    /// Fill both fields and submit
    ///
    /// Whether the login succeeded is checked separately with
    /// [`is_logged_in`](Self::is_logged_in) or
    /// [`error_summary_visible`](Self::error_summary_visible).
    ///
    /// # Errors
    ///
    /// Fails if a field or the submit button cannot be reached.
    pub fn login(&mut self, credentials: &Credentials) -> GatewayResult<()> {
        tracing::info!(user = %credentials.username, "logging in");
        self.gateway.type_text(&EMAIL, &credentials.username)?;
        self.gateway.type_text(&PASSWORD, &credentials.password)?;
        self.submit()
    }

    /// Submit the form as it is
    ///
    /// # Errors
    ///
    /// Fails if the submit button is not clickable.
    pub fn submit(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &SUBMIT)
    }

    /// Whether the "My account" header link shows
    pub fn is_logged_in(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&MY_ACCOUNT, timeout)
    }

    /// Click "Log out" in the header
    pub fn logout(&mut self) -> bool {
        tracing::info!("logging out");
        self.gateway.click(&LOGOUT_LINK)
    }

    /// Whether the "Login was unsuccessful" summary shows
    pub fn error_summary_visible(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&ERROR_SUMMARY, timeout)
    }

    /// Validation message under the email field
    ///
    /// # Errors
    ///
    /// Fails if no message becomes visible.
    pub fn email_error(&mut self) -> GatewayResult<String> {
        self.gateway.read_text(&EMAIL_ERROR)
    }

    /// Validation message under the password field
    ///
    /// # Errors
    ///
    /// Fails if no message becomes visible.
    pub fn password_error(&mut self) -> GatewayResult<String> {
        self.gateway.read_text(&PASSWORD_ERROR)
    }

    /// Whether the password field renders its value masked
    ///
    /// # Errors
    ///
    /// Fails if the field never appears.
    pub fn is_password_masked(&mut self) -> GatewayResult<bool> {
        Ok(self.gateway.read_attribute(&PASSWORD, "type")?.as_deref() == Some("password"))
    }

    /// Flip the password field between `text` and `password`
    ///
    /// The storefront has no visibility toggle, so the input type is
    /// changed in the page.
    ///
    /// # Errors
    ///
    /// Fails if the field is not visible or the script fails.
    pub fn toggle_password_visibility(&mut self) -> GatewayResult<()> {
        let input_type = if self.is_password_masked()? { "text" } else { "password" };
        set_input_type(self.gateway, &PASSWORD, input_type)
    }

    /// Reach the form through the "Log in" header link
    pub fn open_from_header(&mut self) -> bool {
        self.gateway.click(&LOGIN_LINK)
    }

    /// Toggle "Remember me?"
    pub fn remember_me(&mut self) -> bool {
        self.gateway.click(&REMEMBER_ME)
    }

    /// Follow "Forgot password?"
    pub fn forgot_password(&mut self) -> bool {
        self.gateway.click(&FORGOT_PASSWORD)
    }

    /// Change the password from the customer account page
    ///
    /// # Errors
    ///
    /// Fails if the account page or any of its fields cannot be reached.
    pub fn change_password(&mut self, old: &str, new: &str, confirm: &str) -> GatewayResult<()> {
        require_click(self.gateway, &MY_ACCOUNT)?;
        require_click(self.gateway, &CHANGE_PASSWORD_LINK)?;
        self.gateway.type_text(&OLD_PASSWORD, old)?;
        self.gateway.type_text(&NEW_PASSWORD, new)?;
        self.gateway.type_text(&CONFIRM_NEW_PASSWORD, confirm)?;
        require_click(self.gateway, &CHANGE_PASSWORD_BUTTON)
    }

    /// Close the notification bar
    pub fn close_notification(&mut self) -> bool {
        self.gateway.click(&NOTIFICATION_CLOSE)
    }

    /// Compare both fields against [`PLACEHOLDERS`]
    ///
    /// # Errors
    ///
    /// Fails if a field never appears; mismatches are in the report.
    pub fn validate_placeholders(&mut self) -> GatewayResult<MismatchReport> {
        let timeout = self.gateway.default_timeout();
        AttributeAssertions::new(self.gateway).assert_placeholders(&PLACEHOLDERS, timeout)
    }
}
