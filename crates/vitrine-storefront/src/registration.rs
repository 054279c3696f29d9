//! Registration page and password strength rules.

use crate::data::{BirthDate, Gender, RegistrationForm};
use crate::{require_click, set_checked, set_input_type};
use serde::{Deserialize, Serialize};
use std::fmt;
use vitrine::{
    AttributeAssertions, BrowserSession, Gateway, GatewayResult, Locator, MismatchReport,
    PageObject, PageRoute,
};

/// "Male" radio
pub const GENDER_MALE: Locator = Locator::id("gender-male");
/// "Female" radio
pub const GENDER_FEMALE: Locator = Locator::id("gender-female");
/// First name
pub const FIRST_NAME: Locator = Locator::id("FirstName");
/// Inline error under first name
pub const FIRST_NAME_ERROR: Locator = Locator::id("FirstName-error");
/// Last name
pub const LAST_NAME: Locator = Locator::id("LastName");
/// Inline error under last name
pub const LAST_NAME_ERROR: Locator = Locator::id("LastName-error");
/// Day of birth dropdown
pub const BIRTH_DAY: Locator = Locator::name("DateOfBirthDay");
/// Month of birth dropdown
pub const BIRTH_MONTH: Locator = Locator::name("DateOfBirthMonth");
/// Year of birth dropdown
pub const BIRTH_YEAR: Locator = Locator::name("DateOfBirthYear");
/// Email
pub const EMAIL: Locator = Locator::id("Email");
/// Inline error under email
pub const EMAIL_ERROR: Locator = Locator::id("Email-error");
/// Company name
pub const COMPANY: Locator = Locator::id("Company");
/// Newsletter checkbox
pub const NEWSLETTER: Locator = Locator::id("Newsletter");
/// Password
pub const PASSWORD: Locator = Locator::id("Password");
/// Inline error under password, also used for strength rules
pub const PASSWORD_ERROR: Locator = Locator::id("Password-error");
/// Password repeated
pub const CONFIRM_PASSWORD: Locator = Locator::id("ConfirmPassword");
/// Inline error under the repeated password
pub const CONFIRM_PASSWORD_ERROR: Locator = Locator::id("ConfirmPassword-error");
/// "Register" submit button
pub const REGISTER_BUTTON: Locator = Locator::id("register-button");
/// "Your registration completed" banner
pub const RESULT: Locator = Locator::class_name("result");

/// Messages shown when the form is submitted empty
pub const MANDATORY_FIELD_ERRORS: [Locator; 5] = [
    FIRST_NAME_ERROR,
    LAST_NAME_ERROR,
    EMAIL_ERROR,
    PASSWORD_ERROR,
    CONFIRM_PASSWORD_ERROR,
];

/// Placeholders the registration form is expected to show
pub const PLACEHOLDERS: [(Locator, &'static str); 5] = [
    (FIRST_NAME, "First name"),
    (LAST_NAME, "Last name"),
    (EMAIL, "Email"),
    (PASSWORD, "Password"),
    (CONFIRM_PASSWORD, "Confirm password"),
];

// =============================================================================
// PASSWORD STRENGTH
// =============================================================================

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+[]{}|;:,.<>?/~";
const MIN_PASSWORD_LENGTH: usize = 8;

/// Strength class of a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PasswordStrength {
    /// Anything that is not medium
    Weak,
    /// At least eight characters with a letter and a digit
    Medium,
    /// At least eight characters with lower and upper case, a digit and a
    /// special character
    Strong,
}

impl PasswordStrength {
    /// Classify `password`
    #[must_use]
    pub fn assess(password: &str) -> Self {
        let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
        let lower = password.chars().any(char::is_lowercase);
        let upper = password.chars().any(char::is_uppercase);
        let digit = password.chars().any(|c| c.is_ascii_digit());
        let special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

        let strength = if long_enough && lower && upper && digit && special {
            Self::Strong
        } else if long_enough && (lower || upper) && digit {
            Self::Medium
        } else {
            Self::Weak
        };
        tracing::debug!(%strength, "password assessed");
        strength
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak => write!(f, "Weak"),
            Self::Medium => write!(f, "Medium"),
            Self::Strong => write!(f, "Strong"),
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// `/register`
#[derive(Debug)]
pub struct RegistrationPage<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<S: BrowserSession> PageObject for RegistrationPage<'_, S> {
    fn path(&self) -> &str {
        "register?returnUrl=%2F"
    }

    fn ready_marker(&self) -> Option<Locator> {
        Some(FIRST_NAME)
    }
}

impl<'g, S: BrowserSession> RegistrationPage<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Navigate here and wait for the form
    ///
    /// # Errors
    ///
    /// Fails if the form does not render in time.
    pub fn open(&mut self) -> GatewayResult<()> {
        let route = PageRoute::of(&*self);
        self.gateway.open_page(&route)
    }

    /// Fill names, email and both password fields
    ///
    /// # Errors
    ///
    /// Fails on the first field that cannot be reached.
    pub fn fill_mandatory(&mut self, form: &RegistrationForm) -> GatewayResult<()> {
        tracing::info!(email = %form.email, "filling mandatory registration fields");
        self.gateway.type_text(&FIRST_NAME, &form.first_name)?;
        self.gateway.type_text(&LAST_NAME, &form.last_name)?;
        self.gateway.type_text(&EMAIL, &form.email)?;
        self.gateway.type_text(&PASSWORD, &form.password)?;
        self.gateway.type_text(&CONFIRM_PASSWORD, &form.confirm_password)
    }

    /// Fill every field the form carries values for
    ///
    /// # Errors
    ///
    /// Fails on the first field or dropdown that cannot be reached.
    pub fn fill_all(&mut self, form: &RegistrationForm) -> GatewayResult<()> {
        if let Some(gender) = form.gender {
            self.select_gender(gender)?;
        }
        self.fill_mandatory(form)?;
        if let Some(birth_date) = &form.birth_date {
            self.select_birth_date(birth_date)?;
        }
        if let Some(company) = &form.company {
            self.gateway.type_text(&COMPANY, company)?;
        }
        set_checked(self.gateway, &NEWSLETTER, form.newsletter)
    }

    /// Pick a gender radio
    ///
    /// # Errors
    ///
    /// Fails if the radio is not clickable.
    pub fn select_gender(&mut self, gender: Gender) -> GatewayResult<()> {
        let radio = match gender {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        };
        set_checked(self.gateway, &radio, true)
    }

    /// Pick day, month and year by their labels
    ///
    /// # Errors
    ///
    /// [`vitrine::GatewayError::OptionNotFound`] if a label is not offered.
    pub fn select_birth_date(&mut self, date: &BirthDate) -> GatewayResult<()> {
        tracing::debug!(day = %date.day, month = %date.month, year = %date.year, "selecting birth date");
        self.gateway.select_option(&BIRTH_DAY, &date.day)?;
        self.gateway.select_option(&BIRTH_MONTH, &date.month)?;
        self.gateway.select_option(&BIRTH_YEAR, &date.year)
    }

    /// Click "Register"; `true` once the result banner shows
    pub fn submit(&mut self) -> bool {
        if !self.gateway.click(&REGISTER_BUTTON) {
            return false;
        }
        let timeout = self.gateway.default_timeout();
        let registered = self.gateway.is_visible(&RESULT, timeout);
        if !registered {
            tracing::warn!("registration result banner did not appear");
        }
        registered
    }

    /// Text of the result banner
    ///
    /// # Errors
    ///
    /// Fails if the banner never shows.
    pub fn result_message(&mut self) -> GatewayResult<String> {
        self.gateway.read_text(&RESULT)
    }

    /// Whether every one of `errors` becomes visible; stops at the first
    /// that does not
    pub fn field_errors_displayed(&mut self, errors: &[Locator]) -> bool {
        let timeout = self.gateway.default_timeout();
        for error in errors {
            if !self.gateway.is_visible(error, timeout) {
                tracing::warn!(locator = %error, "field error not displayed");
                return false;
            }
        }
        true
    }

    /// Whether both password fields render masked
    ///
    /// # Errors
    ///
    /// Fails if either field never appears.
    pub fn passwords_masked(&mut self) -> GatewayResult<bool> {
        let password = self.gateway.read_attribute(&PASSWORD, "type")?;
        let confirm = self.gateway.read_attribute(&CONFIRM_PASSWORD, "type")?;
        Ok(password.as_deref() == Some("password") && confirm.as_deref() == Some("password"))
    }

    /// Flip both password fields between `text` and `password`, following
    /// the current state of the first
    ///
    /// # Errors
    ///
    /// Fails if either field is not visible or the script fails.
    pub fn toggle_password_visibility(&mut self) -> GatewayResult<()> {
        let masked = self.gateway.read_attribute(&PASSWORD, "type")?.as_deref() == Some("password");
        let input_type = if masked { "text" } else { "password" };
        set_input_type(self.gateway, &PASSWORD, input_type)?;
        set_input_type(self.gateway, &CONFIRM_PASSWORD, input_type)
    }

    /// Compare the text fields against [`PLACEHOLDERS`]
    ///
    /// # Errors
    ///
    /// Fails if a field never appears; mismatches are in the report.
    pub fn validate_placeholders(&mut self) -> GatewayResult<MismatchReport> {
        let timeout = self.gateway.default_timeout();
        AttributeAssertions::new(self.gateway).assert_placeholders(&PLACEHOLDERS, timeout)
    }

    /// Submit the form without touching it
    ///
    /// # Errors
    ///
    /// Fails if the register button is not clickable.
    pub fn submit_empty(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &REGISTER_BUTTON)
    }
}
