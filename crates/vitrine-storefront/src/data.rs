//! Test data for storefront scenarios.
//!
//! One JSON document holds the accounts, form values, search terms and the
//! dialog texts the storefront is expected to show. Dialog texts vary
//! between storefront releases, so each kind carries a list of accepted
//! variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use vitrine::{GatewayError, GatewayResult};

/// Email and password for the login form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email used as the account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Gender radio on the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// `gender-male`
    Male,
    /// `gender-female`
    Female,
}

/// Birth date as the three dropdown labels show it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate {
    /// Day label, e.g. `"14"`
    pub day: String,
    /// Month label, e.g. `"March"`
    pub month: String,
    /// Year label, e.g. `"1990"`
    pub year: String,
}

/// Values for the registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    /// First name (mandatory)
    pub first_name: String,
    /// Last name (mandatory)
    pub last_name: String,
    /// Email (mandatory)
    pub email: String,
    /// Password (mandatory)
    pub password: String,
    /// Password confirmation (mandatory)
    pub confirm_password: String,
    /// Gender radio
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Birth date dropdowns
    #[serde(default)]
    pub birth_date: Option<BirthDate>,
    /// Company name
    #[serde(default)]
    pub company: Option<String>,
    /// Desired state of the newsletter checkbox
    #[serde(default)]
    pub newsletter: bool,
}

/// Search terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    /// Term that finds exactly one product
    pub valid_product: String,
    /// Term that finds nothing
    pub invalid_product: String,
    /// Term that finds several products
    pub multiple_products_term: String,
    /// Text that only appears in a product description
    #[serde(default)]
    pub description_term: Option<String>,
    /// Category label for advanced search
    #[serde(default)]
    pub category: Option<String>,
}

/// Values for the checkout billing form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    /// Country dropdown label
    pub country: Option<String>,
    /// State dropdown label
    pub state: Option<String>,
    pub city: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub fax_number: Option<String>,
}

/// Delivery option on the shipping method step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// `shippingoption_0`
    #[default]
    Ground,
    /// `shippingoption_1`
    NextDay,
    /// `shippingoption_2`
    SecondDay,
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ground => "Ground",
            Self::NextDay => "Next Day Air",
            Self::SecondDay => "2nd Day Air",
        })
    }
}

/// Card details for the payment information step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    /// Card type dropdown label, e.g. `"Visa"`
    pub card_type: String,
    pub cardholder_name: String,
    pub number: String,
    /// Expiry month dropdown label, e.g. `"04"`
    pub expire_month: String,
    /// Expiry year dropdown label
    pub expire_year: String,
    /// Security code
    pub code: String,
}

/// How the order is paid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payment {
    /// `paymentmethod_0`; the payment information step has nothing to fill
    #[default]
    CheckMoneyOrder,
    /// `paymentmethod_1`
    CreditCard(PaymentCard),
}

/// Choices for the steps after the billing address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutData {
    /// Separate delivery address; `None` ships to the billing address
    pub shipping_address: Option<BillingAddress>,
    pub shipping_method: ShippingMethod,
    pub payment: Payment,
}

/// Native dialogs the storefront raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Header search submitted without a term
    EmptySearch,
    /// Billing form submitted without any field filled
    EmptyBilling,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySearch => write!(f, "empty_search"),
            Self::EmptyBilling => write!(f, "empty_billing"),
        }
    }
}

/// Accepted dialog texts per [`AlertKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertMessages {
    /// Variants for [`AlertKind::EmptySearch`]
    pub empty_search: Vec<String>,
    /// Variants for [`AlertKind::EmptyBilling`]
    pub empty_billing: Vec<String>,
}

impl Default for AlertMessages {
    fn default() -> Self {
        Self {
            empty_search: vec!["Please enter some search keyword".to_string()],
            empty_billing: vec![
                "City is required, Street address is required, Country is required., \
                 Phone is required, Zip / postal code is required"
                    .to_string(),
                "City is required, Email is required., Street address is required, \
                 Last name is required., Country is required., First name is required., \
                 Phone is required, Zip / postal code is required"
                    .to_string(),
            ],
        }
    }
}

impl AlertMessages {
    /// Accepted variants for `kind`
    #[must_use]
    pub fn variants(&self, kind: AlertKind) -> &[String] {
        match kind {
            AlertKind::EmptySearch => &self.empty_search,
            AlertKind::EmptyBilling => &self.empty_billing,
        }
    }

    /// Whether `text` is exactly one of the accepted variants
    #[must_use]
    pub fn accepts(&self, kind: AlertKind, text: &str) -> bool {
        self.variants(kind).iter().any(|variant| variant == text)
    }
}

/// Everything a storefront scenario needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    /// Registered account
    pub valid_user: Credentials,
    /// Account that does not exist
    pub invalid_user: Credentials,
    /// Registration form values
    pub registration: RegistrationForm,
    /// Search terms
    pub search: SearchData,
    /// Billing form values
    #[serde(default)]
    pub billing: BillingAddress,
    /// Shipping and payment choices
    #[serde(default)]
    pub checkout: CheckoutData,
    /// Expected dialog texts
    #[serde(default)]
    pub messages: AlertMessages,
}

impl TestData {
    /// Read and parse a JSON file
    ///
    /// # Errors
    ///
    /// [`GatewayError::TestData`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> GatewayResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GatewayError::TestData {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let data = serde_json::from_str(&content).map_err(|e| GatewayError::TestData {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "test data loaded");
        Ok(data)
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// [`GatewayError::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> GatewayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Name and email the billing form should be prefilled with after
    /// registration
    #[must_use]
    pub fn registered_details(&self) -> (&str, &str, &str) {
        (
            &self.registration.first_name,
            &self.registration.last_name,
            &self.registration.email,
        )
    }
}
