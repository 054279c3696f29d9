//! Shopping cart and the one-page checkout.
//!
//! The cart is reached from the "added to cart" notification, from the
//! header link or through the header's cart flyout. Checkout starts only
//! once the terms of service box is ticked; anonymous visitors then choose
//! between guest checkout, registration and login. The checkout itself is
//! a sequence of sections, each with its own page object:
//!
//! ```text
//! billing ─► [shipping address] ─► shipping method ─► payment method
//!         ─► payment information ─► confirm
//! ```
//!
//! The shipping address section only opens when "Ship to the same address"
//! is cleared on the billing step.

pub mod billing;
pub mod confirm;
pub mod payment_info;
pub mod payment_method;
pub mod shipping;
pub mod shipping_method;

pub use billing::{BillingAddressSection, BillingDetails};
pub use confirm::ConfirmOrderSection;
pub use payment_info::PaymentInfoSection;
pub use payment_method::PaymentMethodSection;
pub use shipping::ShippingAddressSection;
pub use shipping_method::ShippingMethodSection;

use crate::data::{Credentials, Payment, TestData};
use crate::login::{self, LoginPage};
use crate::registration::{self, RegistrationPage};
use crate::{hover, require_click, set_checked};
use vitrine::{
    BrowserSession, Gateway, GatewayError, GatewayResult, Locator, PageObject, PageRoute,
    WaitCondition,
};

// Product listing and notification bar
/// "Add to cart" on the first product box
pub const ADD_TO_CART: Locator = Locator::class_name("product-box-add-to-cart-button");
/// "shopping cart" link in the added-to-cart notification
pub const NOTIFICATION_CART_LINK: Locator = Locator::link_text("shopping cart");
/// Close button of the notification bar
pub const NOTIFICATION_CLOSE: Locator = Locator::class_name("close");

// Header
/// "Shopping cart" header link; hovering it opens the flyout
pub const HEADER_CART: Locator = Locator::class_name("ico-cart");
/// "Go to cart" in the mini cart shown while the header link is hovered
pub const GO_TO_CART: Locator = Locator::css("#flyout-cart .cart-button");

// Cart page
/// Remove button of a cart line
pub const REMOVE_ITEM: Locator = Locator::class_name("remove-btn");
/// "Continue shopping"
pub const CONTINUE_SHOPPING: Locator = Locator::class_name("continue-shopping-button");
/// Gift wrapping dropdown
pub const GIFT_WRAPPING: Locator = Locator::id("checkout_attribute_1");
/// Terms of service checkbox
pub const TERMS_OF_SERVICE: Locator = Locator::id("termsofservice");
/// "Checkout"
pub const CHECKOUT: Locator = Locator::id("checkout");
/// "Your Shopping Cart is empty!"
pub const EMPTY_CART: Locator = Locator::class_name("no-data");

// Sign-in step for anonymous visitors
/// "Checkout as Guest"
pub const CHECKOUT_AS_GUEST: Locator = Locator::class_name("checkout-as-guest-button");
/// "Register"
pub const REGISTER: Locator = Locator::class_name("register-button");
/// "Continue" on the registration result page
pub const REGISTER_CONTINUE: Locator = Locator::class_name("register-continue-button");

/// `/cart` and the checkout entry points
#[derive(Debug)]
pub struct CheckoutPage<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<S: BrowserSession> PageObject for CheckoutPage<'_, S> {
    fn path(&self) -> &str {
        "cart"
    }
}

impl<'g, S: BrowserSession> CheckoutPage<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Navigate to the cart
    ///
    /// # Errors
    ///
    /// Propagates navigation errors.
    pub fn open(&mut self) -> GatewayResult<()> {
        let route = PageRoute::of(&*self);
        self.gateway.open_page(&route)
    }

    // =========================================================================
    // CART
    // =========================================================================

    /// Add the first listed product and follow the notification to the
    /// cart
    ///
    /// # Errors
    ///
    /// Fails if the button or the notification link is not clickable.
    pub fn add_first_product_to_cart(&mut self) -> GatewayResult<()> {
        tracing::info!("adding first product to cart");
        require_click(self.gateway, &ADD_TO_CART)?;
        require_click(self.gateway, &NOTIFICATION_CART_LINK)
    }

    /// Add the first listed product, dismiss the notification and use the
    /// header link instead
    ///
    /// # Errors
    ///
    /// Fails if any of the three controls is not clickable.
    pub fn add_first_product_via_header(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &ADD_TO_CART)?;
        require_click(self.gateway, &NOTIFICATION_CLOSE)?;
        require_click(self.gateway, &HEADER_CART)
    }

    /// Add the first listed product, dismiss the notification and reach
    /// the cart through the header flyout
    ///
    /// # Errors
    ///
    /// Fails if a control is not clickable or the flyout never opens.
    pub fn add_first_product_via_flyout(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &ADD_TO_CART)?;
        require_click(self.gateway, &NOTIFICATION_CLOSE)?;
        self.open_cart_via_flyout()
    }

    /// Open the cart from the header
    pub fn open_cart_from_header(&mut self) -> bool {
        self.gateway.click(&HEADER_CART)
    }

    /// Hover the header cart link and click "Go to cart" in the flyout
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] if the flyout button never shows.
    pub fn open_cart_via_flyout(&mut self) -> GatewayResult<()> {
        hover(self.gateway, &HEADER_CART)?;
        let timeout = self.gateway.default_timeout();
        self.gateway.resolve(&GO_TO_CART, WaitCondition::Visible, timeout)?;
        require_click(self.gateway, &GO_TO_CART)
    }

    /// Tick the terms of service box
    ///
    /// # Errors
    ///
    /// Fails if the box never appears.
    pub fn accept_terms(&mut self) -> GatewayResult<()> {
        set_checked(self.gateway, &TERMS_OF_SERVICE, true)
    }

    /// Click "Checkout"
    ///
    /// # Errors
    ///
    /// Fails if the button is not clickable.
    pub fn proceed_to_checkout(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &CHECKOUT)
    }

    /// Whether the browser is on a checkout URL
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn on_checkout(&mut self) -> GatewayResult<bool> {
        Ok(self.gateway.current_url()?.contains("checkout"))
    }

    /// Remove the first cart line
    pub fn remove_first_item(&mut self) -> bool {
        self.gateway.click(&REMOVE_ITEM)
    }

    /// Back to the catalogue from the cart
    pub fn continue_shopping(&mut self) -> bool {
        self.gateway.click(&CONTINUE_SHOPPING)
    }

    /// Pick a gift wrapping option
    ///
    /// # Errors
    ///
    /// Fails if the dropdown cannot be reached or lacks the option.
    pub fn select_gift_wrapping(&mut self, label: &str) -> GatewayResult<()> {
        self.gateway.select_option(&GIFT_WRAPPING, label)
    }

    /// Whether the cart shows "Your Shopping Cart is empty!"
    pub fn cart_is_empty(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&EMPTY_CART, timeout)
    }

    // =========================================================================
    // SIGN-IN STEP
    // =========================================================================

    /// Continue as a guest from the sign-in step
    pub fn checkout_as_guest(&mut self) -> bool {
        self.gateway.click(&CHECKOUT_AS_GUEST)
    }

    /// Register from the sign-in step
    pub fn proceed_to_register(&mut self) -> bool {
        self.gateway.click(&REGISTER)
    }

    /// Sign in with an existing account from the sign-in step
    ///
    /// # Errors
    ///
    /// Fails if the form fields or the login button cannot be reached.
    pub fn login(&mut self, credentials: &Credentials) -> GatewayResult<()> {
        LoginPage::new(self.gateway).login(credentials)
    }

    /// Enter an email and password in the sign-in form and register with
    /// them
    ///
    /// # Errors
    ///
    /// Fails if a field or the register button cannot be reached.
    pub fn register_account(&mut self, credentials: &Credentials) -> GatewayResult<()> {
        self.gateway.type_text(&login::EMAIL, &credentials.username)?;
        self.gateway.type_text(&login::PASSWORD, &credentials.password)?;
        require_click(self.gateway, &REGISTER)
    }

    /// Continue after a registration started from checkout
    pub fn continue_after_register(&mut self) -> bool {
        self.gateway.click(&REGISTER_CONTINUE)
    }

    /// Leave the registration result page and start checkout again from
    /// the header cart
    ///
    /// # Errors
    ///
    /// Fails if any control on the way is not clickable.
    pub fn continue_to_checkout(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &REGISTER_CONTINUE)?;
        require_click(self.gateway, &HEADER_CART)?;
        self.accept_terms()?;
        self.proceed_to_checkout()
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    /// The billing address step
    pub fn billing(&mut self) -> BillingAddressSection<'_, S> {
        BillingAddressSection::new(self.gateway)
    }

    /// The shipping address step
    pub fn shipping(&mut self) -> ShippingAddressSection<'_, S> {
        ShippingAddressSection::new(self.gateway)
    }

    /// The shipping method step
    pub fn shipping_method(&mut self) -> ShippingMethodSection<'_, S> {
        ShippingMethodSection::new(self.gateway)
    }

    /// The payment method step
    pub fn payment_method(&mut self) -> PaymentMethodSection<'_, S> {
        PaymentMethodSection::new(self.gateway)
    }

    /// The payment information step
    pub fn payment_info(&mut self) -> PaymentInfoSection<'_, S> {
        PaymentInfoSection::new(self.gateway)
    }

    /// The confirm order step
    pub fn confirm(&mut self) -> ConfirmOrderSection<'_, S> {
        ConfirmOrderSection::new(self.gateway)
    }

    // =========================================================================
    // ORDER FLOWS
    // =========================================================================

    /// Buy the first listed product without an account
    ///
    /// Returns the order number.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step.
    pub fn place_order_as_guest(&mut self, data: &TestData) -> GatewayResult<String> {
        tracing::info!("placing order as guest");
        self.start_checkout()?;
        require_click(self.gateway, &CHECKOUT_AS_GUEST)?;
        self.complete_order(data, None)
    }

    /// Register from the sign-in step with the fixture's mandatory fields,
    /// then buy the first listed product
    ///
    /// # Errors
    ///
    /// [`GatewayError::ElementNotFound`] for the result banner when
    /// registration does not complete; otherwise the first failing step.
    pub fn place_order_as_new_customer(&mut self, data: &TestData) -> GatewayResult<String> {
        tracing::info!("placing order as new customer");
        self.start_checkout()?;
        require_click(self.gateway, &REGISTER)?;

        let mut page = RegistrationPage::new(self.gateway);
        page.fill_mandatory(&data.registration)?;
        if !page.submit() {
            return Err(GatewayError::ElementNotFound {
                locator: registration::RESULT,
                condition: WaitCondition::Visible,
                timeout: self.gateway.default_timeout(),
            });
        }

        self.continue_to_checkout()?;
        self.complete_order(data, Some(&registered_billing(data)))
    }

    /// Sign in from the sign-in step with the fixture's valid account, then
    /// buy the first listed product
    ///
    /// # Errors
    ///
    /// Propagates the first failing step.
    pub fn place_order_as_returning_customer(&mut self, data: &TestData) -> GatewayResult<String> {
        tracing::info!("placing order as returning customer");
        self.start_checkout()?;
        self.login(&data.valid_user)?;
        self.accept_terms()?;
        self.proceed_to_checkout()?;
        self.complete_order(data, Some(&registered_billing(data)))
    }

    /// Buy the first listed product with a customer already signed in
    ///
    /// # Errors
    ///
    /// Propagates the first failing step.
    pub fn place_order_signed_in(&mut self, data: &TestData) -> GatewayResult<String> {
        tracing::info!("placing order as signed-in customer");
        self.start_checkout()?;
        self.complete_order(data, Some(&registered_billing(data)))
    }

    /// Walk the checkout sections from billing to confirmation
    ///
    /// When `expected` is given the prefilled billing name and email are
    /// checked first. Returns the order number.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Mismatches`] when the prefill differs from
    /// `expected`; otherwise the first failing step.
    pub fn complete_order(
        &mut self,
        data: &TestData,
        expected: Option<&BillingDetails>,
    ) -> GatewayResult<String> {
        let plan = &data.checkout;
        {
            let mut billing = self.billing();
            if let Some(expected) = expected {
                billing.verify_prefill(expected)?;
            }
            if plan.shipping_address.is_some() {
                billing.ship_to_same_address(false)?;
            }
            billing.fill(&data.billing)?;
        }
        if let Some(address) = &plan.shipping_address {
            self.shipping().fill(address)?;
        }
        self.shipping_method().select(plan.shipping_method)?;
        self.payment_method().select(&plan.payment)?;
        match &plan.payment {
            Payment::CheckMoneyOrder => self.payment_info().proceed()?,
            Payment::CreditCard(card) => self.payment_info().fill_card(card)?,
        }
        self.confirm().confirm()
    }

    fn start_checkout(&mut self) -> GatewayResult<()> {
        self.add_first_product_to_cart()?;
        self.accept_terms()?;
        self.proceed_to_checkout()
    }
}

fn registered_billing(data: &TestData) -> BillingDetails {
    let (first_name, last_name, email) = data.registered_details();
    BillingDetails::new(first_name, last_name, email)
}
