//! Shipping method step.

use crate::data::ShippingMethod;
use crate::{require_click, set_checked};
use vitrine::{BrowserSession, Gateway, GatewayResult, Locator};

/// "Ground" radio
pub const GROUND: Locator = Locator::id("shippingoption_0");
/// "Next Day Air" radio
pub const NEXT_DAY: Locator = Locator::id("shippingoption_1");
/// "2nd Day Air" radio
pub const SECOND_DAY: Locator = Locator::id("shippingoption_2");
/// Back to the address step
pub const BACK: Locator = Locator::class_name("back-link");
/// Continue to payment
pub const CONTINUE: Locator = Locator::class_name("shipping-method-next-step-button");

/// Radio button for `method`
#[must_use]
pub fn radio(method: ShippingMethod) -> Locator {
    match method {
        ShippingMethod::Ground => GROUND,
        ShippingMethod::NextDay => NEXT_DAY,
        ShippingMethod::SecondDay => SECOND_DAY,
    }
}

/// Delivery options
#[derive(Debug)]
pub struct ShippingMethodSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> ShippingMethodSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Pick `method` and continue
    ///
    /// # Errors
    ///
    /// Fails if the radio or the continue button cannot be clicked.
    pub fn select(&mut self, method: ShippingMethod) -> GatewayResult<()> {
        tracing::info!(%method, "selecting shipping method");
        set_checked(self.gateway, &radio(method), true)?;
        require_click(self.gateway, &CONTINUE)
    }

    /// Go back to the address step
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }
}
