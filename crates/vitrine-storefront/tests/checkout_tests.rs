//! Cart, billing and order placement scenarios against a scripted
//! storefront.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{classed, gateway, test_data, BASE_URL};
use serde_json::Value;
use vitrine::mock::{ClickEffect, MockDom, MockElement, MockSession};
use vitrine::{Action, DialogAction, GatewayError, ScriptArg, SessionError, WaitCondition};
use vitrine_storefront::checkout::{self, billing};
use vitrine_storefront::{
    registration, AlertKind, BillingAddress, BillingDetails, CheckoutPage, Credentials, Payment,
    PaymentCard, ShippingMethod,
};

// =============================================================================
// Cart
// =============================================================================

fn catalogue() -> MockSession {
    let checkout_url = format!("{BASE_URL}onepagecheckout#opc-billing");
    MockSession::new()
        .with_element(
            "add",
            classed("button", "button-2 product-box-add-to-cart-button")
                .on_click(ClickEffect::Reveal("notification".into())),
        )
        .with_element("notification", MockElement::link("shopping cart").hidden())
        .with_element("notification-close", classed("span", "close"))
        .with_element("header-cart", classed("a", "ico-cart"))
        .with_element("terms", MockElement::checkbox("termsofservice"))
        .with_element(
            "checkout",
            MockElement::button("checkout").on_click(ClickEffect::Navigate(checkout_url)),
        )
}

#[test]
fn test_checkout_from_cart_notification() {
    let (mut gw, recorder) = gateway(catalogue());

    let mut page = CheckoutPage::new(&mut gw);
    page.add_first_product_to_cart().unwrap();
    page.accept_terms().unwrap();
    page.proceed_to_checkout().unwrap();
    assert!(page.on_checkout().unwrap());

    assert!(gw.session().dom().is_checked("terms"));
    assert_eq!(recorder.count(Action::Click), 4);
    assert!(recorder.failures().is_empty());
}

#[test]
fn test_checkout_from_header_cart() {
    let (mut gw, _) = gateway(catalogue());

    let mut page = CheckoutPage::new(&mut gw);
    page.add_first_product_via_header().unwrap();
    page.accept_terms().unwrap();
    // ticking an already ticked box is a no-op
    page.accept_terms().unwrap();
    page.proceed_to_checkout().unwrap();
    assert!(page.on_checkout().unwrap());
    assert_eq!(gw.session().count_calls("click:"), 5);
}

#[test]
fn test_empty_cart_message() {
    let session = MockSession::new().with_element(
        "empty",
        classed("div", "order-summary-content no-data").with_text("Your Shopping Cart is empty!"),
    );
    let (mut gw, _) = gateway(session);

    let mut page = CheckoutPage::new(&mut gw);
    page.open().unwrap();
    assert!(page.cart_is_empty());
    assert_eq!(gw.session().dom().url(), format!("{BASE_URL}cart"));
}

#[test]
fn test_guest_checkout_button() {
    let session = MockSession::new()
        .with_element("guest", classed("button", "button-1 checkout-as-guest-button"));
    let (mut gw, _) = gateway(session);

    let mut page = CheckoutPage::new(&mut gw);
    assert!(page.checkout_as_guest());
    assert!(!page.proceed_to_register());
}

// =============================================================================
// Billing address
// =============================================================================

fn billing_form(prefill: &BillingDetails) -> MockSession {
    let field = |id: &str| MockElement::input(id).with_attribute("placeholder", "");
    MockSession::new()
        .with_element("same", MockElement::checkbox("ShipToSameAddress").checked())
        .with_element(
            "first",
            MockElement::input("BillingNewAddress_FirstName").with_value(&prefill.first_name),
        )
        .with_element(
            "last",
            MockElement::input("BillingNewAddress_LastName").with_value(&prefill.last_name),
        )
        .with_element(
            "email",
            MockElement::input("BillingNewAddress_Email").with_value(&prefill.email),
        )
        .with_element("company", field("BillingNewAddress_Company"))
        .with_element(
            "country",
            MockElement::select(
                "BillingNewAddress_CountryId",
                &["Select country", "Canada", "United States of America"],
            ),
        )
        .with_element(
            "state",
            MockElement::select("BillingNewAddress_StateProvinceId", &["Other", "New York", "Ohio"]),
        )
        .with_element("city", field("BillingNewAddress_City"))
        .with_element("address1", field("BillingNewAddress_Address1"))
        .with_element("address2", field("BillingNewAddress_Address2"))
        .with_element("zip", field("BillingNewAddress_ZipPostalCode"))
        .with_element("phone", field("BillingNewAddress_PhoneNumber"))
        .with_element("fax", field("BillingNewAddress_FaxNumber"))
        .with_element("continue", classed("button", "button-1 new-address-next-step-button"))
}

fn registered() -> BillingDetails {
    let data = test_data();
    let (first, last, email) = data.registered_details();
    BillingDetails::new(first, last, email)
}

#[test]
fn test_billing_prefill_matches_registration() {
    let expected = registered();
    let (mut gw, _) = gateway(billing_form(&expected));

    let details = CheckoutPage::new(&mut gw).billing().details().unwrap();
    assert_eq!(details, expected);
    assert!(details.differences(&expected).is_empty());
}

#[test]
fn test_billing_prefill_mismatch_names_field() {
    let expected = registered();
    let prefill = BillingDetails::new("Jane", "Doe", "someone.else@example.com");
    let (mut gw, _) = gateway(billing_form(&prefill));

    let details = CheckoutPage::new(&mut gw).billing().details().unwrap();
    assert_eq!(details.differences(&expected), vec!["email"]);
}

#[test]
fn test_fill_keeps_prefilled_fields() {
    let data = test_data();
    let prefill = BillingDetails::new("Janet", "Doe", "janet@example.com");
    let (mut gw, _) = gateway(billing_form(&prefill));

    CheckoutPage::new(&mut gw).billing().fill(&data.billing).unwrap();

    let session = gw.session();
    let dom = session.dom();
    assert_eq!(dom.value_of("first").as_deref(), Some("Janet"));
    assert_eq!(dom.value_of("email").as_deref(), Some("janet@example.com"));
    assert_eq!(dom.value_of("company").as_deref(), Some("Doe Industries"));
    assert_eq!(dom.value_of("city").as_deref(), Some("New York"));
    assert_eq!(dom.value_of("zip").as_deref(), Some("10001"));
    assert_eq!(dom.value_of("fax").as_deref(), Some("5557654321"));
    assert_eq!(dom.selected_label("country").as_deref(), Some("United States of America"));
    assert_eq!(dom.selected_label("state").as_deref(), Some("New York"));
    assert!(!session.was_called(&format!("send_keys:{}:", dom.node_id("first").unwrap())));
    assert!(session.was_called(&format!("click:{}", dom.node_id("continue").unwrap())));
}

#[test]
fn test_fill_mandatory_subset_leaves_optional_fields_empty() {
    let address = BillingAddress {
        country: Some("Canada".to_string()),
        city: Some("Toronto".to_string()),
        address1: Some("1 King Street".to_string()),
        zip_code: Some("M5H".to_string()),
        phone_number: Some("4165550000".to_string()),
        ..BillingAddress::default()
    };
    let (mut gw, _) = gateway(billing_form(&registered()));

    CheckoutPage::new(&mut gw).billing().fill(&address).unwrap();

    let dom = gw.session().dom();
    assert_eq!(dom.selected_label("country").as_deref(), Some("Canada"));
    assert_eq!(dom.selected_label("state").as_deref(), Some("Other"));
    assert_eq!(dom.value_of("address2").as_deref(), Some(""));
    assert_eq!(dom.value_of("company").as_deref(), Some(""));
}

#[test]
fn test_fill_unknown_country_fails() {
    let mut address = test_data().billing;
    address.country = Some("Atlantis".to_string());
    let (mut gw, _) = gateway(billing_form(&registered()));

    let err = CheckoutPage::new(&mut gw).billing().fill(&address).unwrap_err();
    assert!(matches!(err, GatewayError::OptionNotFound { .. }));
    assert!(!gw.session().was_called("click:"));
}

#[test]
fn test_submit_empty_billing_dialog() {
    let data = test_data();
    let message = data.messages.variants(AlertKind::EmptyBilling)[1].clone();
    let session = billing_form(&BillingDetails::default()).with_element(
        "continue",
        classed("button", "button-1 new-address-next-step-button")
            .on_click(ClickEffect::OpenAlert(message.clone())),
    );
    let (mut gw, _) = gateway(session);

    let text = CheckoutPage::new(&mut gw).billing().submit_empty().unwrap();
    assert_eq!(text, message);
    assert!(data.messages.accepts(AlertKind::EmptyBilling, &text));
    assert_eq!(gw.session().dom().dialogs()[0].action(), &DialogAction::Accept);
}

#[test]
fn test_billing_placeholders_empty() {
    let (mut gw, _) = gateway(billing_form(&registered()));
    let report = CheckoutPage::new(&mut gw).billing().validate_placeholders().unwrap();
    assert!(report.is_empty(), "{report}");

    gw.session_mut().dom_mut().set_attribute("city", "placeholder", "City");
    let report = CheckoutPage::new(&mut gw).billing().validate_placeholders().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.mismatches()[0].locator, billing::CITY);
}

#[test]
fn test_untick_ship_to_same_address() {
    let (mut gw, _) = gateway(billing_form(&registered()));
    CheckoutPage::new(&mut gw).billing().ship_to_same_address(false).unwrap();
    assert!(!gw.session().dom().is_checked("same"));
}

#[test]
fn test_checkout_click_blocked_by_open_dialog() {
    let (mut gw, recorder) = gateway(catalogue());
    gw.session_mut().dom_mut().open_alert("Please accept the terms of service");

    let err = CheckoutPage::new(&mut gw).proceed_to_checkout().unwrap_err();
    match err {
        GatewayError::Session(SessionError::UnexpectedAlert { text }) => {
            assert_eq!(text, "Please accept the terms of service");
        }
        other => panic!("expected the open dialog to be reported, got {other:?}"),
    }
    assert!(!gw.session().was_called("click:"));
    assert_eq!(recorder.failures().len(), 1);
}

// =============================================================================
// Cart flyout
// =============================================================================

fn with_flyout(session: MockSession) -> MockSession {
    session
        .with_element(
            "go-to-cart",
            classed("button", "button-1 cart-button")
                .matching(checkout::GO_TO_CART)
                .hidden(),
        )
        .on_script("mouseover", |dom: &mut MockDom, _: &[ScriptArg]| {
            dom.reveal("go-to-cart");
            Value::Null
        })
}

#[test]
fn test_cart_reached_through_flyout() {
    let (mut gw, recorder) = gateway(with_flyout(catalogue()));

    CheckoutPage::new(&mut gw).add_first_product_via_flyout().unwrap();

    let session = gw.session();
    assert!(session.was_called("script:arguments[0].dispatchEvent(new MouseEvent('mouseover'"));
    let go = session.dom().node_id("go-to-cart").unwrap();
    assert!(session.was_called(&format!("click:{go}")));
    assert!(recorder.failures().is_empty());
}

#[test]
fn test_flyout_that_never_opens() {
    let session = catalogue().with_element(
        "go-to-cart",
        classed("button", "button-1 cart-button")
            .matching(checkout::GO_TO_CART)
            .hidden(),
    );
    let (mut gw, _) = gateway(session);

    let err = CheckoutPage::new(&mut gw).open_cart_via_flyout().unwrap_err();
    match err {
        GatewayError::ElementNotFound { locator, condition, .. } => {
            assert_eq!(locator, checkout::GO_TO_CART);
            assert_eq!(condition, WaitCondition::Visible);
        }
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
}

// =============================================================================
// Sign-in step
// =============================================================================

fn sign_in_step() -> MockSession {
    MockSession::new()
        .with_element("sign-in-email", MockElement::input("Email"))
        .with_element("sign-in-password", MockElement::password("Password"))
        .with_element("login", classed("button", "button-1 login-button"))
        .with_element("register", classed("button", "button-1 register-button"))
}

#[test]
fn test_login_from_sign_in_step() {
    let data = test_data();
    let (mut gw, _) = gateway(sign_in_step());

    CheckoutPage::new(&mut gw).login(&data.valid_user).unwrap();

    let dom = gw.session().dom();
    assert_eq!(dom.value_of("sign-in-email").as_deref(), Some(data.valid_user.username.as_str()));
    assert_eq!(
        dom.value_of("sign-in-password").as_deref(),
        Some(data.valid_user.password.as_str())
    );
    let login = dom.node_id("login").unwrap().to_string();
    assert!(gw.session().was_called(&format!("click:{login}")));
}

#[test]
fn test_register_account_from_sign_in_step() {
    let (mut gw, _) = gateway(sign_in_step());

    let account = Credentials::new("new.customer@example.com", "Secret123!");
    CheckoutPage::new(&mut gw).register_account(&account).unwrap();

    let session = gw.session();
    let dom = session.dom();
    assert_eq!(dom.value_of("sign-in-email").as_deref(), Some("new.customer@example.com"));
    assert!(session.was_called(&format!("click:{}", dom.node_id("register").unwrap())));
    assert!(!session.was_called(&format!("click:{}", dom.node_id("login").unwrap())));
}

// =============================================================================
// Placing orders
// =============================================================================

fn radio(id: &str) -> MockElement {
    MockElement::new("input").with_id(id).with_attribute("type", "radio")
}

/// Catalogue, billing form and every later checkout section
///
/// Billing and shipping address share a continue class, so the billing
/// button hides itself and reveals the shipping one.
fn storefront(prefill: &BillingDetails) -> MockSession {
    let mut session = billing_form(prefill)
        .with_element(
            "continue",
            classed("button", "button-1 new-address-next-step-button")
                .on_click(ClickEffect::Hide("continue".into()))
                .on_click(ClickEffect::Reveal("shipping-continue".into())),
        )
        .with_element("guest", classed("button", "button-1 checkout-as-guest-button"));

    for (key, id) in [
        ("ship-first", "ShippingNewAddress_FirstName"),
        ("ship-last", "ShippingNewAddress_LastName"),
        ("ship-email", "ShippingNewAddress_Email"),
        ("ship-city", "ShippingNewAddress_City"),
        ("ship-address1", "ShippingNewAddress_Address1"),
        ("ship-zip", "ShippingNewAddress_ZipPostalCode"),
        ("ship-phone", "ShippingNewAddress_PhoneNumber"),
    ] {
        session = session.with_element(key, MockElement::input(id));
    }

    session = session
        .with_element(
            "ship-country",
            MockElement::select("ShippingNewAddress_CountryId", &["Select country", "Canada"]),
        )
        .with_element(
            "ship-state",
            MockElement::select("ShippingNewAddress_StateProvinceId", &["Other", "Ontario"]),
        )
        .with_element(
            "shipping-continue",
            classed("button", "button-1 new-address-next-step-button").hidden(),
        )
        .with_element("ground", radio("shippingoption_0").checked())
        .with_element("next-day", radio("shippingoption_1"))
        .with_element("second-day", radio("shippingoption_2"))
        .with_element(
            "method-continue",
            classed("button", "button-1 shipping-method-next-step-button"),
        )
        .with_element("check-money", radio("paymentmethod_0").checked())
        .with_element("card", radio("paymentmethod_1"))
        .with_element(
            "payment-continue",
            classed("button", "button-1 payment-method-next-step-button"),
        )
        .with_element("card-type", MockElement::select("CreditCardType", &["Visa", "Master card"]))
        .with_element("cardholder", MockElement::input("CardholderName"))
        .with_element("card-number", MockElement::input("CardNumber"))
        .with_element("expire-month", MockElement::select("ExpireMonth", &["01", "04", "12"]))
        .with_element("expire-year", MockElement::select("ExpireYear", &["2026", "2027"]))
        .with_element("card-code", MockElement::input("CardCode"))
        .with_element(
            "info-continue",
            classed("button", "button-1 payment-info-next-step-button"),
        )
        .with_element(
            "confirm",
            classed("button", "button-1 confirm-order-next-step-button")
                .on_click(ClickEffect::Reveal("completed".into()))
                .on_click(ClickEffect::Reveal("order-number".into())),
        )
        .with_element("completed", classed("div", "section order-completed").hidden())
        .with_element(
            "order-number",
            classed("div", "order-number").with_text("ORDER NUMBER: 1234").hidden(),
        );

    let cart = ["add", "notification", "notification-close", "header-cart", "terms", "checkout"];
    merge(session, &catalogue(), &cart)
}

/// Copy the elements stored under `keys` from another scripted page
fn merge(session: MockSession, from: &MockSession, keys: &[&str]) -> MockSession {
    let mut session = session;
    for key in keys {
        if let Some(element) = from.dom().element(key) {
            session = session.with_element(key, element.clone());
        }
    }
    session
}

fn clicked(session: &MockSession, key: &str) -> bool {
    session
        .dom()
        .node_id(key)
        .is_some_and(|id| session.was_called(&format!("click:{id}")))
}

#[test]
fn test_guest_order_with_check_payment() {
    let data = test_data();
    let (mut gw, recorder) = gateway(storefront(&BillingDetails::default()));

    let mut page = CheckoutPage::new(&mut gw);
    let number = page.place_order_as_guest(&data).unwrap();
    assert_eq!(number, "1234");
    assert!(page.confirm().is_completed());

    let session = gw.session();
    let dom = session.dom();
    assert!(clicked(session, "guest"));
    assert_eq!(dom.value_of("first").as_deref(), Some("Jane"));
    assert_eq!(dom.selected_label("state").as_deref(), Some("New York"));
    // billing address doubles as the delivery address
    assert!(dom.is_checked("same"));
    assert!(!clicked(session, "shipping-continue"));
    assert_eq!(data.checkout.shipping_method, ShippingMethod::NextDay);
    assert!(dom.is_checked("next-day"));
    assert!(dom.is_checked("check-money"));
    assert!(!clicked(session, "card"));
    assert!(clicked(session, "info-continue"));
    assert_eq!(dom.value_of("card-number").as_deref(), Some(""));
    assert!(recorder.failures().is_empty());
}

#[test]
fn test_guest_order_with_card_and_separate_delivery() {
    let mut data = test_data();
    data.checkout.shipping_address = Some(BillingAddress {
        first_name: Some("John".to_string()),
        last_name: Some("Roe".to_string()),
        email: Some("john.roe@example.com".to_string()),
        country: Some("Canada".to_string()),
        state: Some("Ontario".to_string()),
        city: Some("Toronto".to_string()),
        address1: Some("1 King Street".to_string()),
        zip_code: Some("M5H".to_string()),
        phone_number: Some("4165550000".to_string()),
        ..BillingAddress::default()
    });
    data.checkout.shipping_method = ShippingMethod::SecondDay;
    data.checkout.payment = Payment::CreditCard(PaymentCard {
        card_type: "Master card".to_string(),
        cardholder_name: "Jane Doe".to_string(),
        number: "5500000000000004".to_string(),
        expire_month: "04".to_string(),
        expire_year: "2027".to_string(),
        code: "123".to_string(),
    });
    let (mut gw, recorder) = gateway(storefront(&BillingDetails::default()));

    let number = CheckoutPage::new(&mut gw).place_order_as_guest(&data).unwrap();
    assert_eq!(number, "1234");

    let session = gw.session();
    let dom = session.dom();
    assert!(!dom.is_checked("same"));
    assert_eq!(dom.value_of("ship-first").as_deref(), Some("John"));
    assert_eq!(dom.value_of("ship-city").as_deref(), Some("Toronto"));
    assert_eq!(dom.selected_label("ship-country").as_deref(), Some("Canada"));
    assert_eq!(dom.selected_label("ship-state").as_deref(), Some("Ontario"));
    assert!(clicked(session, "shipping-continue"));
    assert!(dom.is_checked("second-day"));
    assert!(dom.is_checked("card"));
    assert_eq!(dom.selected_label("card-type").as_deref(), Some("Master card"));
    assert_eq!(dom.value_of("card-number").as_deref(), Some("5500000000000004"));
    assert_eq!(dom.selected_label("expire-month").as_deref(), Some("04"));
    assert_eq!(dom.selected_label("expire-year").as_deref(), Some("2027"));
    assert_eq!(dom.value_of("card-code").as_deref(), Some("123"));
    assert!(recorder.failures().is_empty());
}

#[test]
fn test_unknown_card_type_stops_before_confirmation() {
    let mut data = test_data();
    data.checkout.payment = Payment::CreditCard(PaymentCard {
        card_type: "Amex".to_string(),
        cardholder_name: "Jane Doe".to_string(),
        number: "340000000000009".to_string(),
        expire_month: "04".to_string(),
        expire_year: "2027".to_string(),
        code: "1234".to_string(),
    });
    let (mut gw, _) = gateway(storefront(&BillingDetails::default()));

    let err = CheckoutPage::new(&mut gw).place_order_as_guest(&data).unwrap_err();
    assert!(matches!(err, GatewayError::OptionNotFound { .. }));
    assert!(!clicked(gw.session(), "confirm"));
}

#[test]
fn test_signed_in_order_checks_prefill() {
    let data = test_data();
    let (mut gw, _) = gateway(storefront(&registered()));

    let number = CheckoutPage::new(&mut gw).place_order_signed_in(&data).unwrap();
    assert_eq!(number, "1234");

    let session = gw.session();
    let first = session.dom().node_id("first").unwrap();
    assert!(!session.was_called(&format!("send_keys:{first}:")));
    assert!(!clicked(session, "guest"));
}

#[test]
fn test_signed_in_order_stops_on_prefill_mismatch() {
    let data = test_data();
    let prefill = BillingDetails::new("Jane", "Doe", "someone.else@example.com");
    let (mut gw, _) = gateway(storefront(&prefill));

    let err = CheckoutPage::new(&mut gw).place_order_signed_in(&data).unwrap_err();
    let GatewayError::Mismatches(report) = err else {
        panic!("expected a mismatch report, got {err:?}");
    };
    assert_eq!(report.len(), 1);
    let mismatch = &report.mismatches()[0];
    assert_eq!(mismatch.locator, billing::EMAIL);
    assert_eq!(mismatch.expected, data.registration.email);
    assert_eq!(mismatch.actual.as_deref(), Some("someone.else@example.com"));
    assert!(!clicked(gw.session(), "continue"));
}

#[test]
fn test_returning_customer_signs_in_at_checkout() {
    let data = test_data();
    let sign_in = ["sign-in-email", "sign-in-password", "login", "register"];
    let session = merge(storefront(&registered()), &sign_in_step(), &sign_in);
    let (mut gw, recorder) = gateway(session);

    let number = CheckoutPage::new(&mut gw).place_order_as_returning_customer(&data).unwrap();
    assert_eq!(number, "1234");

    let session = gw.session();
    assert_eq!(
        session.dom().value_of("sign-in-email").as_deref(),
        Some(data.valid_user.username.as_str())
    );
    assert!(clicked(session, "login"));
    // once before signing in, once after
    assert_eq!(
        session.count_calls(&format!("click:{}", session.dom().node_id("checkout").unwrap())),
        2
    );
    assert!(recorder.failures().is_empty());
}

fn registration_step(registers: bool) -> MockSession {
    let mut submit = MockElement::button("register-button");
    if registers {
        submit = submit.on_click(ClickEffect::Reveal("result".into()));
    }
    MockSession::new()
        .with_element("register", classed("button", "button-1 register-button"))
        .with_element("reg-first", MockElement::input("FirstName"))
        .with_element("reg-last", MockElement::input("LastName"))
        .with_element("reg-email", MockElement::input("Email"))
        .with_element("reg-password", MockElement::password("Password"))
        .with_element("reg-confirm", MockElement::password("ConfirmPassword"))
        .with_element("register-submit", submit)
        .with_element(
            "result",
            classed("div", "result").with_text("Your registration completed").hidden(),
        )
        .with_element(
            "register-continue",
            classed("a", "button-1 register-continue-button"),
        )
}

fn with_registration(session: MockSession, registers: bool) -> MockSession {
    let keys = [
        "register",
        "reg-first",
        "reg-last",
        "reg-email",
        "reg-password",
        "reg-confirm",
        "register-submit",
        "result",
        "register-continue",
    ];
    merge(session, &registration_step(registers), &keys)
}

#[test]
fn test_new_customer_registers_then_orders() {
    let data = test_data();
    let (mut gw, recorder) = gateway(with_registration(storefront(&registered()), true));

    let number = CheckoutPage::new(&mut gw).place_order_as_new_customer(&data).unwrap();
    assert_eq!(number, "1234");

    let session = gw.session();
    let dom = session.dom();
    assert_eq!(dom.value_of("reg-email").as_deref(), Some(data.registration.email.as_str()));
    assert_eq!(dom.value_of("reg-confirm").as_deref(), Some("Secret123!"));
    assert!(clicked(session, "register-continue"));
    assert!(clicked(session, "header-cart"));
    assert!(recorder.failures().is_empty());
}

#[test]
fn test_new_customer_stops_when_registration_fails() {
    let data = test_data();
    let (mut gw, _) = gateway(with_registration(storefront(&registered()), false));

    let err = CheckoutPage::new(&mut gw).place_order_as_new_customer(&data).unwrap_err();
    match err {
        GatewayError::ElementNotFound { locator, .. } => assert_eq!(locator, registration::RESULT),
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
    assert!(!clicked(gw.session(), "register-continue"));
}
