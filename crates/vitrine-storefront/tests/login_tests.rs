//! Login page scenarios against a scripted storefront.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{classed, gateway, test_data, with_type_switch, BASE_URL};
use vitrine::mock::{ClickEffect, MockElement, MockSession};
use vitrine::{Action, GatewayError};
use vitrine_storefront::{login, Credentials, LoginPage};

/// Login form whose submit button reveals `on_submit`
fn login_form(on_submit: &str) -> MockSession {
    MockSession::new()
        .with_element("email", MockElement::input("Email").with_attribute("placeholder", "Email"))
        .with_element(
            "password",
            MockElement::password("Password").with_attribute("placeholder", "Password"),
        )
        .with_element(
            "submit",
            classed("button", "button-1 login-button").on_click(ClickEffect::Reveal(on_submit.into())),
        )
        .with_element("account", classed("a", "ico-account").hidden())
        .with_element("logout", classed("a", "ico-logout").hidden())
        .with_element(
            "summary",
            classed("div", "message-error validation-summary-errors")
                .with_text("Login was unsuccessful. Please correct the errors and try again.")
                .hidden(),
        )
        .with_element("email-error", MockElement::new("span").with_id("Email-error").hidden())
        .with_element("password-error", MockElement::new("span").with_id("Password-error").hidden())
}

// =============================================================================
// Credentials
// =============================================================================

#[test]
fn test_valid_login_shows_account_link() {
    let data = test_data();
    let (mut gw, _) = gateway(login_form("account"));

    let mut page = LoginPage::new(&mut gw);
    page.open().unwrap();
    page.login(&data.valid_user).unwrap();

    assert!(page.is_logged_in());
    assert!(!page.error_summary_visible());
    assert_eq!(gw.session().dom().value_of("email").as_deref(), Some("jane.doe@example.com"));
    assert_eq!(gw.session().dom().url(), format!("{BASE_URL}login?returnUrl=%2F"));
}

#[test]
fn test_invalid_login_shows_error_summary() {
    let data = test_data();
    let (mut gw, _) = gateway(login_form("summary"));

    let mut page = LoginPage::new(&mut gw);
    page.login(&data.invalid_user).unwrap();

    assert!(page.error_summary_visible());
    assert!(!page.is_logged_in());
}

#[test]
fn test_invalid_email_then_invalid_password() {
    let data = test_data();
    let (mut gw, _) = gateway(login_form("summary"));
    let attempts = [
        Credentials::new("invalidemail@example.com", data.valid_user.password.clone()),
        Credentials::new(data.valid_user.username.clone(), "InvalidPassword123!"),
    ];

    let mut page = LoginPage::new(&mut gw);
    for credentials in &attempts {
        page.login(credentials).unwrap();
        assert!(page.error_summary_visible());
    }
    // each attempt replaces the previous email instead of appending to it
    assert_eq!(
        gw.session().dom().value_of("email").as_deref(),
        Some(data.valid_user.username.as_str())
    );
}

#[test]
fn test_empty_login_shows_field_errors() {
    let session = login_form("email-error");
    let (mut gw, _) = gateway(session);
    gw.session_mut().dom_mut().set_text("email-error", "Please enter your email");

    let mut page = LoginPage::new(&mut gw);
    page.login(&Credentials::new("", "")).unwrap();

    assert_eq!(page.email_error().unwrap(), "Please enter your email");
    let err = page.password_error().unwrap_err();
    assert!(matches!(err, GatewayError::ElementNotFound { .. }));
}

#[test]
fn test_logout_after_login() {
    let session = login_form("account");
    let (mut gw, recorder) = gateway(session);
    gw.session_mut().dom_mut().reveal("logout");

    let mut page = LoginPage::new(&mut gw);
    page.login(&test_data().valid_user).unwrap();
    assert!(page.logout());
    assert_eq!(recorder.count(Action::Click), 2);
}

#[test]
fn test_submit_missing_button_is_an_error() {
    let session = MockSession::new()
        .with_element("email", MockElement::input("Email"))
        .with_element("password", MockElement::password("Password"));
    let (mut gw, _) = gateway(session);

    let err = LoginPage::new(&mut gw).login(&test_data().valid_user).unwrap_err();
    match err {
        GatewayError::ElementNotFound { locator, .. } => assert_eq!(locator, login::SUBMIT),
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Form details
// =============================================================================

#[test]
fn test_placeholders_match() {
    let (mut gw, _) = gateway(login_form("account"));
    let report = LoginPage::new(&mut gw).validate_placeholders().unwrap();
    assert!(report.is_empty(), "{report}");
}

#[test]
fn test_placeholder_mismatch_is_reported() {
    let (mut gw, _) = gateway(login_form("account"));
    gw.session_mut().dom_mut().set_attribute("password", "placeholder", "Your password");

    let report = LoginPage::new(&mut gw).validate_placeholders().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.mismatches()[0].locator, login::PASSWORD);
    assert_eq!(report.mismatches()[0].actual.as_deref(), Some("Your password"));
}

#[test]
fn test_toggle_password_visibility_round_trip() {
    let session = with_type_switch(login_form("account"), &["password"]);
    let (mut gw, _) = gateway(session);

    let mut page = LoginPage::new(&mut gw);
    assert!(page.is_password_masked().unwrap());
    page.toggle_password_visibility().unwrap();
    assert!(!page.is_password_masked().unwrap());
    page.toggle_password_visibility().unwrap();
    assert!(page.is_password_masked().unwrap());
}

#[test]
fn test_forgot_password_link_navigates() {
    let recovery = format!("{BASE_URL}passwordrecovery");
    let session = login_form("account").with_element(
        "forgot",
        MockElement::link("Forgot password?").on_click(ClickEffect::Navigate(recovery.clone())),
    );
    let (mut gw, _) = gateway(session);

    assert!(LoginPage::new(&mut gw).forgot_password());
    assert_eq!(gw.current_url().unwrap(), recovery);
}

#[test]
fn test_change_password_fills_all_three_fields() {
    let session = MockSession::new()
        .with_element("account", classed("a", "ico-account"))
        .with_element(
            "change-link",
            MockElement::new("a")
                .with_attribute("href", "/customer/changepassword")
                .matching(login::CHANGE_PASSWORD_LINK),
        )
        .with_element("old", MockElement::password("OldPassword"))
        .with_element("new", MockElement::password("NewPassword"))
        .with_element("confirm", MockElement::password("ConfirmNewPassword"))
        .with_element(
            "change",
            classed("button", "button-1 change-password-button")
                .on_click(ClickEffect::Reveal("bar".into())),
        )
        .with_element("bar", classed("span", "close").hidden());
    let (mut gw, _) = gateway(session);

    let mut page = LoginPage::new(&mut gw);
    page.change_password("Secret123!", "Secret456!", "Secret456!").unwrap();
    assert!(page.close_notification());

    let dom = gw.session().dom();
    assert_eq!(dom.value_of("old").as_deref(), Some("Secret123!"));
    assert_eq!(dom.value_of("new").as_deref(), Some("Secret456!"));
    assert_eq!(dom.value_of("confirm").as_deref(), Some("Secret456!"));
}
