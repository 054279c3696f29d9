//! Shared fixtures for the storefront scenario tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use serde_json::Value;
use std::time::Duration;
use vitrine::mock::{MockDom, MockElement, MockSession};
use vitrine::{Gateway, GatewayConfig, RecordingObserver, ScriptArg};
use vitrine_storefront::TestData;

pub const BASE_URL: &str = "https://demo.nopcommerce.com/";

/// Fixture shipped next to the tests
pub fn test_data() -> TestData {
    TestData::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/testdata.json"))
        .expect("fixture should parse")
}

/// Short timeouts keep negative probes fast
pub fn config() -> GatewayConfig {
    GatewayConfig::new()
        .with_default_timeout(Duration::from_millis(150))
        .with_poll_interval(Duration::from_millis(5))
        .with_base_url(BASE_URL)
}

pub fn gateway(session: MockSession) -> (Gateway<MockSession>, RecordingObserver) {
    let recorder = RecordingObserver::new();
    let gateway = Gateway::new(session, config()).with_observer(recorder.clone());
    (gateway, recorder)
}

/// Element with a class list, for buttons and banners located by class
pub fn classed(tag: &str, classes: &str) -> MockElement {
    MockElement::new(tag).with_class(classes)
}

/// Session that applies `arguments[0].setAttribute('type', arguments[1])`
/// to whichever of `keys` the handle belongs to
pub fn with_type_switch(session: MockSession, keys: &'static [&'static str]) -> MockSession {
    session.on_script("setAttribute('type'", move |dom: &mut MockDom, args: &[ScriptArg]| {
        let (Some(ScriptArg::Element(handle)), Some(ScriptArg::Value(Value::String(input_type)))) =
            (args.first(), args.get(1))
        else {
            return Value::Null;
        };
        for key in keys {
            if dom.node_id(key) == Some(handle.id.as_str()) {
                dom.set_attribute(key, "type", input_type);
            }
        }
        Value::Null
    })
}
