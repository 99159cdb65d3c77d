//! wasm-bindgen-test integration tests for the societatis-hal WASM bindings.
//!
//! Run with:
//!   wasm-pack test packages/wasm --node
//!
//! These tests compile to WASM and execute in a Node.js process, verifying
//! the exported API surface works end-to-end in a JavaScript host.

use wasm_bindgen_test::*;

// Configure all tests in this file to run in Node.js (no browser required).
wasm_bindgen_test_configure!(run_in_node_experimental);

use societatis_hal_wasm::{expand_relation, normalize, render, validate};

const ORDERS: &str = r#"{
    "_links": {
        "self": { "href": "/orders" },
        "curies": [{ "name": "ea", "href": "http://example.com/docs/rels/{rel}", "templated": true }],
        "next": { "href": "/orders?page=2" },
        "ea:order": [{ "href": "/orders/123" }]
    },
    "currentlyProcessing": 14,
    "_embedded": {
        "ea:order": [{
            "_links": { "self": { "href": "/orders/123" } },
            "total": 30.0,
            "currency": "USD"
        }]
    }
}"#;

// ---------------------------------------------------------------------------
// validate()
// ---------------------------------------------------------------------------

#[wasm_bindgen_test]
fn validate_valid_document_succeeds() {
    validate(ORDERS).expect("valid document should pass validate()");
}

#[wasm_bindgen_test]
fn validate_invalid_json_returns_err() {
    let result = validate("not json at all");
    assert!(result.is_err(), "invalid JSON should fail validate()");
}

#[wasm_bindgen_test]
fn validate_undeclared_embedded_relation_returns_err() {
    let json = r#"{ "_embedded": { "ea:order": [{ "total": 1 }] } }"#;
    assert!(validate(json).is_err(), "embedded relation without a link should fail");
}

#[wasm_bindgen_test]
fn validate_unknown_curie_prefix_returns_err() {
    let json = r#"{
        "_links": {
            "curies": [{ "name": "ea", "href": "/docs/{rel}", "templated": true }],
            "xx:thing": { "href": "/x" }
        }
    }"#;
    assert!(validate(json).is_err(), "undeclared curie prefix should fail");
}

// ---------------------------------------------------------------------------
// normalize()
// ---------------------------------------------------------------------------

#[wasm_bindgen_test]
fn normalize_compact_puts_links_first() {
    let out = normalize(r#"{ "a": 1, "_links": { "self": { "href": "/" } } }"#, Some(true)).unwrap();
    assert_eq!(out, r#"{"_links":{"self":{"href":"/"}},"a":1}"#);
}

#[wasm_bindgen_test]
fn normalize_is_stable() {
    let once = normalize(ORDERS, None).unwrap();
    let twice = normalize(&once, None).unwrap();
    assert_eq!(once, twice);
}

// ---------------------------------------------------------------------------
// render()
// ---------------------------------------------------------------------------

#[wasm_bindgen_test]
fn render_contains_links_and_embedded() {
    let text = render(ORDERS).unwrap();
    assert!(text.starts_with("Resource /orders"), "got: {text}");
    assert!(text.contains("Embedded ea:order (1):"), "got: {text}");
}

#[wasm_bindgen_test]
fn render_non_object_returns_err() {
    assert!(render("[]").is_err(), "an array is not a HAL document");
}

// ---------------------------------------------------------------------------
// expand_relation()
// ---------------------------------------------------------------------------

#[wasm_bindgen_test]
fn expand_declared_curie() {
    assert_eq!(
        expand_relation(ORDERS, "ea:basket").unwrap(),
        "http://example.com/docs/rels/basket"
    );
}

#[wasm_bindgen_test]
fn expand_undeclared_prefix_returns_err() {
    assert!(expand_relation(ORDERS, "zz:basket").is_err());
    assert!(expand_relation(ORDERS, "next").is_err());
}
