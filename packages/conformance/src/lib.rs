//! Shared fixtures for the societatis-hal conformance test suite.
//!
//! Provides HAL documents in canonical form (links first, then data, then
//! embedded resources; link fields in wire order), the typed payloads they
//! carry, and a [`Decoder`] configured for them.
//!
//! Every fixture declares a link for each embedded relation: decoding
//! rejects embedded relations without a matching link.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use societatis_hal::{Decoder, ResourceTypes};

/// A named HAL document.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub name: &'static str,
    pub json: &'static str,
}

/// An orders collection modelled on the example in the HAL draft.
pub const ORDERS: &str = r#"{
  "_links": {
    "self": { "href": "/orders" },
    "next": { "href": "/orders?page=2" },
    "find": { "href": "/orders{?id}", "templated": true },
    "curies": [{ "href": "http://example.com/docs/rels/{rel}", "templated": true, "name": "ea" }],
    "ea:admin": [
      { "href": "/admins/2", "title": "Fred" },
      { "href": "/admins/5", "title": "Kate" }
    ],
    "ea:order": [{ "href": "/orders/123" }, { "href": "/orders/124" }]
  },
  "currentlyProcessing": 14,
  "shippedToday": 20,
  "_embedded": {
    "ea:order": [
      {
        "_links": {
          "self": { "href": "/orders/123" },
          "ea:basket": { "href": "/baskets/98712" },
          "ea:customer": { "href": "/customers/7809" }
        },
        "total": 30.0,
        "currency": "USD",
        "status": "shipped"
      },
      {
        "_links": {
          "self": { "href": "/orders/124" },
          "ea:basket": { "href": "/baskets/97213" },
          "ea:customer": { "href": "/customers/12369" }
        },
        "total": 20.0,
        "currency": "USD",
        "status": "processing"
      }
    ]
  }
}"#;

/// The smallest useful document: a `self` link only.
pub const MINIMAL: &str = r#"{"_links":{"self":{"href":"/"}}}"#;

/// Several curies, CURIE relations in arrays and single objects, link
/// metadata, and two levels of embedding.
pub const CURIE_HEAVY: &str = r#"{
  "_links": {
    "self": { "href": "/catalog" },
    "curies": [
      { "href": "http://example.com/docs/rels/{rel}", "templated": true, "name": "ea" },
      { "href": "https://acme.test/rels/{rel}", "templated": true, "name": "acme", "title": "Acme relations" }
    ],
    "acme:widgets": [{ "href": "/widgets", "type": "application/hal+json" }],
    "acme:search": { "href": "/widgets{?q}", "templated": true, "hrefLang": "en" },
    "ea:legacy": [{ "href": "/old", "deprecation": "https://acme.test/deprecations/old" }]
  },
  "name": "Acme catalog",
  "_embedded": {
    "acme:widgets": [
      {
        "_links": {
          "self": { "href": "/widgets/1" },
          "acme:parts": [{ "href": "/widgets/1/parts" }]
        },
        "sku": "W-1",
        "_embedded": {
          "acme:parts": [{ "_links": { "self": { "href": "/parts/9" } }, "sku": "P-9" }]
        }
      }
    ]
  }
}"#;

/// Data of the orders collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub currently_processing: u32,
    pub shipped_today: u32,
}

/// Data of one embedded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub total: f64,
    pub currency: String,
    pub status: String,
}

/// All fixtures, in a stable order.
pub fn fixtures() -> Vec<Fixture> {
    vec![
        Fixture { name: "orders", json: ORDERS },
        Fixture { name: "minimal", json: MINIMAL },
        Fixture { name: "curie-heavy", json: CURIE_HEAVY },
    ]
}

/// A decoder that reads embedded `ea:order` resources as `Resource<Order>`.
pub fn orders_decoder() -> Decoder {
    Decoder::new().with_resource_types(ResourceTypes::new().register::<Order>("ea:order"))
}

/// `json` re-serialised compactly with its key order intact.
///
/// # Panics
///
/// Panics if `json` is not valid JSON.
pub fn canonical(json: &str) -> String {
    let value: Value = serde_json::from_str(json).expect("fixture must be valid JSON");
    value.to_string()
}
