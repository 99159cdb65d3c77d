//! WebAssembly bindings for the societatis-hal library.
//!
//! Exposes the document-level operations to JavaScript/TypeScript via
//! `wasm-bindgen`. Compile with `wasm-pack build` to produce an npm-ready
//! package that works in browsers, Node.js, and any other WASM host.
//!
//! ```js
//! import init, { validate, normalize, render, expand_relation } from './societatis_hal_wasm.js';
//! await init();
//!
//! validate(json);                      // throws if invalid
//! const canonical = normalize(json);   // pretty-printed HAL+JSON
//! console.log(render(json));
//! expand_relation(json, 'ea:basket');  // 'http://example.com/docs/rels/basket'
//! ```
//!
//! Documents are decoded with untyped data; embedded resources are decoded
//! as untyped resources too. Every function throws a string on failure.

use societatis_hal::{HasLinks, JsonResource};
use wasm_bindgen::prelude::*;

/// Called at the start of every export. Installs the panic hook when the
/// `console_error_panic_hook` feature is on.
fn setup() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn decode(json: &str) -> Result<JsonResource, JsValue> {
    societatis_hal::from_str(json).map_err(|e| JsValue::from_str(&format!("decode error: {e}")))
}

/// Validate a HAL document given as a JSON string.
///
/// Returns `undefined` on success. Throws a descriptive string on failure
/// (a decode error, such as an embedded relation with no matching link, or
/// a document-level validation error).
#[wasm_bindgen]
pub fn validate(json: &str) -> Result<(), JsValue> {
    setup();
    let resource = decode(json)?;
    societatis_hal::validate_resource(&resource).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a HAL document and return it re-encoded.
///
/// Pretty-printed unless `compact` is `true`.
#[wasm_bindgen]
pub fn normalize(json: &str, compact: Option<bool>) -> Result<String, JsValue> {
    setup();
    let resource = decode(json)?;
    let encoded = if compact.unwrap_or(false) {
        societatis_hal::to_string(&resource)
    } else {
        societatis_hal::to_string_pretty(&resource)
    };
    encoded.map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a HAL document as a plain-text outline.
#[wasm_bindgen]
pub fn render(json: &str) -> Result<String, JsValue> {
    setup();
    let resource = decode(json)?;
    Ok(societatis_hal::render_resource(&resource))
}

/// Expand a CURIE relation (e.g. `ea:basket`) using the curies declared in
/// the document's `_links`.
///
/// Throws if `relation` is not a CURIE or its prefix is not declared.
#[wasm_bindgen]
pub fn expand_relation(json: &str, relation: &str) -> Result<String, JsValue> {
    setup();
    let resource = decode(json)?;
    resource.links().expand_relation(relation).ok_or_else(|| {
        JsValue::from_str(&format!(
            "{relation:?} is not a CURIE relation declared by this document"
        ))
    })
}
