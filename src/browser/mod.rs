//! Browser Adapters
//!
//! The DOM-side collaborators of the core: `localStorage`, timeouts,
//! Web Notifications and file downloads.

pub mod download;
pub mod notify;
pub mod storage;
pub mod timers;

use wasm_bindgen::JsValue;

/// Best-effort text for a thrown JS value
pub(crate) fn js_reason(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| js_sys::JSON::stringify(value).ok().and_then(|s| s.as_string()))
        .unwrap_or_else(|| "unknown error".to_string())
}
