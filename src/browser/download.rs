//! Blob downloads

use florafind_core::export::{CsvExport, CSV_MIME};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Offer the CSV to the user through a temporary object URL
pub fn save_csv(export: &CsvExport) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&export.content));
    let options = BlobPropertyBag::new();
    options.set_type(CSV_MIME);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(&export.filename);
    anchor.click();
    Url::revoke_object_url(&url)
}
