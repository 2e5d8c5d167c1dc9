//! Web Notifications

use florafind_core::permission::{after_request, gate, Gate, Permission};
use florafind_core::session::BrowserNotification;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, NotificationOptions, NotificationPermission};

use super::js_reason;

fn supported() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::has(&w, &JsValue::from_str("Notification")).ok())
        .unwrap_or(false)
}

pub fn permission() -> Permission {
    if !supported() {
        return Permission::Unsupported;
    }
    let value = match Notification::permission() {
        NotificationPermission::Granted => "granted",
        NotificationPermission::Denied => "denied",
        _ => "default",
    };
    Permission::from_host(Some(value))
}

async fn request_permission() -> Permission {
    let promise = match Notification::request_permission() {
        Ok(promise) => promise,
        Err(e) => {
            tracing::warn!(error = %js_reason(&e), "permission request failed");
            return Permission::Default;
        }
    };
    match JsFuture::from(promise).await {
        Ok(answer) => Permission::from_host(Some(answer.as_string().as_deref().unwrap_or("default"))),
        Err(e) => {
            tracing::warn!(error = %js_reason(&e), "permission prompt rejected");
            Permission::Default
        }
    }
}

/// Walk the permission gate, prompting once when undecided.
/// `Err` carries the text to show the user.
pub async fn ensure_permission() -> Result<(), &'static str> {
    let verdict = match gate(permission()) {
        Gate::Request => after_request(request_permission().await),
        other => other,
    };
    match verdict {
        Gate::Proceed => Ok(()),
        Gate::Refuse(message) => Err(message),
        Gate::Request => Err(florafind_core::permission::DENIED),
    }
}

pub fn show(notification: &BrowserNotification) {
    if permission() != Permission::Granted {
        tracing::debug!(title = %notification.title, "notification suppressed without permission");
        return;
    }
    let options = NotificationOptions::new();
    options.set_body(&notification.body);
    if let Some(tag) = &notification.tag {
        options.set_tag(tag);
    }
    if let Err(e) = Notification::new_with_options(&notification.title, &options) {
        tracing::warn!(error = %js_reason(&e), "could not show notification");
    }
}
