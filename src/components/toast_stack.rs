//! Toast notifications, newest last. Clicking one dismisses it early.

use florafind_core::SessionHandle;
use leptos::prelude::*;

use crate::context::use_app;

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app();

    view! {
        <div class="toast-stack">
            <For
                each=move || ctx.session.read(|s| s.toasts().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=toast.kind.class()
                            on:click=move |_| { ctx.session.with(|s| s.dismiss_toast(id)); }
                        >
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
