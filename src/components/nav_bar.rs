//! Navigation Bar
//!
//! Section tabs, the user's stats and the language toggle.

use chrono::Utc;
use florafind_core::flows;
use florafind_core::section::Section;
use florafind_core::SessionHandle;
use leptos::prelude::*;

use crate::context::use_app;

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app();
    let stats = move || ctx.session.read(|s| s.stats());

    view! {
        <nav class="nav-bar">
            <div class="nav-tabs">
                {Section::ALL.iter().map(|&section| {
                    let is_active = move || ctx.session.read(|s| s.active_section() == section);
                    view! {
                        <button
                            class=move || if is_active() { "nav-btn active" } else { "nav-btn" }
                            on:click=move |_| ctx.spawn(move |s, c| async move {
                                flows::show_section(&s, &c, section.as_str()).await;
                            })
                        >
                            {section.label()}
                        </button>
                    }
                }).collect_view()}
            </div>

            <div class="user-stats">
                <span class="stat">"⭐ " {move || stats().points} " pts"</span>
                <span class="stat">"🏅 Level " {move || stats().level}</span>
                <span class="stat">"🎖️ " {move || stats().badges} " badges"</span>
                <button
                    class="lang-btn"
                    title="Switch language"
                    on:click=move |_| {
                        let language = ctx.session.with(|s| s.toggle_language(Utc::now()));
                        tracing::info!(language = language.code(), "language switched");
                    }
                >
                    {move || format!("🌐 {}", ctx.session.read(|s| s.language().code().to_uppercase()))}
                </button>
            </div>
        </nav>
    }
}
