//! Achievement Popup
//!
//! Shown when a stats refresh reports more badges than before.

use florafind_core::SessionHandle;
use leptos::prelude::*;

use crate::context::use_app;

#[component]
pub fn AchievementPopup() -> impl IntoView {
    let ctx = use_app();
    let achievement = move || ctx.session.read(|s| s.achievement());

    view! {
        {move || achievement().map(|a| view! {
            <div class="achievement-popup show">
                <div class="achievement-content">
                    <div class="achievement-icon">"🏆"</div>
                    <h3>"Achievement Unlocked!"</h3>
                    <p class="achievement-badge-name">
                        {if a.new_badges == 1 {
                            "You earned a new badge!".to_string()
                        } else {
                            format!("You earned {} new badges!", a.new_badges)
                        }}
                    </p>
                    <p class="achievement-badge-desc">
                        {format!("{} badges in total, level {}", a.total_badges, a.level)}
                    </p>
                    <p class="achievement-points">{format!("⭐ {} points", a.points)}</p>
                    <button class="quick-btn" on:click=move |_| ctx.session.with(|s| s.close_achievement())>
                        "Awesome!"
                    </button>
                </div>
            </div>
        })}
    }
}
