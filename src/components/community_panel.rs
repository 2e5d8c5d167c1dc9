//! Community Panel
//!
//! Challenges, the leaderboard and the care-tip form.

use florafind_core::client::TipArgs;
use florafind_core::flows;
use florafind_core::render::{render_challenges, render_leaderboard};
use florafind_core::section::Section;
use florafind_core::toast::ToastKind;
use leptos::prelude::*;

use crate::context::use_app;

#[component]
pub fn CommunityPanel() -> impl IntoView {
    let ctx = use_app();

    view! {
        <section id="community" class=move || ctx.section_class(Section::Community)>
            <div class="community-grid">
                <div class="community-card">
                    <h3>"🏆 Active Challenges"</h3>
                    <div inner_html=move || ctx.session.read(|s| render_challenges(s.challenges()))></div>
                </div>
                <div class="community-card">
                    <h3>"🥇 Leaderboard"</h3>
                    <div inner_html=move || ctx.session.read(|s| render_leaderboard(s.leaderboard()))></div>
                </div>
            </div>
            <TipForm />
        </section>
    }
}

/// Share a care tip with the community
#[component]
fn TipForm() -> impl IntoView {
    let ctx = use_app();

    let (plant, set_plant) = signal(String::new());
    let (tip, set_tip) = signal(String::new());
    let (location, set_location) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let args = TipArgs {
            plant_name: plant.get_untracked().trim().to_string(),
            care_tip: tip.get_untracked().trim().to_string(),
            location: location.get_untracked().trim().to_string(),
        };
        if args.plant_name.is_empty() || args.care_tip.is_empty() {
            ctx.toast(ToastKind::Error, "Please enter a plant name and a tip");
            return;
        }
        ctx.spawn(move |s, c| async move {
            if flows::submit_tip(&s, &c, &args).await {
                set_plant.set(String::new());
                set_tip.set(String::new());
                set_location.set(String::new());
            }
        });
    };

    view! {
        <form class="tip-form" on:submit=submit>
            <h3>"💡 Share a Care Tip"</h3>
            <input
                type="text"
                placeholder="Plant name"
                prop:value=move || plant.get()
                on:input=move |ev| set_plant.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Your tip..."
                prop:value=move || tip.get()
                on:input=move |ev| set_tip.set(event_target_value(&ev))
            ></textarea>
            <input
                type="text"
                placeholder="Location (optional)"
                prop:value=move || location.get()
                on:input=move |ev| set_location.set(event_target_value(&ev))
            />
            <button type="submit" class="quick-btn">"Submit Tip"</button>
        </form>
    }
}
