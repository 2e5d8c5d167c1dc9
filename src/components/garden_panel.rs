//! Garden Panel
//!
//! Garden statistics and one card per plant.

use florafind_core::render::render_garden;
use florafind_core::section::Section;
use leptos::prelude::*;

use super::markup_actions::handle_markup_click;
use crate::context::use_app;
use crate::store::use_ui_store;

#[component]
pub fn GardenPanel() -> impl IntoView {
    let ctx = use_app();
    let ui = use_ui_store();
    let summary = move || ctx.session.read(|s| s.garden_summary());

    let cards = move || {
        ctx.session.read(|s| match s.garden() {
            Some(garden) => render_garden(&garden.garden),
            None => r#"<div class="loading">🌱 Loading your garden...</div>"#.to_string(),
        })
    };

    view! {
        <section id="garden" class=move || ctx.section_class(Section::Garden)>
            <div class="garden-stats">
                <div class="stat-card">
                    <div class="stat-value">{move || summary().total_plants}</div>
                    <div class="stat-label">"Plants"</div>
                </div>
                <div class="stat-card">
                    <div class="stat-value">{move || format!("{}%", summary().average_health)}</div>
                    <div class="stat-label">"Avg. Health"</div>
                </div>
                <div class="stat-card">
                    <div class="stat-value">{move || format!("{:.1}", summary().total_eco_impact)}</div>
                    <div class="stat-label">"Eco Impact"</div>
                </div>
            </div>

            <div
                class="garden-grid"
                inner_html=cards
                on:click=move |ev| handle_markup_click(&ev, ctx, ui)
            ></div>
        </section>
    }
}
