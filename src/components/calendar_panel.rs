//! Calendar Panel
//!
//! Month grid with navigation, upcoming tasks, pending reminders, CSV export
//! and the reminder opt-in.

use chrono::Utc;
use florafind_core::render::{render_month_grid, render_upcoming_tasks};
use florafind_core::section::Section;
use florafind_core::storage::ReminderId;
use florafind_core::toast::ToastKind;
use florafind_core::SessionHandle;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::markup_actions::handle_markup_click;
use crate::browser::{download, js_reason, notify};
use crate::context::use_app;
use crate::store::use_ui_store;

#[component]
pub fn CalendarPanel() -> impl IntoView {
    let ctx = use_app();
    let ui = use_ui_store();

    let grid = move || ctx.session.read(|s| render_month_grid(s.month(), s.upcoming()));
    let tasks = move || {
        ctx.session
            .read(|s| render_upcoming_tasks(s.upcoming(), Utc::now().date_naive()))
    };

    let export = move |_| {
        ctx.session.with(|s| {
            s.export_calendar(Utc::now(), |csv| download::save_csv(csv).map_err(|e| js_reason(&e)))
        });
    };

    let enable_reminders = move |_| {
        spawn_local(async move {
            match notify::ensure_permission().await {
                Ok(()) => ctx.session.with(|s| s.enable_reminders(Utc::now())),
                Err(message) => ctx.toast(ToastKind::Error, message),
            }
        });
    };

    let cancel_reminder = move |id: ReminderId| {
        if let Err(e) = ctx.session.with(|s| s.cancel_reminder(id, Utc::now())) {
            tracing::error!(reminder = id.0, error = %e, "could not cancel reminder");
            ctx.toast(ToastKind::Error, "❌ Could not cancel reminder");
        }
    };

    view! {
        <section id="calendar" class=move || ctx.section_class(Section::Calendar)>
            <div class="calendar-header-row">
                <button class="month-nav" on:click=move |_| { ctx.session.with(|s| s.change_month(-1)); }>"‹"</button>
                <h3>{move || ctx.session.read(|s| s.month().name())}</h3>
                <button class="month-nav" on:click=move |_| { ctx.session.with(|s| s.change_month(1)); }>"›"</button>
            </div>

            <div class="calendar-grid" inner_html=grid></div>

            <div class="calendar-actions">
                <button class="quick-btn" on:click=export>"📥 Export Calendar"</button>
                <button class="quick-btn" on:click=enable_reminders>"🔔 Enable Reminders"</button>
            </div>

            <h3>"Your Reminders"</h3>
            <ul class="reminder-list">
                <For
                    each=move || ctx.session.read(|s| s.pending_reminders())
                    key=|r| r.id
                    children=move |r| {
                        let id = r.id;
                        let when = r.scheduled_for.format("%-m/%-d/%Y %H:%M UTC").to_string();
                        view! {
                            <li class="reminder-item">
                                <span>{format!("🔔 {} · {} · {}", r.task, r.plant_name, when)}</span>
                                <button class="close-btn" title="Cancel reminder" on:click=move |_| cancel_reminder(id)>"×"</button>
                            </li>
                        }
                    }
                />
            </ul>

            <h3>"Upcoming Tasks"</h3>
            <div
                class="upcoming-tasks"
                inner_html=tasks
                on:click=move |ev| handle_markup_click(&ev, ctx, ui)
            ></div>
        </section>
    }
}
