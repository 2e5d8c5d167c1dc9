//! Click delegation for rendered markup
//!
//! Chat answers, garden cards and the task list are HTML strings. Their
//! buttons carry `data-action` attributes; one listener per container maps
//! clicks back to [`Action`]s.

use chrono::Utc;
use florafind_core::flows;
use florafind_core::render::Action;
use florafind_core::toast::ToastKind;
use florafind_core::wizard::{CareTaskWizard, ReminderWizard};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use crate::browser::notify;
use crate::context::AppContext;
use crate::store::{ActiveWizard, NoteDraft, UiStateStoreFields, UiStore};

pub fn handle_markup_click(ev: &MouseEvent, ctx: AppContext, ui: UiStore) {
    let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    if let Ok(Some(tab)) = target.closest("[data-nlp-tab]") {
        switch_nlp_tab(&tab);
        return;
    }
    let Ok(Some(button)) = target.closest("[data-action]") else {
        return;
    };
    match Action::from_attributes(|name| button.get_attribute(name)) {
        Some(action) => dispatch(action, ctx, ui),
        None => tracing::warn!(
            action = button.get_attribute("data-action").unwrap_or_default(),
            "unrecognised markup action"
        ),
    }
}

fn dispatch(action: Action, ctx: AppContext, ui: UiStore) {
    tracing::debug!(action = action.tag(), "markup action");
    match action {
        Action::AddToGarden { plant_id, name } => ctx.spawn(move |s, c| async move {
            flows::add_to_garden(&s, &c, plant_id, &name, Utc::now().date_naive()).await;
        }),
        Action::CareCalendar { plant_id } => ctx.spawn(move |s, c| async move {
            flows::show_care_calendar(&s, &c, plant_id).await;
        }),
        // reminders are only offered once notifications may be shown
        Action::SetReminder { user_plant_id, name } => spawn_local(async move {
            match notify::ensure_permission().await {
                Ok(()) => ui
                    .wizard()
                    .set(Some(ActiveWizard::Reminder(ReminderWizard::new(user_plant_id, name)))),
                Err(message) => ctx.toast(ToastKind::Error, message),
            }
        }),
        Action::AddCareTask { user_plant_id, name } => ui
            .wizard()
            .set(Some(ActiveWizard::CareTask(CareTaskWizard::new(user_plant_id, name)))),
        Action::EditNotes { user_plant_id, name } => {
            let text = ctx.session.peek(|s| s.note(user_plant_id));
            ui.note_editor().set(Some(NoteDraft {
                user_plant_id,
                plant_name: name,
                text,
            }));
        }
        Action::CompleteTask { user_plant_id, task } => ctx.spawn(move |s, c| async move {
            flows::complete_task(&s, &c, user_plant_id, &task).await;
        }),
        Action::ShowSection(section) => ctx.spawn(move |s, c| async move {
            flows::show_section(&s, &c, section.as_str()).await;
        }),
    }
}

/// Mark the clicked NLP tab and its pane active within one analysis panel
fn switch_nlp_tab(tab: &Element) {
    let (Some(id), Ok(Some(panel))) = (
        tab.get_attribute("data-nlp-tab"),
        tab.closest(".nlp-analysis-container"),
    ) else {
        return;
    };
    for attr in ["data-nlp-tab", "data-nlp-pane"] {
        let Ok(nodes) = panel.query_selector_all(&format!("[{}]", attr)) else {
            continue;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let active = el.get_attribute(attr).as_deref() == Some(id.as_str());
            let _ = el.class_list().toggle_with_force("active", active);
        }
    }
}
