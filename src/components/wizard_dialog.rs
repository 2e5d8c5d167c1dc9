//! Wizard Dialog
//!
//! Modal for the reminder and care-task wizards. Each step is drawn from a
//! [`StepView`]; cancelling closes the dialog without side effects.

use chrono::Utc;
use florafind_core::flows;
use florafind_core::toast::ToastKind;
use florafind_core::SessionHandle;
use leptos::prelude::*;

use crate::context::{use_app, AppContext};
use crate::store::{use_ui_store, ActiveWizard, StepView, UiStateStoreFields, UiStore, WizardInput};

/// Act on a finished wizard
fn complete(wizard: ActiveWizard, ctx: AppContext) {
    match wizard {
        ActiveWizard::Reminder(w) => {
            let Some(draft) = w.draft().cloned() else { return };
            let result = ctx
                .session
                .with(|s| s.set_reminder(&draft, w.user_plant_id, &w.plant_name, Utc::now()));
            if let Err(e) = result {
                tracing::error!(error = %e, "could not save reminder");
                ctx.toast(ToastKind::Error, "❌ Could not save reminder");
            }
        }
        ActiveWizard::CareTask(w) => {
            let Some(draft) = w.draft().cloned() else { return };
            ctx.spawn(move |s, c| async move {
                flows::add_care_task(&s, &c, w.user_plant_id, &draft).await;
            });
        }
    }
}

fn step(ui: UiStore, ctx: AppContext, input: WizardInput, set_error: WriteSignal<Option<String>>) {
    let Some(mut wizard) = ui.wizard().get_untracked() else { return };
    if let Err(e) = wizard.apply(input) {
        set_error.set(Some(format!("❌ {}", e)));
        return;
    }
    set_error.set(None);
    if wizard.is_finished() {
        ui.wizard().set(None);
        complete(wizard, ctx);
    } else {
        ui.wizard().set(Some(wizard));
    }
}

#[component]
pub fn WizardDialog() -> impl IntoView {
    let ctx = use_app();
    let ui = use_ui_store();

    let (error, set_error) = signal::<Option<String>>(None);
    let (name, set_name) = signal(String::new());
    let (days, set_days) = signal(String::new());

    let close = move || {
        ui.wizard().set(None);
        set_error.set(None);
    };
    let go = move |input: WizardInput| step(ui, ctx, input, set_error);

    let body = move || {
        let view = ui.wizard().with(|w| w.as_ref().and_then(ActiveWizard::view))?;
        Some(match view {
            StepView::Choose { options } => view! {
                <div class="wizard-options">
                    {options.into_iter().enumerate().map(|(i, label)| view! {
                        <button
                            class="quick-btn"
                            on:click=move |_| {
                                set_name.set(String::new());
                                set_days.set(String::new());
                                go(WizardInput::Choose(i + 1));
                            }
                        >
                            {format!("{}. {}", i + 1, label)}
                        </button>
                    }).collect_view()}
                </div>
            }.into_any(),
            StepView::Detail { kind, custom, default_days } => view! {
                <div class="wizard-detail">
                    <p>{kind}</p>
                    <Show when=move || custom>
                        <input
                            type="text"
                            placeholder="Task name"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </Show>
                    <input
                        type="number"
                        min="1"
                        placeholder=format!("Days (default {})", default_days)
                        prop:value=move || days.get()
                        on:input=move |ev| set_days.set(event_target_value(&ev))
                    />
                    <button
                        class="quick-btn"
                        on:click=move |_| go(WizardInput::Detail {
                            name: custom.then(|| name.get_untracked()),
                            days: days.get_untracked(),
                        })
                    >
                        "Next"
                    </button>
                </div>
            }.into_any(),
            StepView::Confirm { summary } => view! {
                <div class="wizard-confirm">
                    <p>{summary}</p>
                    <button class="quick-btn" on:click=move |_| go(WizardInput::Back)>"Back"</button>
                    <button class="quick-btn" on:click=move |_| go(WizardInput::Confirm)>"Confirm"</button>
                </div>
            }.into_any(),
        })
    };

    view! {
        <Show when=move || ui.wizard().with(Option::is_some)>
            <div class="modal-overlay">
                <div class="modal">
                    <div class="modal-header">
                        <h3>{move || ui.wizard().with(|w| w.as_ref().map(ActiveWizard::title))}</h3>
                        <button class="close-btn" on:click=move |_| close()>"×"</button>
                    </div>
                    {body}
                    {move || error.get().map(|e| view! { <p class="wizard-error">{e}</p> })}
                </div>
            </div>
        </Show>
    }
}
