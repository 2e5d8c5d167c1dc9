//! Notes Editor
//!
//! Free-text notes per garden plant, saved to local storage. Saving blank
//! text clears the note.

use chrono::Utc;
use florafind_core::toast::ToastKind;
use florafind_core::SessionHandle;
use leptos::prelude::*;

use crate::context::use_app;
use crate::store::{use_ui_store, NoteDraft, UiStateStoreFields};

#[component]
pub fn NotesEditor() -> impl IntoView {
    let ctx = use_app();
    let ui = use_ui_store();

    let save = move || {
        let Some(NoteDraft { user_plant_id, plant_name, text }) = ui.note_editor().get_untracked() else {
            return;
        };
        let result = ctx
            .session
            .with(|s| s.save_note(user_plant_id, &plant_name, &text, Utc::now()));
        match result {
            Ok(()) => ui.note_editor().set(None),
            Err(e) => {
                tracing::error!(plant = user_plant_id, error = %e, "could not save notes");
                ctx.toast(ToastKind::Error, "❌ Could not save notes");
            }
        }
    };

    view! {
        <Show when=move || ui.note_editor().with(Option::is_some)>
            <div class="modal-overlay">
                <div class="modal">
                    <div class="modal-header">
                        <h3>
                            {move || ui.note_editor().with(|n| {
                                n.as_ref().map(|n| format!("📝 Notes for {}", n.plant_name))
                            })}
                        </h3>
                        <button class="close-btn" on:click=move |_| ui.note_editor().set(None)>"×"</button>
                    </div>
                    <textarea
                        class="notes-textarea"
                        placeholder="Watering quirks, pests spotted, where it likes the sun..."
                        prop:value=move || ui.note_editor().with(|n| n.as_ref().map(|n| n.text.clone()).unwrap_or_default())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            ui.note_editor().update(|n| {
                                if let Some(n) = n {
                                    n.text = text;
                                }
                            });
                        }
                    ></textarea>
                    <button class="quick-btn" on:click=move |_| save()>"Save Notes"</button>
                </div>
            </div>
        </Show>
    }
}
