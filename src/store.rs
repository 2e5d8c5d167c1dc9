//! UI State Store
//!
//! Dialog state that lives only in the page, kept in a `reactive_stores`
//! store. Everything the backend or the timers touch lives in the session.

use florafind_core::wizard::{
    CareTaskWizard, CareWizard, Draft, ReminderWizard, WizardKind, WizardStep,
};
use florafind_core::Result;
use leptos::prelude::*;
use reactive_stores::Store;

#[derive(Clone, Debug, Default, Store)]
pub struct UiState {
    /// Reminder or care-task wizard in progress
    pub wizard: Option<ActiveWizard>,
    /// Plant whose notes are being edited
    pub note_editor: Option<NoteDraft>,
}

pub type UiStore = Store<UiState>;

pub fn use_ui_store() -> UiStore {
    expect_context::<UiStore>()
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteDraft {
    pub user_plant_id: u32,
    pub plant_name: String,
    pub text: String,
}

// ========================
// Wizards
// ========================

#[derive(Clone, Debug)]
pub enum ActiveWizard {
    Reminder(ReminderWizard),
    CareTask(CareTaskWizard),
}

/// User input for the current wizard step
pub enum WizardInput {
    /// 1-based option number
    Choose(usize),
    Detail { name: Option<String>, days: String },
    Confirm,
    Back,
}

/// Kind-independent description of the step to draw
#[derive(Clone, Debug, PartialEq)]
pub enum StepView {
    Choose { options: Vec<&'static str> },
    Detail { kind: &'static str, custom: bool, default_days: u32 },
    Confirm { summary: String },
}

fn step_view<K: WizardKind>(wizard: &CareWizard<K>, summary: impl Fn(&Draft<K>) -> String) -> Option<StepView> {
    match wizard.step() {
        WizardStep::SelectingType => Some(StepView::Choose {
            options: K::ALL.iter().map(|k| k.label()).collect(),
        }),
        WizardStep::EnteringDetail { kind } => Some(StepView::Detail {
            kind: kind.label(),
            custom: kind.is_custom(),
            default_days: kind.default_days(),
        }),
        WizardStep::Confirming { draft } => Some(StepView::Confirm {
            summary: summary(draft),
        }),
        WizardStep::Done { .. } | WizardStep::Cancelled => None,
    }
}

fn drive<K: WizardKind>(wizard: &mut CareWizard<K>, input: WizardInput) -> Result<()> {
    match input {
        WizardInput::Choose(n) => wizard.select_option(&n.to_string()),
        WizardInput::Detail { name, days } => wizard.enter_detail(name.as_deref(), &days),
        WizardInput::Confirm => wizard.confirm().map(|_| ()),
        WizardInput::Back => wizard.back(),
    }
}

impl ActiveWizard {
    pub fn title(&self) -> String {
        match self {
            ActiveWizard::Reminder(w) => format!("🔔 Set a reminder for {}", w.plant_name),
            ActiveWizard::CareTask(w) => format!("➕ Add a care task for {}", w.plant_name),
        }
    }

    pub fn view(&self) -> Option<StepView> {
        match self {
            ActiveWizard::Reminder(w) => step_view(w, |d| {
                format!("Remind you about {} for {} in {} days?", d.task(), w.plant_name, d.days)
            }),
            ActiveWizard::CareTask(w) => step_view(w, |d| {
                format!("Add '{}' for {} every {} days?", d.task_type(), w.plant_name, d.days)
            }),
        }
    }

    pub fn apply(&mut self, input: WizardInput) -> Result<()> {
        match self {
            ActiveWizard::Reminder(w) => drive(w, input),
            ActiveWizard::CareTask(w) => drive(w, input),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            ActiveWizard::Reminder(w) => w.is_finished(),
            ActiveWizard::CareTask(w) => w.is_finished(),
        }
    }
}
