//! Care Wizards
//!
//! Multi-step forms for reminders and custom care tasks:
//! `SelectingType -> EnteringDetail -> Confirming -> Done`, with `Cancelled`
//! reachable from every step. A cancelled wizard never yields a draft.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::storage::{ReminderId, ReminderRecord, ReminderStatus};

/// A selectable type in a wizard's first step
pub trait WizardKind: Copy + PartialEq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Option text shown in the type list
    fn label(&self) -> &'static str;
    fn default_days(&self) -> u32;
    fn is_custom(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Water,
    Fertilize,
    Prune,
    Custom,
}

impl ReminderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReminderKind::Water => "Water",
            ReminderKind::Fertilize => "Fertilize",
            ReminderKind::Prune => "Prune",
            ReminderKind::Custom => "Custom",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ReminderKind::Water => "watering",
            ReminderKind::Fertilize => "fertilizing",
            ReminderKind::Prune => "pruning",
            ReminderKind::Custom => "caring for",
        }
    }
}

impl WizardKind for ReminderKind {
    const ALL: &'static [Self] = &[
        ReminderKind::Water,
        ReminderKind::Fertilize,
        ReminderKind::Prune,
        ReminderKind::Custom,
    ];

    fn label(&self) -> &'static str {
        match self {
            ReminderKind::Water => "Water (every few days)",
            ReminderKind::Fertilize => "Fertilize (weekly/monthly)",
            ReminderKind::Prune => "Prune (seasonal)",
            ReminderKind::Custom => "Custom",
        }
    }

    fn default_days(&self) -> u32 {
        match self {
            ReminderKind::Water => 3,
            ReminderKind::Fertilize => 14,
            ReminderKind::Prune => 90,
            ReminderKind::Custom => 7,
        }
    }

    fn is_custom(&self) -> bool {
        matches!(self, ReminderKind::Custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareTaskKind {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    PestCheck,
    Custom,
}

impl CareTaskKind {
    /// Task type as the backend names it
    pub fn task_type(&self) -> &'static str {
        match self {
            CareTaskKind::Watering => "watering",
            CareTaskKind::Fertilizing => "fertilizing",
            CareTaskKind::Pruning => "pruning",
            CareTaskKind::Repotting => "repotting",
            CareTaskKind::PestCheck => "pest_check",
            CareTaskKind::Custom => "custom",
        }
    }
}

impl WizardKind for CareTaskKind {
    const ALL: &'static [Self] = &[
        CareTaskKind::Watering,
        CareTaskKind::Fertilizing,
        CareTaskKind::Pruning,
        CareTaskKind::Repotting,
        CareTaskKind::PestCheck,
        CareTaskKind::Custom,
    ];

    fn label(&self) -> &'static str {
        match self {
            CareTaskKind::Watering => "Watering",
            CareTaskKind::Fertilizing => "Fertilizing",
            CareTaskKind::Pruning => "Pruning",
            CareTaskKind::Repotting => "Repotting",
            CareTaskKind::PestCheck => "Pest Check",
            CareTaskKind::Custom => "Custom Task",
        }
    }

    fn default_days(&self) -> u32 {
        match self {
            CareTaskKind::Watering => 3,
            CareTaskKind::Fertilizing => 30,
            CareTaskKind::Pruning => 90,
            CareTaskKind::Repotting => 365,
            CareTaskKind::PestCheck => 14,
            CareTaskKind::Custom => 7,
        }
    }

    fn is_custom(&self) -> bool {
        matches!(self, CareTaskKind::Custom)
    }
}

/// What a completed wizard produces
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<K> {
    pub kind: K,
    /// Trimmed user-supplied name; only set for custom kinds
    pub custom_name: Option<String>,
    pub days: u32,
}

impl Draft<ReminderKind> {
    pub fn task(&self) -> String {
        match &self.custom_name {
            Some(name) => name.clone(),
            None => self.kind.name().to_string(),
        }
    }

    pub fn action(&self) -> String {
        match &self.custom_name {
            Some(name) => name.to_lowercase(),
            None => self.kind.action().to_string(),
        }
    }

    pub fn to_record(
        &self,
        id: ReminderId,
        user_plant_id: u32,
        plant_name: &str,
        now: DateTime<Utc>,
    ) -> ReminderRecord {
        ReminderRecord {
            id,
            user_plant_id,
            plant_name: plant_name.to_string(),
            task: self.task(),
            action: self.action(),
            scheduled_for: now
                .checked_add_signed(Duration::days(i64::from(self.days.min(MAX_DAYS))))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            created: now,
            status: ReminderStatus::Pending,
        }
    }
}

impl Draft<CareTaskKind> {
    /// `task_type` sent to the backend. Custom names become snake case.
    pub fn task_type(&self) -> String {
        match &self.custom_name {
            Some(name) => name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_"),
            None => self.kind.task_type().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep<K> {
    SelectingType,
    EnteringDetail { kind: K },
    Confirming { draft: Draft<K> },
    Done { draft: Draft<K> },
    Cancelled,
}

impl<K> WizardStep<K> {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::SelectingType => "selecting-type",
            WizardStep::EnteringDetail { .. } => "entering-detail",
            WizardStep::Confirming { .. } => "confirming",
            WizardStep::Done { .. } => "done",
            WizardStep::Cancelled => "cancelled",
        }
    }
}

/// Longest interval a wizard accepts, about a century
pub const MAX_DAYS: u32 = 36_500;

/// Parse a day count; blank, non-numeric, zero or out-of-range input falls
/// back to `default`
pub fn parse_days(input: &str, default: u32) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_DAYS).contains(&days) => days,
        _ => default,
    }
}

#[derive(Debug, Clone)]
pub struct CareWizard<K> {
    pub user_plant_id: u32,
    pub plant_name: String,
    step: WizardStep<K>,
}

pub type ReminderWizard = CareWizard<ReminderKind>;
pub type CareTaskWizard = CareWizard<CareTaskKind>;

impl<K: WizardKind> CareWizard<K> {
    pub fn new(user_plant_id: u32, plant_name: impl Into<String>) -> Self {
        Self {
            user_plant_id,
            plant_name: plant_name.into(),
            step: WizardStep::SelectingType,
        }
    }

    pub fn step(&self) -> &WizardStep<K> {
        &self.step
    }

    fn wrong_step(&self, input: &'static str) -> Error {
        Error::WizardStep {
            step: self.step.name(),
            input,
        }
    }

    pub fn select(&mut self, kind: K) -> Result<()> {
        if !matches!(self.step, WizardStep::SelectingType) {
            return Err(self.wrong_step("a type selection"));
        }
        self.step = WizardStep::EnteringDetail { kind };
        Ok(())
    }

    /// Select by the 1-based number shown next to each option
    pub fn select_option(&mut self, choice: &str) -> Result<()> {
        let kind = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| K::ALL.get(idx).copied())
            .ok_or_else(|| Error::InvalidOption(choice.to_string()))?;
        self.select(kind)
    }

    /// Custom kinds need a non-blank `name`; other kinds ignore it
    pub fn enter_detail(&mut self, name: Option<&str>, days: &str) -> Result<()> {
        let WizardStep::EnteringDetail { kind } = self.step else {
            return Err(self.wrong_step("details"));
        };
        let custom_name = if kind.is_custom() {
            let name = name.map(str::trim).filter(|n| !n.is_empty()).ok_or(Error::MissingName)?;
            Some(name.to_string())
        } else {
            None
        };
        let draft = Draft {
            kind,
            custom_name,
            days: parse_days(days, kind.default_days()),
        };
        self.step = WizardStep::Confirming { draft };
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<Draft<K>> {
        let WizardStep::Confirming { draft } = &self.step else {
            return Err(self.wrong_step("confirmation"));
        };
        let draft = draft.clone();
        self.step = WizardStep::Done {
            draft: draft.clone(),
        };
        Ok(draft)
    }

    /// Go back from confirmation to detail entry
    pub fn back(&mut self) -> Result<()> {
        let WizardStep::Confirming { draft } = &self.step else {
            return Err(self.wrong_step("going back"));
        };
        self.step = WizardStep::EnteringDetail { kind: draft.kind };
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.step = WizardStep::Cancelled;
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.step, WizardStep::Done { .. } | WizardStep::Cancelled)
    }

    /// The finished draft; `None` unless the wizard reached `Done`
    pub fn draft(&self) -> Option<&Draft<K>> {
        match &self.step {
            WizardStep::Done { draft } => Some(draft),
            _ => None,
        }
    }
}
