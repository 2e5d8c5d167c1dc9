//! View-Section Controller
//!
//! Exactly one top-level section is active. Activating a section yields the
//! data reloads it needs and opens a fresh navigation context.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Chat,
    Garden,
    Community,
    Calendar,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Chat,
        Section::Garden,
        Section::Community,
        Section::Calendar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Chat => "chat",
            Section::Garden => "garden",
            Section::Community => "community",
            Section::Calendar => "calendar",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "chat" => Ok(Section::Chat),
            "garden" => Ok(Section::Garden),
            "community" => Ok(Section::Community),
            "calendar" => Ok(Section::Calendar),
            other => Err(Error::UnknownSection(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Chat => "💬 Chat",
            Section::Garden => "🌱 My Garden",
            Section::Community => "🏆 Community",
            Section::Calendar => "📅 Calendar",
        }
    }

    /// Data the section shows and must fetch when opened
    pub fn reloads(&self) -> &'static [ReloadIntent] {
        match self {
            Section::Chat => &[],
            Section::Garden => &[ReloadIntent::Garden],
            Section::Community => &[ReloadIntent::Challenges, ReloadIntent::Leaderboard],
            Section::Calendar => &[ReloadIntent::UpcomingTasks],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadIntent {
    Garden,
    Challenges,
    Leaderboard,
    UpcomingTasks,
}

/// Identifies one visit to a section. Superseded by the next activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavContext {
    pub section: Section,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub context: NavContext,
    pub reloads: Vec<ReloadIntent>,
}

#[derive(Debug, Clone)]
pub struct SectionController {
    active: Section,
    epoch: u64,
}

impl Default for SectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionController {
    pub fn new() -> Self {
        Self {
            active: Section::Chat,
            epoch: 0,
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn context(&self) -> NavContext {
        NavContext {
            section: self.active,
            epoch: self.epoch,
        }
    }

    pub fn is_current(&self, context: NavContext) -> bool {
        context == self.context()
    }

    pub fn activate(&mut self, section: Section) -> Activation {
        self.active = section;
        self.epoch += 1;
        tracing::debug!(section = section.as_str(), epoch = self.epoch, "section activated");
        Activation {
            context: self.context(),
            reloads: section.reloads().to_vec(),
        }
    }

    /// Activate by name. Unknown names leave the active section untouched.
    pub fn activate_named(&mut self, name: &str) -> Result<Activation> {
        let section = Section::parse(name)?;
        Ok(self.activate(section))
    }

    /// `(section, is_active)` for every section, in display order
    pub fn markers(&self) -> [(Section, bool); 4] {
        Section::ALL.map(|s| (s, s == self.active))
    }

    /// CSS class for a section container
    pub fn section_class(&self, section: Section) -> &'static str {
        if section == self.active {
            "app-section active"
        } else {
            "app-section"
        }
    }
}
