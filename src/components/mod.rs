//! UI Components
//!
//! Leptos components for the sections and overlays.

mod achievement_popup;
mod calendar_panel;
mod chat_panel;
mod community_panel;
mod garden_panel;
mod markup_actions;
mod nav_bar;
mod notes_editor;
mod toast_stack;
mod wizard_dialog;

pub use achievement_popup::AchievementPopup;
pub use calendar_panel::CalendarPanel;
pub use chat_panel::ChatPanel;
pub use community_panel::CommunityPanel;
pub use garden_panel::GardenPanel;
pub use nav_bar::NavBar;
pub use notes_editor::NotesEditor;
pub use toast_stack::ToastStack;
pub use wizard_dialog::WizardDialog;
