//! Renderer
//!
//! Pure functions mapping backend payloads to HTML fragments. All of them are
//! total: missing optional fields drop their fragment instead of failing.

mod actions;
mod calendar;
mod community;
mod garden;
mod markup;
mod nlp;
mod plants;

pub use actions::Action;
pub use calendar::{render_month_grid, render_upcoming_tasks};
pub use community::{rank_class, render_challenges, render_leaderboard};
pub use garden::{render_garden, EMPTY_GARDEN_TITLE};
pub use markup::{escape_html, render_markdown};
pub use nlp::{render_nlp_analysis, NLP_TABS};
pub use plants::{
    render_care_calendar, render_location_suggestions, render_plant_cards, NO_PLANTS_FOUND,
};
