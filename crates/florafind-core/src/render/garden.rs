//! Garden Grid
//!
//! One card per plant in the user's garden, with care tasks and quick actions.

use super::actions::Action;
use super::markup::{escape_html, fmt_date, fmt_score};
use crate::models::GardenEntry;
use crate::section::Section;

pub const EMPTY_GARDEN_TITLE: &str = "Your garden is empty";

fn empty_garden() -> String {
    format!(
        r#"<div class="empty-state"><h3>{}</h3><p>Start by adding some plants from search results!</p>{}</div>"#,
        EMPTY_GARDEN_TITLE,
        Action::ShowSection(Section::Chat).button("🔍 Find Plants")
    )
}

fn garden_card(entry: &GardenEntry) -> String {
    let info = &entry.plant_info;
    let display = info.display_name();
    let overdue = entry.care_schedule.iter().filter(|t| t.overdue).count();

    let mut html = String::from(r#"<div class="plant-card garden-card">"#);
    if overdue > 0 {
        html.push_str(&format!(r#"<div class="overdue-badge">{}</div>"#, overdue));
    }

    html.push_str(r#"<div class="plant-card-header"><div>"#);
    html.push_str(&format!("<h3>{}</h3>", escape_html(display)));
    if display != info.name {
        html.push_str(&format!(r#"<p class="species">{}</p>"#, escape_html(&info.name)));
    }
    html.push_str(r#"</div><div class="plant-badges">"#);
    if let Some(health) = info.health_score {
        html.push_str(&format!(r#"<div class="badge health">❤️ {}%</div>"#, fmt_score(health.round())));
    }
    if let Some(eco) = info.eco_impact_score.filter(|s| *s > 0.0) {
        html.push_str(&format!(r#"<div class="badge eco">🌍 {}/10</div>"#, fmt_score(eco)));
    }
    html.push_str("</div></div>");

    html.push_str(r#"<div class="plant-info">"#);
    if let Some(location) = &info.location {
        html.push_str(&format!(
            r#"<div class="plant-detail"><strong>📍 Location:</strong> {}</div>"#,
            escape_html(location)
        ));
    }
    if let Some(planted) = &info.date_planted {
        html.push_str(&format!(
            r#"<div class="plant-detail"><strong>📅 Planted:</strong> {}</div>"#,
            escape_html(&fmt_date(planted))
        ));
    }
    html.push_str("</div>");

    if !entry.care_schedule.is_empty() {
        html.push_str(r#"<div class="care-tasks"><h4>📋 Care Tasks:</h4>"#);
        for task in &entry.care_schedule {
            let class = if task.overdue { "task-item overdue" } else { "task-item" };
            html.push_str(&format!(r#"<div class="{}"><div><strong>{}:</strong>"#, class, escape_html(&task.task)));
            if let Some(due) = &task.next_due {
                html.push_str(&format!(" Due {}", escape_html(&fmt_date(due))));
            }
            if task.overdue {
                html.push_str(r#" <span class="overdue-label">(Overdue!)</span>"#);
            }
            html.push_str("</div>");
            html.push_str(
                &Action::CompleteTask {
                    user_plant_id: info.user_plant_id,
                    task: task.task.clone(),
                }
                .button("✔ Done"),
            );
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }

    if let Some(notes) = &info.notes {
        html.push_str(&format!(
            r#"<div class="plant-notes"><strong>📝 Notes:</strong> {}</div>"#,
            escape_html(notes)
        ));
    }

    let name = display.to_string();
    html.push_str(r#"<div class="plant-actions">"#);
    html.push_str(&Action::CareCalendar { plant_id: info.plant_id }.button("📅 View Care Guide"));
    html.push_str(&Action::AddCareTask { user_plant_id: info.user_plant_id, name: name.clone() }.button("➕ Add Care Task"));
    html.push_str(&Action::SetReminder { user_plant_id: info.user_plant_id, name: name.clone() }.button("🔔 Set Reminder"));
    html.push_str(&Action::EditNotes { user_plant_id: info.user_plant_id, name }.button("📝 Edit Notes"));
    html.push_str("</div></div>");
    html
}

pub fn render_garden(entries: &[GardenEntry]) -> String {
    if entries.is_empty() {
        return empty_garden();
    }
    entries.iter().map(garden_card).collect()
}
