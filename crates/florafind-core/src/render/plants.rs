//! Plant Cards & Care Calendar
//!
//! Search results, per-plant care schedules and location suggestions.

use super::markup::{detail, escape_html, fmt_score, plural};
use super::actions::Action;
use crate::models::{CareSchedule, LocationSuggestions, Plant};
use crate::section::Section;

pub const NO_PLANTS_FOUND: &str = "🤔 Sorry, I couldn't find any plants matching your criteria.";

fn score_badge(score: Option<f64>) -> String {
    match score.filter(|s| *s > 0.0) {
        Some(s) => format!(r#"<span class="badge eco">🌍 {}/10</span>"#, fmt_score(s)),
        None => String::new(),
    }
}

fn plant_card(plant: &Plant) -> String {
    let mut html = String::from(r#"<div class="plant-card">"#);

    html.push_str(r#"<div class="plant-card-header"><h3>"#);
    html.push_str(&escape_html(&plant.name));
    if let Some(sci) = &plant.scientific_name {
        html.push_str(&format!(" <em>({})</em>", escape_html(sci)));
    }
    html.push_str(r#"</h3><div class="plant-badges">"#);
    html.push_str(&score_badge(plant.eco_impact_score));
    if let Some(level) = &plant.difficulty_level {
        html.push_str(&format!(r#"<span class="badge difficulty">{}</span>"#, escape_html(level)));
    }
    html.push_str("</div></div>");

    html.push_str(r#"<div class="plant-info">"#);
    html.push_str(&detail("season", "🌞 Season:", plant.season.as_deref()));
    html.push_str(&detail("climate", "🌍 Climate:", plant.climate.as_deref()));
    html.push_str(&detail("native", "📍 Native to:", plant.native_region.as_deref()));
    html.push_str(&detail("height", "📏 Height:", plant.growth_height.as_deref()));
    html.push_str("</div>");

    if let Some(care) = &plant.care_instructions {
        html.push_str(&format!(
            r#"<div class="care-instructions">{}</div>"#,
            escape_html(care)
        ));
    }
    if let Some(culture) = &plant.cultural_significance {
        html.push_str(&format!(
            r#"<div class="plant-note cultural"><strong>🏛️ Cultural Significance:</strong> {}</div>"#,
            escape_html(culture)
        ));
    }
    if let Some(medicinal) = &plant.medicinal_properties {
        html.push_str(&format!(
            r#"<div class="plant-note medicinal"><strong>💊 Medicinal Uses:</strong> {}</div>"#,
            escape_html(medicinal)
        ));
    }

    // Actions need an id to address the plant on the backend
    if let Some(id) = plant.plant_id {
        html.push_str(r#"<div class="plant-actions">"#);
        html.push_str(&Action::AddToGarden { plant_id: id, name: plant.name.clone() }.button("➕ Add to Garden"));
        html.push_str(&Action::CareCalendar { plant_id: id }.button("📅 Care Schedule"));
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// Search result cards, or the fallback text when nothing matched
pub fn render_plant_cards(plants: &[Plant], eco_impact: f64) -> String {
    if plants.is_empty() {
        return NO_PLANTS_FOUND.to_string();
    }

    let mut html = String::from(r#"<div class="results-header"><strong>"#);
    html.push_str(&format!("🌿 Found {} for you!", plural(plants.len(), "plant")));
    html.push_str("</strong>");
    if eco_impact > 0.0 {
        html.push_str(&format!(
            r#"<span class="badge eco-total">🌍 Eco Impact: {}/10</span>"#,
            fmt_score(eco_impact)
        ));
    }
    html.push_str("</div>");

    for plant in plants {
        html.push_str(&plant_card(plant));
    }
    html
}

fn render_care_tips(schedule: &CareSchedule) -> String {
    let mut html = String::new();
    for (season, tips) in &schedule.care_tips {
        html.push_str(&format!(r#"<div class="care-tip-season"><strong>{}:</strong><ul>"#, escape_html(season)));
        for (task, instruction) in tips {
            html.push_str(&format!(
                "<li><strong>{}:</strong> {}</li>",
                escape_html(task),
                escape_html(instruction)
            ));
        }
        html.push_str("</ul></div>");
    }
    html
}

/// Care calendar card for one plant
pub fn render_care_calendar(schedule: &CareSchedule, plant_id: Option<u32>) -> String {
    let mut html = String::from(r#"<div class="care-calendar">"#);
    html.push_str(&format!(
        "<h3>📅 Care Calendar for {}</h3>",
        escape_html(&schedule.plant_name)
    ));

    html.push_str(r#"<div class="care-calendar-grid">"#);
    if let Some(season) = &schedule.current_season {
        html.push_str(&format!(
            r#"<div class="care-fact"><strong>Current Season:</strong> {}</div>"#,
            escape_html(season)
        ));
    }
    if let Some(days) = schedule.watering.frequency_days {
        html.push_str(&format!(
            r#"<div class="care-fact"><strong>💧 Water Every:</strong> {}</div>"#,
            plural(days as usize, "day")
        ));
    }
    if let Some(next) = &schedule.watering.next_due {
        html.push_str(&format!(
            r#"<div class="care-fact"><strong>Next Watering:</strong> {}</div>"#,
            escape_html(next)
        ));
    }
    if let Some(score) = schedule.eco_impact_score {
        html.push_str(&format!(
            r#"<div class="care-fact"><strong>🌍 Eco Impact:</strong> {}/10</div>"#,
            fmt_score(score)
        ));
    }
    html.push_str("</div>");

    if !schedule.care_tips.is_empty() {
        html.push_str(r#"<div class="care-tips"><h4>🌱 Seasonal Care Tips:</h4>"#);
        html.push_str(&render_care_tips(schedule));
        html.push_str("</div>");
    }

    html.push_str(r#"<div class="plant-actions">"#);
    if let Some(id) = plant_id {
        html.push_str(&Action::AddToGarden { plant_id: id, name: schedule.plant_name.clone() }.button("➕ Add to My Garden"));
    }
    // reminders are keyed by garden plant, so they are only offered on garden cards
    html.push_str(&Action::ShowSection(Section::Calendar).button("📅 View Calendar"));
    html.push_str("</div></div>");
    html
}

/// Eco tips plus climate-suited plant cards for a city
pub fn render_location_suggestions(data: &LocationSuggestions) -> String {
    let mut html = String::from(r#"<div class="location-suggestions">"#);
    html.push_str(&format!("<h3>🌍 Plants for {}</h3>", escape_html(&data.location)));
    if !data.eco_tips.is_empty() {
        html.push_str(r#"<div class="eco-tips"><h4>🌿 Eco Tips:</h4><ul>"#);
        for tip in &data.eco_tips {
            html.push_str(&format!("<li>{}</li>", escape_html(tip)));
        }
        html.push_str("</ul></div>");
    }
    if !data.climate_suggestions.is_empty() {
        html.push_str(&render_plant_cards(&data.climate_suggestions, data.total_eco_impact));
    }
    html.push_str("</div>");
    html
}
