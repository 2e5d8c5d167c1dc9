//! Community Widgets
//!
//! Leaderboard and challenge list.

use super::markup::{escape_html, fmt_date};
use crate::models::{Challenge, LeaderboardEntry};

/// Rank class by response position; scores are never re-sorted here
pub fn rank_class(index: usize) -> &'static str {
    match index {
        0 => "gold",
        1 => "silver",
        2 => "bronze",
        _ => "other",
    }
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return r#"<div class="empty-state"><h3>No rankings yet</h3><p>Be the first to start growing!</p></div>"#
            .to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, user)| {
            let health = user.avg_health_score.map(|h| h.round() as i64).unwrap_or(0);
            format!(
                concat!(
                    r#"<div class="leaderboard-item">"#,
                    r#"<div class="rank {}">{}</div>"#,
                    r#"<div class="leader-info"><h4>{}</h4>"#,
                    r#"<div class="leader-stats"><span>🌱 {} plants</span><span>❤️ {}% health</span></div></div>"#,
                    r#"<div class="leader-score"><div class="points">{} pts</div><div class="level">Level {}</div></div>"#,
                    "</div>"
                ),
                rank_class(index),
                index + 1,
                escape_html(&user.username),
                user.total_plants.unwrap_or(0),
                health,
                user.plant_health_points,
                user.level,
            )
        })
        .collect()
}

pub fn render_challenges(challenges: &[Challenge]) -> String {
    if challenges.is_empty() {
        return r#"<div class="empty-state"><h3>No active challenges</h3><p>Check back soon for new community challenges!</p></div>"#
            .to_string();
    }

    challenges
        .iter()
        .map(|challenge| {
            let mut html = String::from(r#"<div class="challenge-card">"#);
            html.push_str(&format!("<h4>{}</h4>", escape_html(&challenge.title)));
            html.push_str(&format!("<p>{}</p>", escape_html(&challenge.description)));
            if let Some(kind) = &challenge.challenge_type {
                html.push_str(&format!(r#"<span class="challenge-type">{}</span>"#, escape_html(kind)));
            }
            if let Some(end) = &challenge.end_date {
                html.push_str(&format!("<small>Ends: {}</small>", escape_html(&fmt_date(end))));
            }
            if let Some(prize) = &challenge.prize_description {
                html.push_str(&format!(r#"<div class="challenge-prize">🏆 Prize: {}</div>"#, escape_html(prize)));
            }
            html.push_str("</div>");
            html
        })
        .collect()
}
