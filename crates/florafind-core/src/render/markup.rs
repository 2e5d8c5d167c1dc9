//! Markup Helpers
//!
//! Escaping, number/date formatting and Markdown for bot messages.

use chrono::NaiveDate;
use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Scores print without decimals when whole (`8/10`), else with one (`7.5/10`)
pub fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{:.1}", score)
    }
}

pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// `2024-09-05` -> `9/5/2024`; anything unparseable is shown as sent
pub fn fmt_date(raw: &str) -> String {
    let day = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Render bot free text as Markdown. Raw HTML in the source is escaped.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);
    let events = parser.map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => {
            Event::Text(CowStr::from(html.into_string()))
        }
        other => other,
    });
    let mut html = String::new();
    push_html(&mut html, events);
    html
}

/// Optional `<div class=..><strong>label</strong> value</div>` line
pub(crate) fn detail(class: &str, label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!(
            r#"<div class="plant-detail {}"><strong>{}</strong> {}</div>"#,
            class,
            label,
            escape_html(v)
        ),
        None => String::new(),
    }
}
