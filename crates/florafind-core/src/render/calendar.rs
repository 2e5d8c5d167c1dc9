//! Calendar Section
//!
//! Month grid and upcoming-task list.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::actions::Action;
use super::markup::escape_html;
use crate::calendar::{CalendarMonth, UpcomingTask};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Weekday headers, leading blanks, then one cell per day.
/// Days with a due task in `tasks` are marked `has-tasks`.
pub fn render_month_grid(month: CalendarMonth, tasks: &[UpcomingTask]) -> String {
    let busy: BTreeSet<NaiveDate> = tasks
        .iter()
        .map(|t| t.due)
        .filter(|d| month.contains(*d))
        .collect();

    let mut html = String::new();
    for day in WEEKDAYS {
        html.push_str(&format!(r#"<div class="calendar-header">{}</div>"#, day));
    }
    for _ in 0..month.leading_blanks() {
        html.push_str(r#"<div class="calendar-day empty"></div>"#);
    }
    for day in 1..=month.days() {
        let has_task = NaiveDate::from_ymd_opt(month.year, month.month, day)
            .map(|d| busy.contains(&d))
            .unwrap_or(false);
        if has_task {
            html.push_str(&format!(
                r#"<div class="calendar-day has-tasks"><div>{}</div><div class="task-indicator"></div></div>"#,
                day
            ));
        } else {
            html.push_str(&format!(r#"<div class="calendar-day"><div>{}</div></div>"#, day));
        }
    }
    html
}

fn due_label(days: i64) -> String {
    match days {
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d if d > 1 => format!("Due in {} days", d),
        -1 => "1 day overdue".to_string(),
        d => format!("{} days overdue", -d),
    }
}

pub fn render_upcoming_tasks(tasks: &[UpcomingTask], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return r#"<div class="empty-state"><h3>No upcoming tasks</h3><p>Add plants to your garden to build a care schedule.</p></div>"#
            .to_string();
    }

    tasks
        .iter()
        .map(|task| {
            let days = task.days_until(today);
            let class = match days {
                d if d < 0 => "task-item overdue",
                0 | 1 => "task-item due-soon",
                _ => "task-item",
            };
            format!(
                r#"<div class="{}"><div><strong>{}</strong><div class="task-due">{}</div></div>{}</div>"#,
                class,
                escape_html(&task.label()),
                due_label(days),
                Action::CompleteTask {
                    user_plant_id: task.user_plant_id,
                    task: task.task.clone(),
                }
                .button("✔ Mark Done")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(due: NaiveDate, name: &str) -> UpcomingTask {
        UpcomingTask {
            due,
            user_plant_id: 1,
            plant_name: name.into(),
            task: "watering".into(),
        }
    }

    #[test]
    fn test_month_grid_cells() {
        // September 2024 starts on a Sunday and has 30 days
        let month = CalendarMonth { year: 2024, month: 9 };
        let tasks = vec![task(ymd(2024, 9, 5), "Rose"), task(ymd(2024, 10, 5), "Mint")];
        let html = render_month_grid(month, &tasks);
        assert_eq!(html.matches("calendar-header").count(), 7);
        assert_eq!(html.matches("calendar-day empty").count(), 0);
        assert_eq!(html.matches(r#"<div class="calendar-day"#).count(), 30);
        assert_eq!(html.matches("has-tasks").count(), 1);
        assert!(html.contains(r#"<div class="calendar-day has-tasks"><div>5</div>"#));

        // October 2024 starts on a Tuesday
        let html = render_month_grid(month.shifted(1), &tasks);
        assert_eq!(html.matches("calendar-day empty").count(), 2);
    }

    #[test]
    fn test_upcoming_labels() {
        let today = ymd(2024, 9, 5);
        let tasks = vec![
            task(ymd(2024, 9, 3), "Lavender"),
            task(today, "Rose Bush"),
            task(ymd(2024, 9, 7), "Tulsi"),
        ];
        let html = render_upcoming_tasks(&tasks, today);
        assert!(html.contains("2 days overdue"));
        assert!(html.contains("Due today"));
        assert!(html.contains("Due in 2 days"));
        assert!(html.contains(r#"<div class="task-item overdue">"#));
        assert!(html.contains(r#"<div class="task-item due-soon">"#));
        assert!(html.contains("Watering Rose Bush"));
    }

    #[test]
    fn test_no_upcoming_tasks() {
        assert!(render_upcoming_tasks(&[], ymd(2024, 1, 1)).contains("No upcoming tasks"));
    }
}
