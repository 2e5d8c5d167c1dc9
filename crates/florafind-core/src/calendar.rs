//! Care Calendar Model
//!
//! The displayed month and the upcoming-task list flattened from the garden.

use chrono::{Datelike, NaiveDate};

use crate::models::GardenResponse;

/// A month shown in the calendar grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl CalendarMonth {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Move by whole months; negative goes back
    pub fn shifted(&self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn days(&self) -> u32 {
        let next = self.shifted(1).first_day();
        (next - self.first_day()).num_days() as u32
    }

    /// Blank cells before day 1, Sunday-first
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn name(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// One due care task across the garden
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingTask {
    pub due: NaiveDate,
    pub user_plant_id: u32,
    pub plant_name: String,
    pub task: String,
}

impl UpcomingTask {
    /// "Water Rose Bush" style label
    pub fn label(&self) -> String {
        format!("{} {}", capitalize(&self.task.replace('_', " ")), self.plant_name)
    }

    /// Positive: days until due; negative: days overdue
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.due - today).num_days()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Flatten every dated care task, soonest first. Tasks whose due date the
/// backend did not send (or sent unparseable) are skipped.
pub fn upcoming_from_garden(garden: &GardenResponse) -> Vec<UpcomingTask> {
    let mut tasks: Vec<UpcomingTask> = garden
        .garden
        .iter()
        .flat_map(|entry| {
            entry.care_schedule.iter().filter_map(move |task| {
                let raw = task.next_due.as_deref()?;
                let due = NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()?;
                Some(UpcomingTask {
                    due,
                    user_plant_id: entry.plant_info.user_plant_id,
                    plant_name: entry.plant_info.display_name().to_string(),
                    task: task.task.clone(),
                })
            })
        })
        .collect();
    tasks.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.plant_name.cmp(&b.plant_name)));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GardenCareTask, GardenEntry, GardenPlantInfo};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_arithmetic() {
        let jan = CalendarMonth { year: 2024, month: 1 };
        assert_eq!(jan.shifted(-1), CalendarMonth { year: 2023, month: 12 });
        assert_eq!(jan.shifted(13), CalendarMonth { year: 2025, month: 2 });
        assert_eq!(CalendarMonth { year: 2024, month: 2 }.days(), 29);
        assert_eq!(CalendarMonth { year: 2023, month: 2 }.days(), 28);
        assert_eq!(CalendarMonth { year: 2024, month: 12 }.days(), 31);
        // 2024-09-01 is a Sunday
        assert_eq!(CalendarMonth { year: 2024, month: 9 }.leading_blanks(), 0);
        assert_eq!(CalendarMonth { year: 2024, month: 9 }.name(), "September 2024");
    }

    #[test]
    fn test_upcoming_sorted_and_skips_undated() {
        let garden = GardenResponse {
            garden: vec![GardenEntry {
                plant_info: GardenPlantInfo {
                    user_plant_id: 4,
                    name: "Rosa".into(),
                    nickname: Some("Rose Bush".into()),
                    ..Default::default()
                },
                care_schedule: vec![
                    GardenCareTask { task: "fertilizing".into(), next_due: Some("2024-09-07".into()), ..Default::default() },
                    GardenCareTask { task: "watering".into(), next_due: Some("2024-09-05".into()), ..Default::default() },
                    GardenCareTask { task: "pruning".into(), next_due: Some("None".into()), ..Default::default() },
                ],
            }],
            ..Default::default()
        };
        let tasks = upcoming_from_garden(&garden);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].label(), "Watering Rose Bush");
        assert_eq!(tasks[0].days_until(ymd(2024, 9, 5)), 0);
        assert_eq!(tasks[1].days_until(ymd(2024, 9, 9)), -2);
    }

    #[test]
    fn test_label_replaces_underscores() {
        let task = UpcomingTask {
            due: ymd(2024, 1, 1),
            user_plant_id: 1,
            plant_name: "Tulsi".into(),
            task: "pest_check".into(),
        };
        assert_eq!(task.label(), "Pest check Tulsi");
    }
}
