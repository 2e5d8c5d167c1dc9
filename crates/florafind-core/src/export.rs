//! Calendar CSV export

use crate::calendar::{CalendarMonth, UpcomingTask};

pub const CSV_HEADER: &str = "Date,Task";
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

pub fn export_filename(month: CalendarMonth) -> String {
    format!("FloraFind_Calendar_{}_{}.csv", month.month, month.year)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Tasks due in `month`, one `YYYY-MM-DD,label` line each
pub fn export_month(month: CalendarMonth, tasks: &[UpcomingTask]) -> CsvExport {
    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for task in tasks.iter().filter(|t| month.contains(t.due)) {
        content.push_str(&format!(
            "{},{}\n",
            task.due.format("%Y-%m-%d"),
            csv_field(&task.label())
        ));
    }
    tracing::debug!(month = month.month, year = month.year, bytes = content.len(), "calendar exported");
    CsvExport {
        filename: export_filename(month),
        content,
    }
}
