//! Notification Store
//!
//! Reminder records and per-plant notes kept in a browser-style key-value
//! store. Reminders live as one JSON array; notes are raw text per plant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Result};

pub const REMINDERS_KEY: &str = "floraFindReminders";

pub fn note_key(user_plant_id: u32) -> String {
    format!("plantNotes_{}", user_plant_id)
}

/// String-keyed persistent storage (`localStorage` in the browser)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Fired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub user_plant_id: u32,
    pub plant_name: String,
    /// Display name, e.g. "Water" or a custom task
    pub task: String,
    /// Verb phrase used in the notification body, e.g. "watering"
    pub action: String,
    pub scheduled_for: DateTime<Utc>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub status: ReminderStatus,
}

impl ReminderRecord {
    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }

    pub fn notification_title(&self) -> String {
        format!("🌱 FloraFind Reminder: {}", self.task)
    }

    pub fn notification_body(&self) -> String {
        format!("Time for {} {}!", self.action, self.plant_name)
    }

    /// Tag that keeps the browser from showing the same reminder twice
    pub fn notification_tag(&self) -> String {
        format!("reminder-{}", self.id.0)
    }

    fn same_slot(&self, user_plant_id: u32, task: &str) -> bool {
        self.user_plant_id == user_plant_id && self.task.eq_ignore_ascii_case(task)
    }
}

/// Result of matching persisted reminders against the clock on startup
#[derive(Debug, Default, PartialEq)]
pub struct Reconciled {
    /// Still in the future; register a timer for each
    pub upcoming: Vec<ReminderRecord>,
    /// Came due while the page was closed; already marked fired
    pub overdue: Vec<ReminderRecord>,
}

pub struct NotificationStore<S> {
    store: S,
}

impl<S: KeyValueStore> NotificationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Every stored reminder in insertion order. Unreadable data counts as empty.
    pub fn list(&self) -> Vec<ReminderRecord> {
        let Some(raw) = self.store.get(REMINDERS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, key = REMINDERS_KEY, "stored reminders unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[ReminderRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(REMINDERS_KEY, &json)
    }

    /// Id for a reminder created at `now`, unique among stored records
    pub fn next_id(&self, now: DateTime<Utc>) -> ReminderId {
        let candidate = now.timestamp_millis().max(0) as u64;
        let taken = self.list().iter().map(|r| r.id.0).max();
        match taken {
            Some(max) if max >= candidate => ReminderId(max + 1),
            _ => ReminderId(candidate),
        }
    }

    pub fn find_duplicate(&self, user_plant_id: u32, task: &str) -> Option<ReminderRecord> {
        self.list()
            .into_iter()
            .find(|r| r.is_pending() && r.same_slot(user_plant_id, task))
    }

    /// Persist a reminder. A pending reminder for the same plant and task is
    /// replaced and returned so its timer can be cancelled.
    pub fn append(&self, record: ReminderRecord) -> Result<Option<ReminderRecord>> {
        let mut records = self.list();
        let replaced = records
            .iter()
            .position(|r| r.is_pending() && r.same_slot(record.user_plant_id, &record.task))
            .map(|idx| records.remove(idx));
        if let Some(old) = &replaced {
            tracing::info!(old = old.id.0, new = record.id.0, plant = record.user_plant_id, "replacing reminder");
        }
        records.push(record);
        self.save(&records)?;
        Ok(replaced)
    }

    pub fn get(&self, id: ReminderId) -> Option<ReminderRecord> {
        self.list().into_iter().find(|r| r.id == id)
    }

    pub fn remove(&self, id: ReminderId) -> Result<Option<ReminderRecord>> {
        let mut records = self.list();
        let Some(idx) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(idx);
        self.save(&records)?;
        Ok(Some(removed))
    }

    /// Returns false when no such reminder exists
    pub fn mark_fired(&self, id: ReminderId) -> Result<bool> {
        let mut records = self.list();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.status = ReminderStatus::Fired;
        self.save(&records)?;
        Ok(true)
    }

    /// Drop fired reminders; returns how many were removed
    pub fn prune_fired(&self) -> Result<usize> {
        let records = self.list();
        let before = records.len();
        let kept: Vec<ReminderRecord> = records.into_iter().filter(|r| r.is_pending()).collect();
        let pruned = before - kept.len();
        if pruned > 0 {
            self.save(&kept)?;
        }
        Ok(pruned)
    }

    pub fn reconcile(&self, now: DateTime<Utc>) -> Result<Reconciled> {
        let mut records = self.list();
        let mut out = Reconciled::default();
        for record in records.iter_mut().filter(|r| r.is_pending()) {
            if record.scheduled_for <= now {
                record.status = ReminderStatus::Fired;
                out.overdue.push(record.clone());
            } else {
                out.upcoming.push(record.clone());
            }
        }
        if !out.overdue.is_empty() {
            self.save(&records)?;
        }
        tracing::info!(upcoming = out.upcoming.len(), overdue = out.overdue.len(), "reminders reconciled");
        Ok(out)
    }

    /// Empty string when no note was saved
    pub fn get_note(&self, user_plant_id: u32) -> String {
        self.store.get(&note_key(user_plant_id)).unwrap_or_default()
    }

    /// Blank text clears the note
    pub fn set_note(&self, user_plant_id: u32, text: &str) -> Result<()> {
        let key = note_key(user_plant_id);
        if text.trim().is_empty() {
            self.store.remove(&key)
        } else {
            self.store.set(&key, text)
        }
    }
}

/// Convenience for mapping host storage failures
pub fn write_error(key: &str, reason: impl std::fmt::Display) -> Error {
    Error::StorageWrite {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 5, 8, 0, 0).unwrap()
    }

    fn reminder(id: u64, plant: u32, task: &str, in_days: i64) -> ReminderRecord {
        ReminderRecord {
            id: ReminderId(id),
            user_plant_id: plant,
            plant_name: "Rose Bush".into(),
            task: task.into(),
            action: task.to_lowercase(),
            scheduled_for: t0() + Duration::days(in_days),
            created: t0(),
            status: ReminderStatus::Pending,
        }
    }

    #[test]
    fn test_appended_reminder_is_listed() {
        let store = NotificationStore::new(MemoryStore::new());
        assert!(store.list().is_empty());
        store.append(reminder(1, 4, "Water", 3)).unwrap();
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ReminderId(1));
    }

    #[test]
    fn test_duplicate_replaces_pending() {
        let store = NotificationStore::new(MemoryStore::new());
        store.append(reminder(1, 4, "Water", 3)).unwrap();
        store.append(reminder(2, 4, "Prune", 90)).unwrap();
        assert_eq!(store.find_duplicate(4, "water").map(|r| r.id), Some(ReminderId(1)));

        let replaced = store.append(reminder(3, 4, "Water", 5)).unwrap();
        assert_eq!(replaced.map(|r| r.id), Some(ReminderId(1)));
        let ids: Vec<u64> = store.list().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let store = NotificationStore::new(MemoryStore::new());
        store.append(reminder(7, 4, "Water", 3)).unwrap();
        let raw = store.inner().get(REMINDERS_KEY).unwrap();
        assert!(raw.contains(r#""userPlantId":4"#));
        assert!(raw.contains(r#""scheduledFor":"2024-09-08T08:00:00Z""#));
        assert!(raw.contains(r#""status":"pending""#));
    }

    #[test]
    fn test_legacy_record_without_status_loads() {
        let mem = MemoryStore::new();
        mem.set(
            REMINDERS_KEY,
            r#"[{"id":1725523200000,"userPlantId":2,"plantName":"Tulsi","task":"Water",
                "action":"watering","scheduledFor":"2024-09-08T08:00:00.000Z","created":"2024-09-05T08:00:00.000Z"}]"#,
        )
        .unwrap();
        let store = NotificationStore::new(mem);
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_pending());
        assert_eq!(listed[0].notification_body(), "Time for watering Tulsi!");
    }

    #[test]
    fn test_corrupt_json_is_empty() {
        let mem = MemoryStore::new();
        mem.set(REMINDERS_KEY, "{not json").unwrap();
        let store = NotificationStore::new(mem);
        assert!(store.list().is_empty());
        store.append(reminder(1, 1, "Water", 1)).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_reconcile_splits_and_marks_fired() {
        let store = NotificationStore::new(MemoryStore::new());
        store.append(reminder(1, 1, "Water", -1)).unwrap();
        store.append(reminder(2, 2, "Water", 2)).unwrap();

        let result = store.reconcile(t0()).unwrap();
        assert_eq!(result.overdue.len(), 1);
        assert_eq!(result.overdue[0].id, ReminderId(1));
        assert_eq!(result.upcoming.len(), 1);
        assert_eq!(store.get(ReminderId(1)).unwrap().status, ReminderStatus::Fired);

        // a second pass does not fire the same reminder again
        assert!(store.reconcile(t0()).unwrap().overdue.is_empty());
        assert_eq!(store.prune_fired().unwrap(), 1);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_mark_fired_and_remove() {
        let store = NotificationStore::new(MemoryStore::new());
        store.append(reminder(1, 1, "Water", 1)).unwrap();
        assert!(store.mark_fired(ReminderId(1)).unwrap());
        assert!(!store.mark_fired(ReminderId(9)).unwrap());
        assert!(store.find_duplicate(1, "Water").is_none());
        assert!(store.remove(ReminderId(1)).unwrap().is_some());
        assert!(store.remove(ReminderId(1)).unwrap().is_none());
    }

    #[test]
    fn test_next_id_is_unique() {
        let store = NotificationStore::new(MemoryStore::new());
        let first = store.next_id(t0());
        assert_eq!(first.0, t0().timestamp_millis() as u64);
        store.append(reminder(first.0, 1, "Water", 1)).unwrap();
        assert_eq!(store.next_id(t0()), ReminderId(first.0 + 1));
    }

    #[test]
    fn test_notes_last_write_wins() {
        let store = NotificationStore::new(MemoryStore::new());
        assert_eq!(store.get_note(3), "");
        store.set_note(3, "Repotted in May").unwrap();
        store.set_note(3, "Needs more sun").unwrap();
        assert_eq!(store.get_note(3), "Needs more sun");
        assert_eq!(store.inner().get("plantNotes_3").as_deref(), Some("Needs more sun"));
        store.set_note(3, "  ").unwrap();
        assert_eq!(store.inner().get("plantNotes_3"), None);
    }
}
