//! Application Session
//!
//! Everything the page shows, in one explicit state object: language,
//! location, active section, chat log, loaded data, toasts and timers.
//! Methods here are synchronous; [`crate::flows`] sequences them around
//! backend calls.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

use crate::calendar::{upcoming_from_garden, CalendarMonth, UpcomingTask};
use crate::chat::{suggest, ChatLog, ChatMessage, Language};
use crate::error::Result;
use crate::export::{export_month, CsvExport};
use crate::guard::{RenderTarget, RequestTracker, Ticket};
use crate::models::{
    Challenge, GardenResponse, GardenSummary, LeaderboardEntry, QueryReply, UserStats,
};
use crate::scheduler::{TaskId, TimerJob, TimerScheduler};
use crate::section::{Activation, Section, SectionController};
use crate::storage::{KeyValueStore, NotificationStore, ReminderId, ReminderRecord};
use crate::toast::{toast_lifetime, Toast, ToastId, ToastKind, ToastStack};
use crate::wizard::{Draft, ReminderKind};

pub const DEFAULT_CITY: &str = "Mumbai";
pub const ACHIEVEMENT_POINTS: i64 = 50;

const DEMO_DELAY_SECS: i64 = 5;
const SETUP_DEMO_DELAY_SECS: i64 = 10;
const ACHIEVEMENT_DELAY_SECS: i64 = 1;

/// A system notification for the host to display
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserNotification {
    pub title: String,
    pub body: String,
    pub tag: Option<String>,
}

impl BrowserNotification {
    fn for_reminder(record: &ReminderRecord) -> Self {
        Self {
            title: record.notification_title(),
            body: record.notification_body(),
            tag: Some(record.notification_tag()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerOutcome {
    Notify(BrowserNotification),
    CheckAchievements,
}

/// Shown in the achievement popup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub new_badges: u32,
    pub total_badges: u32,
    pub points: i64,
    pub level: u32,
}

pub struct AppSession<S> {
    store: NotificationStore<S>,
    language: Language,
    location: Option<String>,
    sections: SectionController,
    tracker: RequestTracker,
    chat: ChatLog,
    typing: bool,
    suggestions: Vec<&'static str>,
    month: CalendarMonth,
    stats: UserStats,
    achievement: Option<Achievement>,
    garden: Option<GardenResponse>,
    upcoming: Vec<UpcomingTask>,
    challenges: Vec<Challenge>,
    leaderboard: Vec<LeaderboardEntry>,
    scheduler: TimerScheduler,
    toasts: ToastStack,
    toast_timers: HashMap<ToastId, TaskId>,
    reminder_timers: HashMap<ReminderId, TaskId>,
}

impl<S: KeyValueStore> AppSession<S> {
    pub fn new(store: S, today: NaiveDate) -> Self {
        Self {
            store: NotificationStore::new(store),
            language: Language::default(),
            location: None,
            sections: SectionController::new(),
            tracker: RequestTracker::new(),
            chat: ChatLog::new(),
            typing: false,
            suggestions: Vec::new(),
            month: CalendarMonth::containing(today),
            stats: UserStats::default(),
            achievement: None,
            garden: None,
            upcoming: Vec::new(),
            challenges: Vec::new(),
            leaderboard: Vec::new(),
            scheduler: TimerScheduler::new(),
            toasts: ToastStack::new(),
            toast_timers: HashMap::new(),
            reminder_timers: HashMap::new(),
        }
    }

    pub fn store(&self) -> &NotificationStore<S> {
        &self.store
    }

    // ========================
    // Sections & request guards
    // ========================

    pub fn sections(&self) -> &SectionController {
        &self.sections
    }

    pub fn active_section(&self) -> Section {
        self.sections.active()
    }

    pub fn show_section(&mut self, name: &str) -> Result<Activation> {
        self.sections.activate_named(name)
    }

    pub fn begin(&mut self, target: RenderTarget) -> Ticket {
        self.tracker.begin(target, self.sections.context())
    }

    pub fn accept(&self, ticket: &Ticket) -> bool {
        self.tracker.accept(ticket, &self.sections)
    }

    // ========================
    // Chat
    // ========================

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn push_chat(&mut self, message: ChatMessage) {
        self.chat.push(message);
    }

    pub fn typing(&self) -> bool {
        self.typing
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    /// Append the bot answer and adopt the language the backend detected
    pub fn apply_reply(&mut self, reply: &QueryReply) {
        self.chat.push(ChatMessage::from_reply(reply));
        if let Some(lang) = reply.language.as_deref().and_then(|l| l.parse::<Language>().ok()) {
            if lang != self.language {
                tracing::info!(language = lang.code(), "language detected from query");
                self.language = lang;
            }
        }
    }

    pub fn suggestions(&self) -> &[&'static str] {
        &self.suggestions
    }

    pub fn update_suggestions(&mut self, input: &str) {
        self.suggestions = suggest(input);
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn toggle_language(&mut self, now: DateTime<Utc>) -> Language {
        self.language = self.language.next();
        self.toast(
            ToastKind::Info,
            format!("Language changed to {}", self.language.code().to_uppercase()),
            now,
        );
        self.language
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Blank input clears the location
    pub fn set_location(&mut self, city: Option<&str>) {
        self.location = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
    }

    /// Explicit city, else the stored location, else the default city
    pub fn resolve_city(&mut self, city: Option<&str>) -> String {
        if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
            self.location = Some(city.to_string());
        }
        self.location
            .clone()
            .unwrap_or_else(|| DEFAULT_CITY.to_string())
    }

    // ========================
    // Loaded data
    // ========================

    pub fn garden(&self) -> Option<&GardenResponse> {
        self.garden.as_ref()
    }

    pub fn garden_summary(&self) -> GardenSummary {
        self.garden
            .as_ref()
            .map(GardenResponse::summary)
            .unwrap_or_default()
    }

    /// Locally saved notes take precedence over what the backend sent
    pub fn set_garden(&mut self, mut garden: GardenResponse) {
        for entry in &mut garden.garden {
            let note = self.store.get_note(entry.plant_info.user_plant_id);
            if !note.trim().is_empty() {
                entry.plant_info.notes = Some(note);
            }
        }
        self.upcoming = upcoming_from_garden(&garden);
        self.garden = Some(garden);
    }

    pub fn upcoming(&self) -> &[UpcomingTask] {
        &self.upcoming
    }

    pub fn set_upcoming(&mut self, tasks: Vec<UpcomingTask>) {
        self.upcoming = tasks;
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn set_challenges(&mut self, challenges: Vec<Challenge>) {
        self.challenges = challenges;
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn set_leaderboard(&mut self, leaderboard: Vec<LeaderboardEntry>) {
        self.leaderboard = leaderboard;
    }

    pub fn stats(&self) -> UserStats {
        self.stats
    }

    pub fn set_stats(&mut self, stats: UserStats) {
        self.stats = stats;
    }

    /// Store fresh stats and raise the popup when the badge count grew
    pub fn apply_achievement_check(&mut self, fresh: UserStats) -> Option<Achievement> {
        let previous = self.stats.badges;
        self.stats = fresh;
        if fresh.badges <= previous {
            return None;
        }
        let achievement = Achievement {
            new_badges: fresh.badges - previous,
            total_badges: fresh.badges,
            points: fresh.points,
            level: fresh.level,
        };
        tracing::info!(badges = fresh.badges, "achievement unlocked");
        self.achievement = Some(achievement);
        Some(achievement)
    }

    pub fn achievement(&self) -> Option<Achievement> {
        self.achievement
    }

    pub fn close_achievement(&mut self) {
        self.achievement = None;
    }

    // ========================
    // Calendar
    // ========================

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn change_month(&mut self, delta: i32) -> CalendarMonth {
        self.month = self.month.shifted(delta);
        self.month
    }

    /// Build the displayed month's CSV and hand it to `save`; the toast
    /// reports whether saving worked
    pub fn export_calendar<E: std::fmt::Display>(
        &mut self,
        now: DateTime<Utc>,
        save: impl FnOnce(&CsvExport) -> std::result::Result<(), E>,
    ) -> bool {
        let export = export_month(self.month, &self.upcoming);
        match save(&export) {
            Ok(()) => {
                tracing::info!(file = %export.filename, "calendar exported");
                self.toast(ToastKind::Success, "📅 Calendar exported successfully!", now);
                true
            }
            Err(e) => {
                tracing::error!(file = %export.filename, error = %e, "calendar export failed");
                self.toast(ToastKind::Error, "❌ Failed to export calendar", now);
                false
            }
        }
    }

    // ========================
    // Toasts
    // ========================

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.visible()
    }

    /// Show a toast that dismisses itself after the toast lifetime
    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) -> ToastId {
        let id = self.toasts.push(kind, message);
        let timer = self
            .scheduler
            .after(now, toast_lifetime(), TimerJob::DismissToast(id));
        self.toast_timers.insert(id, timer);
        id
    }

    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        if let Some(timer) = self.toast_timers.remove(&id) {
            self.scheduler.cancel(timer);
        }
        self.toasts.dismiss(id)
    }

    // ========================
    // Timers & reminders
    // ========================

    pub fn scheduler(&self) -> &TimerScheduler {
        &self.scheduler
    }

    pub fn next_timer_due(&self) -> Option<DateTime<Utc>> {
        self.scheduler.next_due()
    }

    /// Run every job that is due. Toast dismissal is handled here; the rest
    /// is returned for the host.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> Vec<TimerOutcome> {
        let mut outcomes = Vec::new();
        for task in self.scheduler.take_due(now) {
            match task.job {
                TimerJob::DismissToast(id) => {
                    self.toast_timers.remove(&id);
                    self.toasts.dismiss(id);
                }
                TimerJob::Reminder(id) => {
                    self.reminder_timers.remove(&id);
                    let Some(record) = self.store.get(id).filter(ReminderRecord::is_pending) else {
                        tracing::debug!(reminder = id.0, "reminder gone before firing");
                        continue;
                    };
                    if let Err(e) = self.store.mark_fired(id) {
                        tracing::warn!(reminder = id.0, error = %e, "could not mark reminder fired");
                    }
                    outcomes.push(TimerOutcome::Notify(BrowserNotification::for_reminder(&record)));
                }
                TimerJob::DemoNotification { title, body } => {
                    outcomes.push(TimerOutcome::Notify(BrowserNotification {
                        title,
                        body,
                        tag: None,
                    }));
                }
                TimerJob::CheckAchievements => outcomes.push(TimerOutcome::CheckAchievements),
            }
        }
        outcomes
    }

    pub fn schedule_achievement_check(&mut self, now: DateTime<Utc>) -> TaskId {
        self.scheduler.after(
            now,
            Duration::seconds(ACHIEVEMENT_DELAY_SECS),
            TimerJob::CheckAchievements,
        )
    }

    fn arm_reminder(&mut self, record: &ReminderRecord) {
        let timer = self
            .scheduler
            .at(record.scheduled_for, TimerJob::Reminder(record.id));
        self.reminder_timers.insert(record.id, timer);
    }

    /// Persist a reminder from a finished wizard and arm its timer.
    /// Replaces any pending reminder for the same plant and task.
    pub fn set_reminder(
        &mut self,
        draft: &Draft<ReminderKind>,
        user_plant_id: u32,
        plant_name: &str,
        now: DateTime<Utc>,
    ) -> Result<ReminderRecord> {
        let id = self.store.next_id(now);
        let record = draft.to_record(id, user_plant_id, plant_name, now);
        if let Some(old) = self.store.append(record.clone())? {
            if let Some(timer) = self.reminder_timers.remove(&old.id) {
                self.scheduler.cancel(timer);
            }
        }
        self.arm_reminder(&record);

        self.toast(
            ToastKind::Success,
            format!(
                "🔔 Reminder set for {}! You'll be notified to {} on {}",
                plant_name,
                record.action,
                record.scheduled_for.format("%-m/%-d/%Y at %H:%M UTC")
            ),
            now,
        );
        self.scheduler.after(
            now,
            Duration::seconds(DEMO_DELAY_SECS),
            TimerJob::DemoNotification {
                title: "🌱 FloraFind Demo Reminder".to_string(),
                body: format!(
                    "This is how your reminder for {} {} will look!",
                    record.action, plant_name
                ),
            },
        );
        tracing::info!(reminder = record.id.0, plant = user_plant_id, due = %record.scheduled_for, "reminder set");
        Ok(record)
    }

    /// Confirmation once notifications are allowed, plus a sample notification
    pub fn enable_reminders(&mut self, now: DateTime<Utc>) {
        self.toast(
            ToastKind::Success,
            "🔔 Reminders set up! You will be notified about plant care tasks.",
            now,
        );
        self.scheduler.after(
            now,
            Duration::seconds(SETUP_DEMO_DELAY_SECS),
            TimerJob::DemoNotification {
                title: "🌱 FloraFind Reminder".to_string(),
                body: "Time to water your Rose Bush!".to_string(),
            },
        );
    }

    /// Re-arm persisted reminders after a reload. Reminders that came due
    /// while the page was closed are returned for immediate display.
    pub fn restore_reminders(&mut self, now: DateTime<Utc>) -> Result<Vec<BrowserNotification>> {
        let reconciled = self.store.reconcile(now)?;
        for record in &reconciled.upcoming {
            if !self.reminder_timers.contains_key(&record.id) {
                self.arm_reminder(record);
            }
        }
        let pruned = self.store.prune_fired()?;
        if pruned > 0 {
            tracing::debug!(pruned, "dropped fired reminders");
        }
        Ok(reconciled
            .overdue
            .iter()
            .map(BrowserNotification::for_reminder)
            .collect())
    }

    /// Reminders still waiting to fire, soonest first
    pub fn pending_reminders(&self) -> Vec<ReminderRecord> {
        let mut pending: Vec<ReminderRecord> =
            self.store.list().into_iter().filter(|r| r.is_pending()).collect();
        pending.sort_by_key(|r| r.scheduled_for);
        pending
    }

    pub fn cancel_reminder(&mut self, id: ReminderId, now: DateTime<Utc>) -> Result<bool> {
        if let Some(timer) = self.reminder_timers.remove(&id) {
            self.scheduler.cancel(timer);
        }
        let Some(removed) = self.store.remove(id)? else {
            return Ok(false);
        };
        tracing::info!(reminder = removed.id.0, "reminder cancelled");
        self.toast(
            ToastKind::Info,
            format!("🔕 Reminder to {} {} cancelled", removed.action, removed.plant_name),
            now,
        );
        Ok(true)
    }

    // ========================
    // Notes
    // ========================

    pub fn note(&self, user_plant_id: u32) -> String {
        self.store.get_note(user_plant_id)
    }

    pub fn save_note(
        &mut self,
        user_plant_id: u32,
        plant_name: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.store.set_note(user_plant_id, text)?;
        let cleared = text.trim().is_empty();
        if let Some(garden) = &mut self.garden {
            if let Some(entry) = garden
                .garden
                .iter_mut()
                .find(|e| e.plant_info.user_plant_id == user_plant_id)
            {
                entry.plant_info.notes = (!cleared).then(|| text.to_string());
            }
        }
        if cleared {
            self.toast(ToastKind::Info, format!("📝 Notes cleared for {}!", plant_name), now);
        } else {
            self.toast(ToastKind::Success, format!("📝 Notes updated for {}!", plant_name), now);
        }
        Ok(())
    }
}
