//! User-facing flows
//!
//! Each flow runs a backend call between two short synchronous touches of
//! the session. The session is never borrowed across an `.await`.

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::RefCell;

use crate::calendar::upcoming_from_garden;
use crate::chat::ChatMessage;
use crate::client::{AddToGardenArgs, Backend, TipArgs};
use crate::error::ClientError;
use crate::guard::RenderTarget;
use crate::render::{render_care_calendar, render_location_suggestions};
use crate::section::{ReloadIntent, Section};
use crate::session::{AppSession, BrowserNotification, TimerOutcome, ACHIEVEMENT_POINTS};
use crate::storage::KeyValueStore;
use crate::toast::ToastKind;
use crate::wizard::{CareTaskKind, Draft};

/// Shared access to the session from async code
pub trait SessionHandle {
    type Store: KeyValueStore;

    fn with<R>(&self, f: impl FnOnce(&mut AppSession<Self::Store>) -> R) -> R;
}

impl<S: KeyValueStore> SessionHandle for RefCell<AppSession<S>> {
    type Store = S;

    fn with<R>(&self, f: impl FnOnce(&mut AppSession<S>) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn report<H: SessionHandle>(session: &H, action: &str, err: &ClientError, message: &str) {
    tracing::error!(action, kind = err.kind(), error = %err, "backend call failed");
    session.with(|s| s.toast(ToastKind::Error, message, now()));
}

// ========================
// Chat
// ========================

pub async fn send_message<H, B>(session: &H, backend: &B, text: &str)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let (ticket, location) = session.with(|s| {
        s.push_chat(ChatMessage::user(text));
        s.clear_suggestions();
        s.set_typing(true);
        (s.begin(RenderTarget::ChatLog), s.location().map(str::to_string))
    });

    let result = backend.query(text, location.as_deref()).await;

    session.with(|s| {
        s.set_typing(false);
        if !s.accept(&ticket) {
            return;
        }
        match result {
            Ok(reply) => s.apply_reply(&reply),
            Err(ClientError::Backend(msg)) => s.push_chat(ChatMessage::backend_error(&msg)),
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "query failed");
                s.push_chat(ChatMessage::connection_error());
            }
        }
    });
}

/// Switch to chat, then ask a canned question
pub async fn quick_query<H, B>(session: &H, backend: &B, query: &str)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    show_section(session, backend, Section::Chat.as_str()).await;
    send_message(session, backend, query).await;
}

pub async fn show_care_calendar<H, B>(session: &H, backend: &B, plant_id: u32)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let (ticket, location) = session.with(|s| {
        (s.begin(RenderTarget::ChatLog), s.location().map(str::to_string))
    });
    match backend.care_calendar(plant_id, location.as_deref()).await {
        Ok(schedule) => session.with(|s| {
            if s.accept(&ticket) {
                s.push_chat(ChatMessage::bot(render_care_calendar(&schedule, Some(plant_id))));
            }
        }),
        Err(e @ ClientError::Backend(_)) => report(session, "care_calendar", &e, "Plant not found"),
        Err(e) => report(session, "care_calendar", &e, "Error loading care calendar"),
    }
}

pub async fn location_suggestions<H, B>(session: &H, backend: &B, city: Option<&str>)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let (ticket, city) = session.with(|s| (s.begin(RenderTarget::ChatLog), s.resolve_city(city)));
    match backend.location_suggestions(&city).await {
        Ok(data) => session.with(|s| {
            if s.accept(&ticket) {
                s.push_chat(ChatMessage::bot(render_location_suggestions(&data)));
            }
        }),
        Err(e) => report(session, "location_suggestions", &e, "Error getting location-based suggestions"),
    }
}

// ========================
// Sections & reloads
// ========================

/// Returns false for an unknown section, which is otherwise ignored
pub async fn show_section<H, B>(session: &H, backend: &B, name: &str) -> bool
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let activation = match session.with(|s| s.show_section(name)) {
        Ok(activation) => activation,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring navigation");
            return false;
        }
    };
    for intent in activation.reloads {
        reload(session, backend, intent).await;
    }
    true
}

pub async fn reload<H, B>(session: &H, backend: &B, intent: ReloadIntent)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    match intent {
        ReloadIntent::Garden => load_garden(session, backend).await,
        ReloadIntent::Challenges => load_challenges(session, backend).await,
        ReloadIntent::Leaderboard => load_leaderboard(session, backend).await,
        ReloadIntent::UpcomingTasks => load_upcoming_tasks(session, backend).await,
    }
}

pub async fn load_garden<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let ticket = session.with(|s| s.begin(RenderTarget::Garden));
    match backend.my_garden().await {
        Ok(garden) => session.with(|s| {
            if s.accept(&ticket) {
                s.set_garden(garden);
            }
        }),
        Err(e) => report(session, "my_garden", &e, "Error loading garden"),
    }
}

pub async fn load_upcoming_tasks<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let ticket = session.with(|s| s.begin(RenderTarget::UpcomingTasks));
    match backend.my_garden().await {
        Ok(garden) => session.with(|s| {
            if s.accept(&ticket) {
                s.set_upcoming(upcoming_from_garden(&garden));
            }
        }),
        Err(e) => report(session, "upcoming_tasks", &e, "Error loading upcoming tasks"),
    }
}

/// Failures leave the list empty so the fallback markup shows
pub async fn load_challenges<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let ticket = session.with(|s| s.begin(RenderTarget::Challenges));
    let challenges = backend.challenges().await.unwrap_or_else(|e| {
        tracing::error!(kind = e.kind(), error = %e, "loading challenges failed");
        Vec::new()
    });
    session.with(|s| {
        if s.accept(&ticket) {
            s.set_challenges(challenges);
        }
    });
}

pub async fn load_leaderboard<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let ticket = session.with(|s| s.begin(RenderTarget::Leaderboard));
    let leaderboard = backend.leaderboard().await.unwrap_or_else(|e| {
        tracing::error!(kind = e.kind(), error = %e, "loading leaderboard failed");
        Vec::new()
    });
    session.with(|s| {
        if s.accept(&ticket) {
            s.set_leaderboard(leaderboard);
        }
    });
}

pub async fn load_user_stats<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let ticket = session.with(|s| s.begin(RenderTarget::Stats));
    match backend.user_stats().await {
        Ok(stats) => session.with(|s| {
            if s.accept(&ticket) {
                s.set_stats(stats);
            }
        }),
        Err(e) => tracing::error!(kind = e.kind(), error = %e, "loading user stats failed"),
    }
}

// ========================
// Garden actions
// ========================

pub async fn add_to_garden<H, B>(session: &H, backend: &B, plant_id: u32, name: &str, today: NaiveDate)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let args = AddToGardenArgs {
        plant_id,
        nickname: name.to_string(),
        location: "garden".to_string(),
        date_planted: today.format("%Y-%m-%d").to_string(),
    };
    match backend.add_to_garden(&args).await {
        Ok(resp) if resp.success => {
            session.with(|s| s.toast(ToastKind::Success, format!("🌱 {} added to your garden!", name), now()));
            load_user_stats(session, backend).await;
        }
        Ok(_) => {
            session.with(|s| s.toast(ToastKind::Error, "Failed to add plant to garden", now()));
        }
        Err(e) => report(session, "add_to_garden", &e, "Error adding plant to garden"),
    }
}

pub async fn complete_task<H, B>(session: &H, backend: &B, user_plant_id: u32, task: &str)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    match backend.complete_care_task(user_plant_id, task).await {
        Ok(resp) if resp.success => {
            session.with(|s| {
                s.toast(ToastKind::Success, resp.message.clone(), now());
                if resp.points_earned >= ACHIEVEMENT_POINTS {
                    s.schedule_achievement_check(now());
                }
            });
            load_garden(session, backend).await;
            load_user_stats(session, backend).await;
            let refresh_calendar = session.with(|s| s.active_section() == Section::Calendar);
            if refresh_calendar {
                load_upcoming_tasks(session, backend).await;
            }
        }
        Ok(_) => {
            session.with(|s| s.toast(ToastKind::Error, "Failed to complete task", now()));
        }
        Err(e) => report(session, "complete_care_task", &e, "Error completing task"),
    }
}

/// Re-read stats and raise the popup when a badge was earned
pub async fn check_achievements<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    match backend.user_stats().await {
        Ok(stats) => {
            session.with(|s| s.apply_achievement_check(stats));
        }
        Err(e) => tracing::error!(kind = e.kind(), error = %e, "achievement check failed"),
    }
}

pub async fn add_care_task<H, B>(
    session: &H,
    backend: &B,
    user_plant_id: u32,
    draft: &Draft<CareTaskKind>,
) where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let task_type = draft.task_type();
    match backend.add_care_task(user_plant_id, &task_type, draft.days).await {
        Ok(resp) if resp.success => {
            session.with(|s| s.toast(ToastKind::Success, format!("✅ {}", resp.message), now()));
            load_garden(session, backend).await;
        }
        Ok(_) => {
            session.with(|s| s.toast(ToastKind::Error, "❌ Failed to add care task", now()));
        }
        Err(e) => report(session, "add_care_task", &e, "❌ Error adding care task"),
    }
}

/// Returns true when the tip was accepted and the form can be cleared
pub async fn submit_tip<H, B>(session: &H, backend: &B, tip: &TipArgs) -> bool
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    match backend.submit_tip(tip).await {
        Ok(resp) if resp.success => {
            session.with(|s| s.toast(ToastKind::Success, resp.message.clone(), now()));
            true
        }
        Ok(_) => {
            session.with(|s| s.toast(ToastKind::Error, "Failed to submit tip", now()));
            false
        }
        Err(e) => {
            report(session, "submit_tip", &e, "Error submitting tip");
            false
        }
    }
}

// ========================
// Timers
// ========================

/// Fire due timers. Notifications are returned for the host to display.
pub async fn run_timers<H, B>(session: &H, backend: &B, at: DateTime<Utc>) -> Vec<BrowserNotification>
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    let outcomes = session.with(|s| s.fire_due(at));
    let mut notifications = Vec::new();
    for outcome in outcomes {
        match outcome {
            TimerOutcome::Notify(n) => notifications.push(n),
            TimerOutcome::CheckAchievements => check_achievements(session, backend).await,
        }
    }
    notifications
}

/// Initial page load: stats, garden and community data
pub async fn startup<H, B>(session: &H, backend: &B)
where
    H: SessionHandle,
    B: Backend + ?Sized,
{
    load_user_stats(session, backend).await;
    load_garden(session, backend).await;
    load_challenges(session, backend).await;
    load_leaderboard(session, backend).await;
}
