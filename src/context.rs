//! Application Context
//!
//! The session, the backend client and the timer driver, shared with every
//! component via the Leptos Context API.

use std::future::Future;

use chrono::Utc;
use florafind_core::section::Section;
use florafind_core::toast::ToastKind;
use florafind_core::{flows, AppSession, ClientConfig, FloraClient, SessionHandle};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser::notify;
use crate::browser::storage::BrowserStore;
use crate::browser::timers::TimerDriver;

pub type Session = AppSession<BrowserStore>;

/// Defaults, overridden by `FLORAFIND_*` variables at build time
pub fn build_config() -> ClientConfig {
    let mut config = ClientConfig::default().with_overrides(
        option_env!("FLORAFIND_API_URL"),
        option_env!("FLORAFIND_USER_ID"),
    );
    if let Some(level) = option_env!("FLORAFIND_LOG_LEVEL") {
        config.log_level = level.to_string();
    }
    config
}

/// Reactive handle on the session
#[derive(Clone, Copy)]
pub struct SessionCtx(RwSignal<Session, LocalStorage>);

impl SessionCtx {
    /// Tracked read, for views and effects
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        self.0.with(f)
    }

    /// Untracked read, for event handlers
    pub fn peek<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        self.0.with_untracked(f)
    }
}

impl SessionHandle for SessionCtx {
    type Store = BrowserStore;

    fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.0.write();
        f(&mut session)
    }
}

#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: SessionCtx,
    client: StoredValue<FloraClient, LocalStorage>,
    timers: TimerDriver,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let session = AppSession::new(BrowserStore::open(), Utc::now().date_naive());
        Self {
            session: SessionCtx(RwSignal::new_local(session)),
            client: StoredValue::new_local(FloraClient::new(config)),
            timers: TimerDriver::new(),
        }
    }

    pub fn client(&self) -> FloraClient {
        self.client.get_value()
    }

    /// Run a flow on the local executor
    pub fn spawn<F, Fut>(self, flow: F)
    where
        F: FnOnce(SessionCtx, FloraClient) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(flow(self.session, self.client()));
    }

    pub fn section_class(&self, section: Section) -> &'static str {
        self.session.read(|s| s.sections().section_class(section))
    }

    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        self.session.with(|s| s.toast(kind, message, Utc::now()));
    }

    /// Keep one browser timeout armed for the scheduler's earliest job.
    /// Every session write re-runs this, so new jobs are picked up.
    pub fn drive_timers(self) {
        Effect::new(move |_| {
            let due = self.session.read(|s| s.next_timer_due());
            self.timers.arm(due, move || {
                self.spawn(|session, client| async move {
                    for notification in flows::run_timers(&session, &client, Utc::now()).await {
                        notify::show(&notification);
                    }
                });
            });
        });
    }

    /// Re-arm persisted reminders, then load the initial data
    pub fn start(self) {
        match self.session.with(|s| s.restore_reminders(Utc::now())) {
            Ok(overdue) => overdue.iter().for_each(notify::show),
            Err(e) => tracing::warn!(error = %e, "could not restore reminders"),
        }
        self.spawn(|session, client| async move {
            flows::startup(&session, &client).await;
        });
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
