//! Timer Driver
//!
//! The session's scheduler decides what is due; this keeps exactly one
//! browser timeout armed for the earliest job.

use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Browsers overflow `setTimeout` delays past 2^31-1 ms
const MAX_DELAY_MS: i64 = 24 * 60 * 60 * 1000;

pub fn delay_ms(due: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    (due - now).num_milliseconds().clamp(0, MAX_DELAY_MS) as u32
}

#[derive(Clone, Copy)]
pub struct TimerDriver {
    armed: StoredValue<Option<Timeout>, LocalStorage>,
}

impl TimerDriver {
    pub fn new() -> Self {
        Self {
            armed: StoredValue::new_local(None),
        }
    }

    /// Replace the armed timeout; `None` disarms. Dropping the previous
    /// timeout clears it.
    pub fn arm(&self, due: Option<DateTime<Utc>>, on_fire: impl FnOnce() + 'static) {
        let timeout = due.map(|due| {
            let delay = delay_ms(due, Utc::now());
            tracing::debug!(delay_ms = delay, "arming timer");
            Timeout::new(delay, on_fire)
        });
        self.armed.set_value(timeout);
    }
}
