//! Toasts
//!
//! Transient in-page notifications. Each one is dismissed by a scheduler job
//! after [`toast_lifetime`] unless the user closes it first.

use chrono::Duration;

pub const TOAST_LIFETIME_SECS: i64 = 5;

pub fn toast_lifetime() -> Duration {
    Duration::seconds(TOAST_LIFETIME_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "notification info",
            ToastKind::Success => "notification success",
            ToastKind::Error => "notification error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct ToastStack {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Oldest first
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut stack = ToastStack::new();
        let a = stack.push(ToastKind::Success, "🌱 Tulsi added to your garden!");
        let b = stack.push(ToastKind::Error, "Error loading garden");
        assert_ne!(a, b);
        assert!(stack.dismiss(a));
        assert!(!stack.dismiss(a));
        assert_eq!(stack.visible().len(), 1);
        assert_eq!(stack.visible()[0].kind.class(), "notification error");
    }
}
