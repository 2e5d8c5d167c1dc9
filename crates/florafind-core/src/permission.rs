//! Browser notification permission gate.

pub const UNSUPPORTED: &str = "❌ This browser does not support notifications";
pub const DENIED: &str = "❌ Permission denied for notifications";
pub const BLOCKED: &str = "❌ Notifications are blocked. Please enable them in browser settings.";

/// Host notification permission as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Unsupported,
    Default,
    Granted,
    Denied,
}

impl Permission {
    /// Map the `Notification.permission` string
    pub fn from_host(value: Option<&str>) -> Self {
        match value {
            None => Permission::Unsupported,
            Some("granted") => Permission::Granted,
            Some("denied") => Permission::Denied,
            Some(_) => Permission::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    /// Ask the user, then call [`after_request`]
    Request,
    Refuse(&'static str),
}

pub fn gate(permission: Permission) -> Gate {
    match permission {
        Permission::Granted => Gate::Proceed,
        Permission::Default => Gate::Request,
        Permission::Denied => Gate::Refuse(BLOCKED),
        Permission::Unsupported => Gate::Refuse(UNSUPPORTED),
    }
}

/// Outcome once the permission prompt was answered
pub fn after_request(answer: Permission) -> Gate {
    match answer {
        Permission::Granted => Gate::Proceed,
        Permission::Unsupported => Gate::Refuse(UNSUPPORTED),
        Permission::Default | Permission::Denied => Gate::Refuse(DENIED),
    }
}
