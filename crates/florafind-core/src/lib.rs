//! FloraFind client core
//!
//! Everything the FloraFind web client does that does not need a browser:
//! backend bindings, markup rendering, section state, stale-response guards,
//! timers, local reminder records and the application session.

pub mod calendar;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod flows;
pub mod guard;
pub mod models;
pub mod permission;
pub mod render;
pub mod scheduler;
pub mod section;
pub mod session;
pub mod storage;
pub mod toast;
pub mod wizard;

pub use client::{Backend, FloraClient};
pub use config::ClientConfig;
pub use error::{ClientError, Error, Result};
pub use flows::SessionHandle;
pub use section::Section;
pub use session::AppSession;
