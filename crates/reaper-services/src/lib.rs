//! In-process services shared by every Reaper front end.

pub mod activity;
pub mod notify;

pub use activity::{ActivityKind, ActivityRecord, ActivityTracker};
pub use notify::{NoticeEvent, Notifier, Severity, UserNotice};
