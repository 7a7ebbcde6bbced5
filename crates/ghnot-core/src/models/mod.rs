pub mod notification;
pub mod refresh;

pub use notification::{format_relative_time, Meta, Notification, Notifications, Repository, Subject, User};
pub use refresh::RefreshStrategy;
