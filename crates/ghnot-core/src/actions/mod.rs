//! Named, polymorphic actions run against one notification at a time.
//!
//! An action may mutate the notification in place, call back to the remote,
//! and writes a one-line description of what it did to the output sink.
//! A failing action keeps whatever mutation it made before failing.

mod local;
mod open;
mod remote;

pub use local::{DebugAction, HideAction, PassAction, PrintAction, TagAction};
pub use open::{open_in_browser, OpenAction};
pub use remote::{AssignAction, DoneAction, ReadAction};

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use crate::error::ActionError;
use crate::models::Notification;
use crate::remote::RemoteSource;

pub trait Action: Send + Sync {
    fn run(
        &self,
        notification: &mut Notification,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), ActionError>;
}

/// `name -> action` table built once at startup.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard catalog; remote-backed actions share `remote`.
    pub fn standard(remote: Arc<dyn RemoteSource>) -> Self {
        let mut registry = Self::new();
        registry.register("pass", PassAction);
        registry.register("debug", DebugAction);
        registry.register("print", PrintAction);
        registry.register("hide", HideAction);
        registry.register("tag", TagAction);
        registry.register("read", ReadAction::new(remote.clone()));
        registry.register("done", DoneAction::new(remote.clone()));
        registry.register("assign", AssignAction::new(remote));
        registry.register("open", OpenAction::default());
        registry
    }

    /// Add or replace an action.
    pub fn register(&mut self, name: impl Into<String>, action: impl Action + 'static) {
        self.actions.insert(name.into(), Box::new(action));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }
}

/// Short human description used in action output lines.
pub(crate) fn describe(notification: &Notification) -> String {
    format!(
        "{} {} ({})",
        notification.repository.full_name, notification.subject.title, notification.id
    )
}
