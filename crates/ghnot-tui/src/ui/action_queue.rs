// FIFO queue of notifications waiting for an action.
// Exactly one notification is in flight at a time; the next one is only
// handed out after the previous result has been merged back.

use std::collections::VecDeque;

use ghnot_core::{ActionRegistry, Notification};

/// One unit of work handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub id: String,
    pub action: String,
    pub args: Vec<String>,
}

/// Result of running one [`Dispatch`], sent back to the event loop.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub id: String,
    pub notification: Notification,
    pub output: String,
    pub error: Option<String>,
}

/// Run a dispatched action on a copy of the notification. Blocks on remote
/// calls, so the event loop runs this on a blocking task.
pub fn execute(registry: &ActionRegistry, dispatch: Dispatch, mut notification: Notification) -> ActionOutcome {
    let mut out = Vec::new();
    let error = match registry.get(&dispatch.action) {
        Some(action) => action
            .run(&mut notification, &dispatch.args, &mut out)
            .err()
            .map(|e| e.to_string()),
        None => Some(format!("unknown action {:?}", dispatch.action)),
    };
    if let Some(e) = &error {
        tracing::warn!("{} failed on {}: {}", dispatch.action, dispatch.id, e);
    }
    ActionOutcome {
        id: dispatch.id,
        notification,
        output: String::from_utf8_lossy(&out).into_owned(),
        error,
    }
}

#[derive(Debug, Default)]
pub struct ActionQueue {
    action: String,
    args: Vec<String>,
    pending: VecDeque<String>,
    in_flight: Option<String>,
    completed: usize,
    total: usize,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `ids` for `action`. Refused while a previous batch is still
    /// running.
    pub fn start(&mut self, action: &str, args: Vec<String>, ids: Vec<String>) -> bool {
        if self.is_busy() {
            return false;
        }
        self.action = action.to_string();
        self.args = args;
        self.total = ids.len();
        self.completed = 0;
        self.pending = ids.into();
        true
    }

    /// Next notification to run, if nothing is in flight.
    pub fn next(&mut self) -> Option<Dispatch> {
        if self.in_flight.is_some() {
            return None;
        }
        let id = self.pending.pop_front()?;
        self.in_flight = Some(id.clone());
        Some(Dispatch {
            id,
            action: self.action.clone(),
            args: self.args.clone(),
        })
    }

    /// Mark the in-flight notification finished. Returns false for a stray id.
    pub fn complete(&mut self, id: &str) -> bool {
        if self.in_flight.as_deref() != Some(id) {
            return false;
        }
        self.in_flight = None;
        self.completed += 1;
        true
    }

    /// Drop everything not yet dispatched; returns how many were dropped.
    /// A result already in flight still arrives and is merged.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.total -= dropped;
        dropped
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || !self.pending.is_empty()
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// `(completed, total)` for the current batch.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed, self.total)
    }
}
