use std::collections::BTreeSet;
use std::sync::Arc;

use ghnot_core::filter::Query;
use ghnot_core::{ActionRegistry, Notification, Notifications};

use crate::ui::action_queue::{ActionOutcome, ActionQueue};
use crate::ui::toasts::{Toast, ToastQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a filter expression after `/`
    Filter,
    /// Typing `action args...` after `:`
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Info,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub kind: ResultKind,
    pub text: String,
}

pub struct App {
    pub running: bool,
    /// First Ctrl+C pressed; the second one quits
    pub pending_quit: bool,
    pub view: View,
    pub input_mode: InputMode,
    pub input: String,
    pub selected: usize,
    pub show_all: bool,
    pub results: Vec<ResultLine>,
    pub results_scroll: usize,
    pub toasts: ToastQueue,
    pub queue: ActionQueue,
    notifications: Notifications,
    /// Indices into `notifications` currently on screen
    visible: Vec<usize>,
    marked: BTreeSet<String>,
    filter: Option<Query>,
    registry: Arc<ActionRegistry>,
    quit_when_idle: bool,
    batch_failed: bool,
}

impl App {
    pub fn new(notifications: Notifications, registry: Arc<ActionRegistry>) -> Self {
        let mut app = Self {
            running: true,
            pending_quit: false,
            view: View::List,
            input_mode: InputMode::Normal,
            input: String::new(),
            selected: 0,
            show_all: false,
            results: Vec::new(),
            results_scroll: 0,
            toasts: ToastQueue::new(),
            queue: ActionQueue::new(),
            notifications,
            visible: Vec::new(),
            marked: BTreeSet::new(),
            filter: None,
            registry,
            quit_when_idle: false,
            batch_failed: false,
        };
        app.refresh_view();
        app
    }

    pub fn registry(&self) -> Arc<ActionRegistry> {
        self.registry.clone()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn into_notifications(self) -> Notifications {
        self.notifications
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.get(id)
    }

    /// Rows on screen, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible
            .iter()
            .map(move |&i| &self.notifications.as_slice()[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.visible
            .get(self.selected)
            .map(|&i| &self.notifications.as_slice()[i])
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.marked.contains(id)
    }

    pub fn marked_len(&self) -> usize {
        self.marked.len()
    }

    pub fn filter_source(&self) -> Option<&str> {
        self.filter.as_ref().map(Query::source)
    }

    /// Re-render display lines and recompute which rows are shown.
    pub fn refresh_view(&mut self) {
        self.notifications.render();

        let items = self.notifications.as_slice();
        let candidates: Vec<usize> = (0..items.len())
            .filter(|&i| self.show_all || (!items[i].meta.hidden && !items[i].meta.done))
            .collect();

        let selected = self.filter.as_ref().map(|q| q.select(items, &candidates));
        self.visible = match selected {
            None => candidates,
            Some(Ok(selected)) => selected,
            Some(Err(e)) => {
                self.toasts.push(Toast::error(format!("Filter failed: {}", e)));
                self.filter = None;
                candidates
            }
        };

        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn move_top(&mut self) {
        self.selected = 0;
    }

    pub fn move_bottom(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub fn toggle_mark(&mut self) {
        let Some(id) = self.current().map(|n| n.id.clone()) else {
            return;
        };
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
        self.move_down();
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.refresh_view();
    }

    /// Replace the filter; an empty expression clears it.
    pub fn apply_filter(&mut self, source: &str) {
        match Query::parse(source) {
            Ok(query) if query.is_identity() => self.filter = None,
            Ok(query) => self.filter = Some(query),
            Err(e) => {
                self.toasts.push(Toast::error(format!("Invalid filter: {}", e)));
                return;
            }
        }
        self.selected = 0;
        self.refresh_view();
    }

    /// Parse `action args...` from the command prompt and start it.
    pub fn run_command(&mut self, command: &str) {
        let mut words = command.split_whitespace();
        let Some(action) = words.next() else {
            return;
        };
        let args = words.map(str::to_string).collect();
        self.start_action(action, args);
    }

    /// Queue `action` for the marked notifications, or the current one when
    /// nothing is marked, and switch to the result view.
    pub fn start_action(&mut self, action: &str, args: Vec<String>) -> bool {
        if !self.registry.contains(action) {
            self.toasts.push(Toast::error(format!("Unknown action: {}", action)));
            return false;
        }

        let targets: Vec<String> = if self.marked.is_empty() {
            self.current().map(|n| n.id.clone()).into_iter().collect()
        } else {
            self.notifications
                .iter()
                .filter(|n| self.marked.contains(&n.id))
                .map(|n| n.id.clone())
                .collect()
        };
        if targets.is_empty() {
            self.toasts.push(Toast::warning("Nothing selected"));
            return false;
        }

        let count = targets.len();
        if !self.queue.start(action, args, targets) {
            self.toasts.push(Toast::warning("Another action is still running"));
            return false;
        }

        tracing::info!("queued {} for {} notifications", action, count);
        self.marked.clear();
        self.batch_failed = false;
        self.results.clear();
        self.results_scroll = 0;
        self.results.push(ResultLine {
            kind: ResultKind::Info,
            text: format!("Running {} on {} notification(s)", action, count),
        });
        self.view = View::Results;
        true
    }

    /// Merge a finished action back into the list.
    pub fn finish(&mut self, outcome: ActionOutcome) {
        if !self.queue.complete(&outcome.id) {
            tracing::warn!("ignoring result for {}: not in flight", outcome.id);
            return;
        }

        for line in outcome.output.lines().filter(|l| !l.is_empty()) {
            self.results.push(ResultLine {
                kind: ResultKind::Output,
                text: line.to_string(),
            });
        }
        if let Some(error) = outcome.error {
            self.results.push(ResultLine {
                kind: ResultKind::Error,
                text: format!("{}: {}", outcome.id, error),
            });
            self.toasts.push(Toast::error(error));
            self.batch_failed = true;
        }
        if !self.notifications.replace(outcome.notification) {
            tracing::warn!("result for unknown notification {}", outcome.id);
        }

        if !self.queue.is_busy() {
            let (completed, total) = self.queue.progress();
            self.results.push(ResultLine {
                kind: ResultKind::Info,
                text: format!("Finished {}/{}", completed, total),
            });
            if !self.batch_failed {
                self.toasts.push(Toast::success(format!(
                    "{} finished on {} notification(s)",
                    self.queue.action(),
                    completed
                )));
            }
            if self.quit_when_idle {
                self.running = false;
            }
        }
        self.refresh_view();
    }

    /// Leave the result view; anything not yet dispatched is dropped.
    pub fn dismiss_results(&mut self) {
        let dropped = self.queue.cancel();
        if dropped > 0 {
            self.toasts.push(Toast::warning(format!("Cancelled {} remaining", dropped)));
        }
        self.view = View::List;
    }

    pub fn scroll_results(&mut self, delta: isize) {
        let max = self.results.len().saturating_sub(1);
        self.results_scroll = self.results_scroll.saturating_add_signed(delta).min(max);
    }

    /// Stop the loop, first letting an in-flight action land.
    pub fn quit(&mut self) {
        self.queue.cancel();
        if self.queue.is_busy() {
            self.quit_when_idle = true;
            self.toasts.push(Toast::info("Waiting for the running action..."));
        } else {
            self.running = false;
        }
    }

    pub fn tick(&mut self) {
        self.toasts.tick();
    }
}
