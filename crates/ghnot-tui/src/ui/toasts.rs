// Status-bar toasts with priorities and auto-dismiss.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Higher = more important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub duration: Duration,
    pub shown_at: Option<Instant>,
}

impl Toast {
    fn new(message: impl Into<String>, level: ToastLevel, secs: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration: Duration::from_secs(secs),
            shown_at: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info, 3)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success, 3)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Warning, 4)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error, 5)
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at
            .map(|shown| shown.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    fn mark_shown(&mut self) {
        if self.shown_at.is_none() {
            self.shown_at = Some(Instant::now());
        }
    }
}

/// One toast is visible at a time; a more severe toast replaces the current
/// one, the rest wait in priority order.
#[derive(Debug, Default)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
    current: Option<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        let same_as_current = self
            .current
            .as_ref()
            .map(|c| c.message == toast.message)
            .unwrap_or(false);
        if same_as_current || self.queue.iter().any(|t| t.message == toast.message) {
            return;
        }

        match &self.current {
            None => {
                let mut toast = toast;
                toast.mark_shown();
                self.current = Some(toast);
            }
            Some(current) if toast.level > current.level => {
                let mut toast = toast;
                toast.mark_shown();
                self.current = Some(toast);
            }
            Some(_) => {
                let pos = self
                    .queue
                    .iter()
                    .position(|t| t.level < toast.level)
                    .unwrap_or(self.queue.len());
                self.queue.insert(pos, toast);
            }
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.advance();
    }

    /// Advance past an expired toast
    pub fn tick(&mut self) {
        if self.current.as_ref().map(Toast::is_expired).unwrap_or(false) {
            self.current = None;
            self.advance();
        }
    }

    fn advance(&mut self) {
        if self.current.is_none() {
            if let Some(mut next) = self.queue.pop_front() {
                next.mark_shown();
                self.current = Some(next);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }
}
