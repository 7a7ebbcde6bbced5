//! Remote notification source.
//!
//! Calls are blocking: batch mode is a straight-line pipeline and the TUI
//! runs actions on a blocking task.

mod github;
#[cfg(test)]
pub(crate) mod mock;

pub use github::{parse_next_link, GithubClient};
pub use reqwest::Method;

use serde_json::Value;

use crate::error::RemoteError;
use crate::models::{Notification, Notifications, User};

/// Raw response for callers that inspect the status themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait RemoteSource: Send + Sync {
    /// Full current listing.
    fn list(&self) -> Result<Notifications, RemoteError>;

    /// Send a request and decode the JSON response. Non-2xx statuses are
    /// errors; an empty body is [`RemoteError::EmptyBody`].
    fn do_request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, RemoteError>;

    /// Send a request and hand back status and body without judging either.
    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<RemoteResponse, RemoteError>;

    /// Fill author, state and web URL from the notification's subject.
    fn enrich(&self, notification: &mut Notification) -> Result<(), RemoteError> {
        let Some(url) = notification.subject.url.clone() else {
            return Ok(());
        };
        let details = self.do_request(Method::GET, &url, None)?;
        apply_subject_details(notification, &details);
        Ok(())
    }
}

fn user_from_value(value: &Value) -> Option<User> {
    let login = value.get("login")?.as_str()?;
    Some(User {
        login: login.to_string(),
        kind: value["type"].as_str().unwrap_or_default().to_string(),
        html_url: value["html_url"].as_str().unwrap_or_default().to_string(),
    })
}

/// Copy the interesting bits of an issue/PR/release payload onto `notification`.
pub fn apply_subject_details(notification: &mut Notification, details: &Value) {
    if let Some(author) = user_from_value(&details["user"]).or_else(|| user_from_value(&details["author"])) {
        notification.author = Some(author);
    }

    let merged = details["merged"].as_bool().unwrap_or(false)
        || details["merged_at"].as_str().is_some();
    if merged {
        notification.subject.state = Some("merged".to_string());
    } else if let Some(state) = details["state"].as_str() {
        notification.subject.state = Some(state.to_string());
    }

    if let Some(html_url) = details["html_url"].as_str() {
        notification.subject.html_url = Some(html_url.to_string());
    }
}
