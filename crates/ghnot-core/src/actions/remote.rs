//! Actions that call back to the notification API.

use std::io::Write;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::json;

use super::{describe, Action};
use crate::error::{ActionError, RemoteError};
use crate::models::Notification;
use crate::remote::{Method, RemoteResponse, RemoteSource};

fn check(method: &Method, url: &str, response: RemoteResponse) -> Result<(), RemoteError> {
    if response.is_success() {
        return Ok(());
    }
    Err(RemoteError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: response.status,
        body: response.body,
    })
}

fn thread_url(n: &Notification) -> Result<&str, ActionError> {
    if n.url.is_empty() {
        return Err(ActionError::MissingUrl {
            id: n.id.clone(),
            what: "thread URL",
        });
    }
    Ok(&n.url)
}

/// Marks the thread as read.
pub struct ReadAction {
    remote: Arc<dyn RemoteSource>,
}

impl ReadAction {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self { remote }
    }
}

impl Action for ReadAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        let url = thread_url(n)?;
        // 205 Reset Content comes back with no body
        match self.remote.do_request(Method::PATCH, url, None) {
            Ok(_) | Err(RemoteError::EmptyBody) => {}
            Err(e) => return Err(e.into()),
        }
        n.unread = false;
        writeln!(out, "marked as read: {}", describe(n))?;
        Ok(())
    }
}

/// Marks the thread as done, which removes it from the remote inbox.
pub struct DoneAction {
    remote: Arc<dyn RemoteSource>,
}

impl DoneAction {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self { remote }
    }
}

impl Action for DoneAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        let url = thread_url(n)?;
        let response = self.remote.request(Method::DELETE, url, None)?;
        check(&Method::DELETE, url, response)?;
        n.meta.done = true;
        writeln!(out, "marked as done: {}", describe(n))?;
        Ok(())
    }
}

static SUBJECT_URL: OnceLock<Regex> = OnceLock::new();

fn subject_url_regex() -> &'static Regex {
    SUBJECT_URL.get_or_init(|| {
        Regex::new(
            r"^(?P<base>.+)/repos/(?P<owner>[^/]+)/(?P<repo>[^/]+)/(?:issues|pulls)/(?P<number>\d+)$",
        )
        .expect("subject URL pattern is valid")
    })
}

/// Issue-assignees endpoint for an issue or pull request subject URL.
fn assignees_url(subject_url: &str) -> Option<String> {
    let caps = subject_url_regex().captures(subject_url)?;
    Some(format!(
        "{}/repos/{}/{}/issues/{}/assignees",
        &caps["base"], &caps["owner"], &caps["repo"], &caps["number"]
    ))
}

/// Assigns the given users to the subject issue or pull request.
pub struct AssignAction {
    remote: Arc<dyn RemoteSource>,
}

impl AssignAction {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self { remote }
    }
}

impl Action for AssignAction {
    fn run(&self, n: &mut Notification, args: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        if args.is_empty() {
            return Err(ActionError::NoAssignees);
        }

        let subject_url = n.subject.url.as_deref().unwrap_or_default();
        let Some(url) = assignees_url(subject_url) else {
            tracing::warn!(
                "assign: {} is not an issue or pull request, skipping",
                describe(n)
            );
            writeln!(out, "not assignable: {}", describe(n))?;
            return Ok(());
        };

        let body = json!({ "assignees": args });
        let response = self.remote.request(Method::POST, &url, Some(&body))?;
        check(&Method::POST, &url, response)?;
        writeln!(out, "assigned {}: {}", args.join(", "), describe(n))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::fixtures::notification;
    use crate::remote::mock::MockRemote;
    use crate::remote::RemoteResponse;

    fn setup() -> (Arc<MockRemote>, Notification) {
        (
            Arc::new(MockRemote::default()),
            notification("7", "org/repo", "review_requested"),
        )
    }

    #[test]
    fn test_read_tolerates_empty_body() {
        let (remote, mut n) = setup();
        remote.push_do(Err(RemoteError::EmptyBody));
        let mut out = Vec::new();

        ReadAction::new(remote.clone()).run(&mut n, &[], &mut out).unwrap();

        assert!(!n.unread);
        let calls = remote.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "PATCH");
        assert_eq!(calls[0].1, "https://api.github.com/notifications/threads/7");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "marked as read: org/repo Subject 7 (7)\n"
        );
    }

    #[test]
    fn test_read_propagates_other_errors() {
        let (remote, mut n) = setup();
        remote.push_do(Err(RemoteError::Status {
            method: "PATCH".into(),
            url: n.url.clone(),
            status: 500,
            body: "boom".into(),
        }));

        let err = ReadAction::new(remote).run(&mut n, &[], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ActionError::Remote(RemoteError::Status { status: 500, .. })));
        assert!(n.unread);
    }

    #[test]
    fn test_read_without_thread_url() {
        let (remote, mut n) = setup();
        n.url.clear();
        let err = ReadAction::new(remote.clone()).run(&mut n, &[], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ActionError::MissingUrl { .. }));
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn test_done_sets_meta() {
        let (remote, mut n) = setup();
        DoneAction::new(remote.clone()).run(&mut n, &[], &mut Vec::new()).unwrap();

        assert!(n.meta.done);
        assert_eq!(remote.calls()[0].0, "DELETE");
    }

    #[test]
    fn test_done_rejects_non_success_status() {
        let (remote, mut n) = setup();
        remote.push_request(Ok(RemoteResponse {
            status: 403,
            body: "forbidden".into(),
        }));

        let err = DoneAction::new(remote).run(&mut n, &[], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ActionError::Remote(RemoteError::Status { status: 403, .. })));
        assert!(!n.meta.done);
    }

    #[test]
    fn test_assign_requires_assignees() {
        let (remote, mut n) = setup();
        let err = AssignAction::new(remote.clone()).run(&mut n, &[], &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "no assignees provided");
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn test_assign_posts_to_issue_assignees() {
        let (remote, mut n) = setup();
        n.subject.url = Some("https://api.github.com/repos/org/repo/pulls/42".into());
        let args = vec!["alice".to_string(), "bob".to_string()];
        let mut out = Vec::new();

        AssignAction::new(remote.clone()).run(&mut n, &args, &mut out).unwrap();

        let calls = remote.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "POST");
        assert_eq!(calls[0].1, "https://api.github.com/repos/org/repo/issues/42/assignees");
        assert_eq!(calls[0].2, Some(json!({ "assignees": ["alice", "bob"] })));
        assert!(String::from_utf8(out).unwrap().starts_with("assigned alice, bob:"));
    }

    #[test]
    fn test_assign_skips_non_issue_subjects() {
        let (remote, mut n) = setup();
        n.subject.url = Some("https://api.github.com/repos/org/repo/releases/1".into());
        let args = vec!["alice".to_string()];

        AssignAction::new(remote.clone()).run(&mut n, &args, &mut Vec::new()).unwrap();
        assert!(remote.calls().is_empty());

        n.subject.url = None;
        AssignAction::new(remote.clone()).run(&mut n, &args, &mut Vec::new()).unwrap();
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn test_assignees_url_keeps_enterprise_base() {
        assert_eq!(
            assignees_url("https://ghe.example.com/api/v3/repos/o/r/issues/3").as_deref(),
            Some("https://ghe.example.com/api/v3/repos/o/r/issues/3/assignees")
        );
        assert_eq!(assignees_url("https://api.github.com/repos/o/r/issues/x"), None);
    }
}
