use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One GitHub notification thread.
///
/// Field names follow the notifications API so that filter expressions
/// address the same paths as the raw payload (`.repository.full_name`,
/// `.subject.type`, ...). `meta` is never produced by the remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub reason: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub url: String,
    pub repository: Repository,
    pub subject: Subject,
    /// Filled in by enrichment; the list endpoint does not report it.
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub meta: Meta,
    /// Display line, recomputed by [`Notifications::render`] before showing.
    #[serde(skip)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub html_url: String,
    pub owner: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub html_url: String,
}

/// Local-only state. Remote refreshes never touch it except for `remote_exists`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub done: bool,
    pub hidden: bool,
    pub tags: Vec<String>,
    pub remote_exists: bool,
}

impl Meta {
    /// Sort tags ascending and drop duplicates.
    pub fn normalize_tags(&mut self) {
        self.tags.sort();
        self.tags.dedup();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Notification {
    /// Web page for this notification, falling back to the repository page.
    pub fn web_url(&self) -> Option<&str> {
        self.subject
            .html_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| Some(self.repository.html_url.as_str()).filter(|u| !u.is_empty()))
    }

    /// Compose the display line relative to `now`.
    pub fn render_line(&self, now: DateTime<Utc>) -> String {
        let mut line = format!(
            "{} {:<8} {:<11} {:<7} {} {}",
            if self.unread { "●" } else { " " },
            format_relative_time(self.updated_at, now),
            self.subject.kind,
            self.subject.state.as_deref().unwrap_or("-"),
            self.repository.full_name,
            self.subject.title,
        );
        if let Some(author) = &self.author {
            line.push_str(" @");
            line.push_str(&author.login);
        }
        if !self.meta.tags.is_empty() {
            line.push_str(&format!(" [{}]", self.meta.tags.join(", ")));
        }
        line
    }

    pub fn render(&mut self) {
        self.rendered = self.render_line(Utc::now());
    }
}

/// Format the age of `then` as relative time (e.g., "2m ago", "1h ago").
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then).num_seconds().max(0);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else if diff < 604800 {
        format!("{}d ago", diff / 86400)
    } else {
        format!("{}w ago", diff / 604800)
    }
}

/// Ordered notification set, serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notifications(Vec<Notification>);

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Notification> {
        self.0.iter_mut()
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.0
    }

    pub fn push(&mut self, notification: Notification) {
        self.0.push(notification);
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.0.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Notification> {
        self.0.iter_mut().find(|n| n.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|n| n.id.as_str()).collect()
    }

    /// Replace the entry with the same id. Returns false if the id is unknown.
    pub fn replace(&mut self, notification: Notification) -> bool {
        match self.get_mut(&notification.id) {
            Some(slot) => {
                *slot = notification;
                true
            }
            None => false,
        }
    }

    /// Most recently updated first, ties broken by id.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Notifications that are neither hidden nor done.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.0.iter().filter(|n| !n.meta.hidden && !n.meta.done)
    }

    /// Recompute every display line.
    pub fn render(&mut self) {
        let now = Utc::now();
        for n in self.0.iter_mut() {
            n.rendered = n.render_line(now);
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::new());
        }
        serde_json::from_slice(bytes)
    }
}

impl From<Vec<Notification>> for Notifications {
    fn from(items: Vec<Notification>) -> Self {
        Self(items)
    }
}

impl FromIterator<Notification> for Notifications {
    fn from_iter<I: IntoIterator<Item = Notification>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Notifications {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::notification;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_api_payload_gets_fresh_meta() {
        let json = r#"[{
            "id": "42",
            "unread": true,
            "reason": "mention",
            "updated_at": "2024-03-01T10:00:00Z",
            "url": "https://api.github.com/notifications/threads/42",
            "repository": {
                "name": "repo",
                "full_name": "org/repo",
                "private": true,
                "fork": false,
                "html_url": "https://github.com/org/repo",
                "owner": {"login": "org", "type": "Organization"}
            },
            "subject": {
                "title": "Fix it",
                "url": "https://api.github.com/repos/org/repo/pulls/7",
                "type": "PullRequest"
            }
        }]"#;

        let set = Notifications::from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        let n = set.get("42").unwrap();
        assert_eq!(n.repository.owner.kind, "Organization");
        assert_eq!(n.subject.kind, "PullRequest");
        assert_eq!(n.meta, Meta::default());
        assert!(n.author.is_none());
    }

    #[test]
    fn test_empty_document_is_empty_set() {
        assert!(Notifications::from_json_bytes(b"").unwrap().is_empty());
        assert!(Notifications::from_json_bytes(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_json_keeps_meta_and_drops_rendered() {
        let mut n = notification("1", "org/repo", "mention");
        n.meta.tags = vec!["a".into()];
        n.rendered = "cached line".into();
        let set = Notifications::from(vec![n]);

        let bytes = set.to_json_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["meta"]["tags"][0], "a");
        assert_eq!(value[0]["subject"]["type"], "Issue");
        assert!(value[0].get("rendered").is_none());
    }

    #[test]
    fn test_sort_newest_first_with_id_tiebreak() {
        let mut a = notification("1", "org/a", "mention");
        let mut b = notification("2", "org/b", "mention");
        let c = notification("3", "org/c", "mention");
        a.updated_at = c.updated_at;
        b.updated_at = c.updated_at - chrono::Duration::hours(1);

        let mut set = Notifications::from(vec![b, c, a]);
        set.sort();
        assert_eq!(set.ids(), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_render_line() {
        let mut n = notification("5", "org/repo", "mention");
        n.meta.tags = vec!["x".into(), "y".into()];
        n.author = Some(User {
            login: "octocat".into(),
            ..Default::default()
        });
        let now = n.updated_at + chrono::Duration::hours(3);

        let line = n.render_line(now);
        assert!(line.starts_with("● 3h ago"));
        assert!(line.contains("org/repo Subject 5"));
        assert!(line.ends_with("@octocat [x, y]"));
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(format_relative_time(now, now), "just now");
        assert_eq!(format_relative_time(now - chrono::Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative_time(now - chrono::Duration::days(2), now), "2d ago");
        assert_eq!(format_relative_time(now - chrono::Duration::days(9), now), "1w ago");
        assert_eq!(format_relative_time(now + chrono::Duration::hours(1), now), "just now");
    }

    #[test]
    fn test_web_url_fallback() {
        let mut n = notification("1", "org/repo", "mention");
        assert_eq!(n.web_url(), Some("https://github.com/org/repo/issues/1"));
        n.subject.html_url = None;
        assert_eq!(n.web_url(), Some("https://github.com/org/repo"));
        n.repository.html_url.clear();
        assert_eq!(n.web_url(), None);
    }

    #[test]
    fn test_normalize_tags() {
        let mut meta = Meta {
            tags: vec!["b".into(), "a".into(), "b".into()],
            ..Default::default()
        };
        meta.normalize_tags();
        assert_eq!(meta.tags, vec!["a", "b"]);
        assert!(meta.has_tag("a"));
        assert!(!meta.has_tag("c"));
    }
}
