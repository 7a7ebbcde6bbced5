//! Two-way merge of the cached set with a fresh remote listing.
//!
//! | remote \ local   | missing locally | present locally                  |
//! |------------------|-----------------|----------------------------------|
//! | present remotely | insert          | update (remote fields, local meta) |
//! | missing remotely | -               | keep unless done, else drop      |

use std::collections::{HashMap, HashSet};

use crate::models::{Meta, Notifications};

/// Counts of what a sync did, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub kept: usize,
    pub dropped: usize,
}

pub fn sync(local: Notifications, remote: Notifications) -> Notifications {
    sync_with_report(local, remote).0
}

pub fn sync_with_report(local: Notifications, remote: Notifications) -> (Notifications, SyncReport) {
    let mut report = SyncReport::default();
    let local_ids: HashSet<String> = local.iter().map(|n| n.id.clone()).collect();
    let mut remote_by_id = HashMap::with_capacity(remote.len());
    let mut merged = Notifications::new();

    let mut seen = HashSet::with_capacity(remote.len());

    for n in remote {
        // a thread can shift across a page boundary between fetches; first copy wins
        if !seen.insert(n.id.clone()) {
            tracing::debug!("sync: skipping repeated remote id {}", n.id);
            continue;
        }
        if local_ids.contains(&n.id) {
            remote_by_id.insert(n.id.clone(), n);
        } else {
            let mut inserted = n;
            inserted.meta = Meta {
                remote_exists: true,
                ..Meta::default()
            };
            report.inserted += 1;
            merged.push(inserted);
        }
    }

    for n in local {
        match remote_by_id.remove(&n.id) {
            Some(mut updated) => {
                updated.meta = n.meta;
                updated.meta.remote_exists = true;
                report.updated += 1;
                merged.push(updated);
            }
            None if n.meta.done => {
                tracing::debug!("sync: dropping {} (done and gone from remote)", n.id);
                report.dropped += 1;
            }
            None => {
                let mut kept = n;
                kept.meta.remote_exists = false;
                report.kept += 1;
                merged.push(kept);
            }
        }
    }

    merged.sort();
    (merged, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::fixtures::notification;
    use crate::models::Notification;

    fn ids(set: &Notifications) -> Vec<&str> {
        let mut ids = set.ids();
        ids.sort();
        ids
    }

    fn remote_fields_eq(a: &Notification, b: &Notification) -> bool {
        let mut a = a.clone();
        let mut b = b.clone();
        a.meta = Meta::default();
        b.meta = Meta::default();
        a == b
    }

    #[test]
    fn test_insert_gets_fresh_meta() {
        let mut remote_n = notification("1", "org/repo", "mention");
        remote_n.meta.tags = vec!["bogus".into()];
        let (merged, report) =
            sync_with_report(Notifications::new(), Notifications::from(vec![remote_n.clone()]));

        let n = merged.get("1").unwrap();
        assert!(remote_fields_eq(n, &remote_n));
        assert_eq!(
            n.meta,
            Meta {
                remote_exists: true,
                ..Meta::default()
            }
        );
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_update_takes_remote_fields_keeps_local_meta() {
        let mut local_n = notification("1", "org/repo", "mention");
        local_n.meta = Meta {
            done: false,
            hidden: true,
            tags: vec!["keep".into()],
            remote_exists: false,
        };
        let mut remote_n = notification("1", "org/repo", "review_requested");
        remote_n.subject.title = "New title".into();
        remote_n.unread = false;

        let merged = sync(
            Notifications::from(vec![local_n.clone()]),
            Notifications::from(vec![remote_n.clone()]),
        );

        let n = merged.get("1").unwrap();
        assert!(remote_fields_eq(n, &remote_n));
        assert!(n.meta.hidden);
        assert_eq!(n.meta.tags, vec!["keep"]);
        assert!(n.meta.remote_exists);
    }

    #[test]
    fn test_keep_and_drop_when_missing_remotely() {
        let mut kept = notification("1", "org/repo", "mention");
        kept.meta.remote_exists = true;
        kept.meta.tags = vec!["t".into()];
        let mut dropped = notification("2", "org/repo", "mention");
        dropped.meta.done = true;

        let (merged, report) = sync_with_report(
            Notifications::from(vec![kept.clone(), dropped]),
            Notifications::new(),
        );

        assert_eq!(ids(&merged), vec!["1"]);
        let n = merged.get("1").unwrap();
        assert!(!n.meta.remote_exists);
        assert!(remote_fields_eq(n, &kept));
        assert_eq!(n.meta.tags, vec!["t"]);
        assert_eq!(report.kept, 1);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_done_but_still_remote_is_updated_not_dropped() {
        let mut local_n = notification("1", "org/repo", "mention");
        local_n.meta.done = true;
        let merged = sync(
            Notifications::from(vec![local_n]),
            Notifications::from(vec![notification("1", "org/repo", "mention")]),
        );

        assert!(merged.get("1").unwrap().meta.done);
    }

    #[test]
    fn test_repeated_remote_id_keeps_first_copy() {
        let first = notification("1", "org/repo", "mention");
        let mut second = notification("1", "org/repo", "subscribed");
        second.subject.title = "Moved to the next page".into();

        let (merged, report) = sync_with_report(
            Notifications::new(),
            Notifications::from(vec![first.clone(), second.clone()]),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(merged.get("1").unwrap().reason, "mention");

        let mut local_n = notification("1", "org/repo", "mention");
        local_n.meta.tags = vec!["keep".into()];
        let merged = sync(
            Notifications::from(vec![local_n]),
            Notifications::from(vec![second, first]),
        );
        assert_eq!(merged.len(), 1);
        let n = merged.get("1").unwrap();
        assert_eq!(n.reason, "subscribed");
        assert_eq!(n.meta.tags, vec!["keep"]);
    }

    #[test]
    fn test_idempotent_and_sorted() {
        let mut local = vec![
            notification("1", "org/a", "mention"),
            notification("3", "org/b", "mention"),
            notification("5", "org/c", "mention"),
        ];
        local[1].meta.done = true;
        local[2].meta.hidden = true;
        let remote = Notifications::from(vec![
            notification("2", "org/a", "subscribed"),
            notification("1", "org/a", "review_requested"),
            notification("7", "org/d", "mention"),
        ]);

        let once = sync(Notifications::from(local), remote.clone());
        let twice = sync(once.clone(), remote);

        assert_eq!(once, twice);
        assert_eq!(once.ids(), vec!["7", "5", "2", "1"]);
    }
}
