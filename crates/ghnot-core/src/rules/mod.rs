//! Ordered rules: filter the working set, then run one action on each match.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::actions::ActionRegistry;
use crate::error::RuleError;
use crate::filter::Query;
use crate::models::Notifications;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// Applied in sequence; all must hold.
    #[serde(default)]
    pub filters: Vec<String>,
    pub action: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Counters from one `apply` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub matched: usize,
    pub ran: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub fn apply(
    rules: &[Rule],
    notifications: Notifications,
    registry: &ActionRegistry,
    noop: bool,
    out: &mut dyn Write,
) -> Result<Notifications, RuleError> {
    apply_with_report(rules, notifications, registry, noop, out).map(|(set, _)| set)
}

/// Run every rule in order against the current working set.
///
/// Each rule sees the mutations made by the rules before it. Filter errors
/// abort the whole pass; action errors are logged and the pass continues.
pub fn apply_with_report(
    rules: &[Rule],
    notifications: Notifications,
    registry: &ActionRegistry,
    noop: bool,
    out: &mut dyn Write,
) -> Result<(Notifications, ApplyReport), RuleError> {
    let mut items = notifications.into_vec();
    let mut report = ApplyReport::default();

    for rule in rules {
        let mut selected: Vec<usize> = (0..items.len()).collect();
        for expr in &rule.filters {
            let query = Query::parse(expr).map_err(|source| RuleError::Filter {
                rule: rule.name.clone(),
                filter: expr.clone(),
                source,
            })?;
            selected = query
                .select(&items, &selected)
                .map_err(|source| RuleError::Filter {
                    rule: rule.name.clone(),
                    filter: expr.clone(),
                    source,
                })?;
        }

        tracing::debug!("rule {:?}: {} matches", rule.name, selected.len());
        report.matched += selected.len();
        if selected.is_empty() {
            continue;
        }

        let Some(action) = registry.get(&rule.action) else {
            tracing::warn!(
                "rule {:?}: unknown action {:?}, skipping {} notifications",
                rule.name,
                rule.action,
                selected.len()
            );
            report.skipped += selected.len();
            continue;
        };

        for index in selected {
            let notification = &mut items[index];
            if noop {
                tracing::info!(
                    "noop: rule {:?} would run {} {:?} on {}",
                    rule.name,
                    rule.action,
                    rule.args,
                    notification.id
                );
                report.skipped += 1;
                continue;
            }

            match action.run(notification, &rule.args, out) {
                Ok(()) => report.ran += 1,
                Err(e) => {
                    tracing::warn!(
                        "rule {:?}: action {} failed on {}: {}",
                        rule.name,
                        rule.action,
                        notification.id,
                        e
                    );
                    report.failed += 1;
                }
            }
        }
    }

    Ok((Notifications::from(items), report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::actions::{Action, TagAction};
    use crate::error::{ActionError, FilterError};
    use crate::models::notification::fixtures::notification;
    use crate::models::Notification;
    use crate::remote::mock::MockRemote;

    fn sample() -> Notifications {
        Notifications::from(vec![
            notification("0", "org/repo1", "review_requested"),
            notification("1", "org/repo1", "subscribed"),
            notification("2", "org/repo2", "review_requested"),
            notification("3", "org/repo2", "mention"),
            notification("4", "org/repo3", "review_requested"),
        ])
    }

    fn rule(name: &str, filters: &[&str], action: &str, args: &[&str]) -> Rule {
        Rule {
            name: name.to_string(),
            filters: filters.iter().map(|s| s.to_string()).collect(),
            action: action.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn done_rule() -> Rule {
        rule(
            "done reviews",
            &[r#"(.repository.full_name == "org/repo1" or .repository.full_name == "org/repo2") and .reason == "review_requested""#],
            "done",
            &[],
        )
    }

    #[test]
    fn test_done_rule_end_to_end() {
        let remote = Arc::new(MockRemote::default());
        let registry = ActionRegistry::standard(remote.clone());
        let mut out = Vec::new();

        let (set, report) =
            apply_with_report(&[done_rule()], sample(), &registry, false, &mut out).unwrap();

        let done: Vec<&str> = set
            .iter()
            .filter(|n| n.meta.done)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(done, vec!["0", "2"]);
        assert_eq!(set.get("4"), sample().get("4"));
        assert_eq!(report, ApplyReport { matched: 2, ran: 2, failed: 0, skipped: 0 });

        let calls = remote.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(method, _, _)| method == "DELETE"));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_noop_mutates_nothing() {
        let remote = Arc::new(MockRemote::default());
        let registry = ActionRegistry::standard(remote.clone());

        let (set, report) =
            apply_with_report(&[done_rule()], sample(), &registry, true, &mut Vec::new()).unwrap();

        assert_eq!(set, sample());
        assert!(remote.calls().is_empty());
        assert_eq!(report.skipped, 2);
        assert_eq!(report.ran, 0);
    }

    #[test]
    fn test_unknown_action_is_skipped() {
        let registry = ActionRegistry::standard(Arc::new(MockRemote::default()));
        let rules = [
            rule("bogus", &[], "frobnicate", &[]),
            rule("hide all", &[], "hide", &[]),
        ];

        let (set, report) =
            apply_with_report(&rules, sample(), &registry, false, &mut Vec::new()).unwrap();

        assert!(set.iter().all(|n| n.meta.hidden));
        assert_eq!(report.skipped, 5);
        assert_eq!(report.ran, 5);
    }

    struct FailOn(&'static str);

    impl Action for FailOn {
        fn run(&self, n: &mut Notification, _: &[String], _: &mut dyn Write) -> Result<(), ActionError> {
            n.meta.tags.push("touched".into());
            if n.id == self.0 {
                return Err(ActionError::NoAssignees);
            }
            Ok(())
        }
    }

    #[test]
    fn test_action_failure_is_isolated() {
        let mut registry = ActionRegistry::new();
        registry.register("flaky", FailOn("1"));

        let (set, report) = apply_with_report(
            &[rule("flaky", &[], "flaky", &[])],
            sample(),
            &registry,
            false,
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.ran, 4);
        // partial mutation of the failing notification stands
        assert!(set.iter().all(|n| n.meta.has_tag("touched")));
    }

    #[test]
    fn test_later_rules_see_earlier_mutations() {
        let mut registry = ActionRegistry::new();
        registry.register("tag", TagAction);
        let rules = [
            rule("tag mentions", &[r#".reason == "mention""#], "tag", &["+seen"]),
            rule("tag seen again", &[r#".meta.tags | contains("seen")"#], "tag", &["+twice"]),
        ];

        let set = apply(&rules, sample(), &registry, false, &mut Vec::new()).unwrap();

        assert_eq!(set.get("3").unwrap().meta.tags, vec!["seen", "twice"]);
        assert!(set.get("0").unwrap().meta.tags.is_empty());
    }

    #[test]
    fn test_filter_error_aborts() {
        let registry = ActionRegistry::standard(Arc::new(MockRemote::default()));
        let rules = [
            rule("hide all", &[], "hide", &[]),
            rule("broken", &[".reason =="], "hide", &[]),
        ];

        let err = apply(&rules, sample(), &registry, false, &mut Vec::new()).unwrap_err();
        let RuleError::Filter { rule, source, .. } = err;
        assert_eq!(rule, "broken");
        assert!(matches!(source, FilterError::Parse { .. }));
    }

    #[test]
    fn test_rule_decodes_with_defaults() {
        let rule: Rule = serde_json::from_str(r#"{"name": "n", "action": "pass"}"#).unwrap();
        assert!(rule.filters.is_empty());
        assert!(rule.args.is_empty());
    }
}
