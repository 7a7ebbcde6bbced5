//! Actions that only touch local state.

use std::io::Write;

use super::{describe, Action};
use crate::error::ActionError;
use crate::models::Notification;

/// Does nothing. Useful to stop later rules from matching via tags/hidden.
pub struct PassAction;

impl Action for PassAction {
    fn run(&self, _: &mut Notification, _: &[String], _: &mut dyn Write) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Writes the rendered line regardless of visibility.
pub struct DebugAction;

impl Action for DebugAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        n.render();
        writeln!(out, "{}", n.rendered)?;
        Ok(())
    }
}

/// Writes the rendered line unless the notification is hidden.
pub struct PrintAction;

impl Action for PrintAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        if n.meta.hidden {
            return Ok(());
        }
        n.render();
        writeln!(out, "{}", n.rendered)?;
        Ok(())
    }
}

pub struct HideAction;

impl Action for HideAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        n.meta.hidden = true;
        writeln!(out, "hidden: {}", describe(n))?;
        Ok(())
    }
}

/// `+tag` adds, `-tag` removes, a bare `tag` adds.
pub struct TagAction;

impl Action for TagAction {
    fn run(&self, n: &mut Notification, args: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        for arg in args {
            if let Some(tag) = arg.strip_prefix('-') {
                n.meta.tags.retain(|t| t != tag);
            } else {
                let tag = arg.strip_prefix('+').unwrap_or(arg);
                if !tag.is_empty() && !n.meta.has_tag(tag) {
                    n.meta.tags.push(tag.to_string());
                }
            }
        }
        n.meta.normalize_tags();
        writeln!(out, "tags [{}]: {}", n.meta.tags.join(", "), describe(n))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::fixtures::notification;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tag_normalization() {
        let mut n = notification("1", "org/repo", "mention");
        n.meta.tags = args(&["tag0", "tag1", "tag2"]);
        let mut out = Vec::new();

        TagAction
            .run(
                &mut n,
                &args(&["+tag1", "+tag1", "+tag2", "-tag2", "-tag2", "tag3", "-tag3"]),
                &mut out,
            )
            .unwrap();

        assert_eq!(n.meta.tags, vec!["tag0", "tag1"]);
        assert!(String::from_utf8(out).unwrap().starts_with("tags [tag0, tag1]"));
    }

    #[test]
    fn test_tag_sorts_and_dedupes_existing() {
        let mut n = notification("1", "org/repo", "mention");
        n.meta.tags = args(&["z", "a", "z"]);
        TagAction.run(&mut n, &args(&["m"]), &mut Vec::new()).unwrap();
        assert_eq!(n.meta.tags, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_print_skips_hidden_debug_does_not() {
        let mut n = notification("1", "org/repo", "mention");
        n.meta.hidden = true;

        let mut printed = Vec::new();
        PrintAction.run(&mut n, &[], &mut printed).unwrap();
        assert!(printed.is_empty());

        let mut debugged = Vec::new();
        DebugAction.run(&mut n, &[], &mut debugged).unwrap();
        let line = String::from_utf8(debugged).unwrap();
        assert!(line.contains("org/repo Subject 1"));
        assert_eq!(line.trim_end(), n.rendered);
    }

    #[test]
    fn test_hide_and_pass() {
        let mut n = notification("1", "org/repo", "mention");
        let before = n.clone();
        PassAction.run(&mut n, &[], &mut Vec::new()).unwrap();
        assert_eq!(n, before);

        let mut out = Vec::new();
        HideAction.run(&mut n, &[], &mut out).unwrap();
        assert!(n.meta.hidden);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "hidden: org/repo Subject 1 (1)\n"
        );
    }
}
