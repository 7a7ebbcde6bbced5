//! Batch subcommands over a [`CoreRuntime`].
//!
//! Each command writes its user-facing output to the given writer so it can
//! be exercised without a terminal.

use std::io::Write;

use anyhow::{bail, Context, Result};
use ghnot_core::filter::filter_chain;
use ghnot_core::{ApplyReport, Config, CoreRuntime, Notifications, RefreshStrategy, Rule};

/// Load, refresh, apply the configured rules and save.
pub fn sync(
    runtime: &mut CoreRuntime,
    strategy: RefreshStrategy,
    noop: bool,
    out: &mut dyn Write,
) -> Result<ApplyReport> {
    runtime.run(strategy, noop, out)
}

/// Print the notifications matching every filter. Hidden and done
/// notifications are left out unless `all` is set.
pub fn list(
    runtime: &mut CoreRuntime,
    strategy: RefreshStrategy,
    filters: &[String],
    all: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<usize> {
    load_and_refresh(runtime, strategy)?;

    let mut selected: Notifications = filter_chain(filters, runtime.notifications())
        .context("Invalid filter")?
        .into_iter()
        .filter(|n| all || (!n.meta.hidden && !n.meta.done))
        .collect();

    if json {
        let body = serde_json::to_string_pretty(&selected).context("Failed to encode notifications")?;
        writeln!(out, "{}", body)?;
    } else {
        selected.render();
        for n in selected.iter() {
            writeln!(out, "{}", n.rendered)?;
        }
    }
    Ok(selected.len())
}

/// Run one action on the notifications matching `filters`, as a one-off rule.
pub fn run_action(
    runtime: &mut CoreRuntime,
    strategy: RefreshStrategy,
    action: &str,
    args: Vec<String>,
    filters: Vec<String>,
    noop: bool,
    out: &mut dyn Write,
) -> Result<ApplyReport> {
    if !runtime.registry().contains(action) {
        bail!(
            "Unknown action {:?} (available: {})",
            action,
            runtime.registry().names().join(", ")
        );
    }

    load_and_refresh(runtime, strategy)?;
    let rule = Rule {
        name: format!("run {}", action),
        filters,
        action: action.to_string(),
        args,
    };
    let report = runtime
        .apply(&[rule], noop, out)
        .context("Failed to run action")?;
    if !noop {
        runtime.save().context("Failed to save cache")?;
    }
    Ok(report)
}

/// Describe the configured rules, flagging actions that do not exist, then
/// list the action catalog.
pub fn rules(config: &Config, known_actions: &[&str], out: &mut dyn Write) -> Result<()> {
    if config.rules.is_empty() {
        writeln!(out, "No rules configured.")?;
    }

    for (i, rule) in config.rules.iter().enumerate() {
        let unknown = if known_actions.contains(&rule.action.as_str()) {
            ""
        } else {
            " (unknown action)"
        };
        writeln!(out, "{}. {}", i + 1, rule.name)?;
        writeln!(out, "   action: {} {}{}", rule.action, rule.args.join(" "), unknown)?;
        if rule.filters.is_empty() {
            writeln!(out, "   filter: .")?;
        }
        for filter in &rule.filters {
            writeln!(out, "   filter: {}", filter)?;
        }
    }
    writeln!(out, "\nActions: {}", known_actions.join(", "))?;
    Ok(())
}

fn load_and_refresh(runtime: &mut CoreRuntime, strategy: RefreshStrategy) -> Result<()> {
    runtime.load().context("Failed to load cache")?;
    if runtime.refresh(strategy)?.is_some() {
        runtime.save().context("Failed to save cache")?;
    }
    Ok(())
}
