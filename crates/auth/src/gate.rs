//! Role gate: deterministic capability and navigation policy.
//!
//! Two orthogonal checks over `(role, target)`:
//! - the *mutation policy* gates named capabilities before a mutation runs;
//! - the *navigation policy* gates browser paths before any handler runs.
//!
//! - No IO
//! - No panics
//! - Consults no external state

use crate::{Capability, Role};

/// Resource name of the abstract-review workflow.
const REVIEW_RESOURCE: &str = "abstracts";

/// Path of the events list (redirect target for every blocked navigation).
pub const EVENTS_LIST_PATH: &str = "/events";

/// Path of the event-creation action.
const EVENT_CREATION_PATH: &str = "/events/new";

/// Top-level sections blocked entirely for navigation-restricted roles.
const BLOCKED_SECTIONS: &[&str] = &["/dashboard", "/settings"];

/// Whether `role` is barred from exercising `capability`.
///
/// `Reviewer` may only read/update the abstract-review workflow; every other
/// capability is denied for `Reviewer` and allowed for every other role.
pub fn is_mutation_restricted(role: Role, capability: &Capability) -> bool {
    if role != Role::Reviewer {
        return false;
    }
    !(capability.resource() == REVIEW_RESOURCE
        && matches!(capability.action(), "read" | "update"))
}

/// Outcome of the navigation policy for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    /// Let the request reach its handler.
    PassThrough,
    /// Send the browser elsewhere instead.
    Redirect(String),
}

/// Navigation policy for browser page loads.
///
/// Restricted roles (`Reviewer`, `Submitter`) may reach the events list and,
/// inside one event, the `abstracts` sub-path; everything else redirects.
/// Every branch terminates in pass-through or redirect.
pub fn navigation_decision(role: Role, path: &str) -> NavDecision {
    if !role.is_navigation_restricted() {
        return NavDecision::PassThrough;
    }

    if path == EVENT_CREATION_PATH {
        return NavDecision::Redirect(EVENTS_LIST_PATH.to_string());
    }

    if BLOCKED_SECTIONS
        .iter()
        .any(|section| path == *section || is_under(path, section))
    {
        return NavDecision::Redirect(EVENTS_LIST_PATH.to_string());
    }

    // Only paths shaped /events/{id}[/{sub...}] are confined further; the
    // events list itself, auth pages and public pages all fall through here.
    let Some(rest) = path.strip_prefix("/events/") else {
        return NavDecision::PassThrough;
    };
    let (event_id, sub_path) = match rest.split_once('/') {
        Some((id, sub)) => (id, Some(sub)),
        None => (rest, None),
    };
    if event_id.is_empty() {
        return NavDecision::PassThrough;
    }

    match sub_path {
        Some(sub) if sub == REVIEW_RESOURCE || sub.starts_with("abstracts/") => {
            NavDecision::PassThrough
        }
        _ => NavDecision::Redirect(format!("/events/{event_id}/abstracts")),
    }
}

fn is_under(path: &str, section: &str) -> bool {
    path.strip_prefix(section)
        .is_some_and(|rest| rest.starts_with('/'))
}
