//! Tenant/ACL filter for event-scoped lookups.

use eventum_core::{EventId, OrganizationId, UserId};

use crate::{OrgContext, Role};

/// Filter that every event-scoped lookup must satisfy.
///
/// Built from the request's [`OrgContext`]; repositories decide matches
/// exclusively through [`EventScope::permits`], so a non-match is
/// structurally "not found". No lookup path can reveal whether the event
/// exists in another tenant or behind a reviewer ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventScope {
    organization_id: OrganizationId,
    event_id: Option<EventId>,
    reviewer_user_id: Option<UserId>,
}

impl EventScope {
    /// Build the filter for `ctx`, optionally narrowed to one event.
    ///
    /// Default rule: organization match (+ id match when requested).
    /// Reviewer rule: additionally, the caller must be a member of the
    /// matched event's reviewer ACL.
    pub fn for_context(ctx: &OrgContext, event_id: Option<EventId>) -> Self {
        let reviewer_user_id = match ctx.role() {
            Some(Role::Reviewer) => ctx.user_id(),
            _ => None,
        };
        Self {
            organization_id: ctx.organization_id(),
            event_id,
            reviewer_user_id,
        }
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn event_id(&self) -> Option<EventId> {
        self.event_id
    }

    /// Decide whether an event identified by `(organization_id, event_id)`
    /// is visible under this scope. `is_acl_member` answers reviewer ACL
    /// membership for that event and is consulted only for reviewer scopes.
    pub fn permits<F>(&self, organization_id: OrganizationId, event_id: EventId, is_acl_member: F) -> bool
    where
        F: FnOnce(UserId) -> bool,
    {
        if self.organization_id != organization_id {
            return false;
        }
        if let Some(wanted) = self.event_id {
            if wanted != event_id {
                return false;
            }
        }
        match self.reviewer_user_id {
            Some(user_id) => is_acl_member(user_id),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn reviewer_ctx(org: OrganizationId, user: UserId) -> OrgContext {
        OrgContext::for_session(org, user, Role::Reviewer)
    }

    #[test]
    fn default_rule_is_organization_match() {
        let org = OrganizationId::new();
        let event = EventId::new();
        let ctx = OrgContext::for_session(org, UserId::new(), Role::Organizer);

        let scope = EventScope::for_context(&ctx, None);
        assert!(scope.permits(org, event, |_| false));
        assert!(!scope.permits(OrganizationId::new(), event, |_| true));
    }

    #[test]
    fn narrowing_to_one_event_requires_id_match() {
        let org = OrganizationId::new();
        let event = EventId::new();
        let ctx = OrgContext::for_session(org, UserId::new(), Role::Admin);

        let scope = EventScope::for_context(&ctx, Some(event));
        assert!(scope.permits(org, event, |_| false));
        assert!(!scope.permits(org, EventId::new(), |_| false));
    }

    #[test]
    fn reviewer_never_matches_without_acl_membership() {
        let org = OrganizationId::new();
        let event = EventId::new();
        let reviewer = UserId::new();
        let scope = EventScope::for_context(&reviewer_ctx(org, reviewer), Some(event));

        let mut acl: HashSet<UserId> = HashSet::new();
        // Same organization, same event, but the ACL does not list them.
        assert!(!scope.permits(org, event, |user| acl.contains(&user)));

        acl.insert(reviewer);
        assert!(scope.permits(org, event, |user| acl.contains(&user)));
    }

    #[test]
    fn api_key_scope_is_tenant_wide() {
        let org = OrganizationId::new();
        let ctx = OrgContext::for_api_key(org);
        let scope = EventScope::for_context(&ctx, None);
        assert!(scope.permits(org, EventId::new(), |_| false));
    }
}
