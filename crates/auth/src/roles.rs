use serde::{Deserialize, Serialize};

/// Role granted to a user within one organization.
///
/// Determines mutation and navigation capability; data visibility is handled
/// separately by [`crate::EventScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Cross-organization operator (support/ops).
    SuperAdmin,
    /// Full control within the organization.
    Admin,
    /// Regular event organizer.
    #[default]
    Organizer,
    /// Abstract reviewer; visibility limited to events that list them
    /// in the reviewer ACL.
    Reviewer,
    /// Abstract submitter.
    Submitter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Organizer => "organizer",
            Role::Reviewer => "reviewer",
            Role::Submitter => "submitter",
        }
    }

    /// Roles whose browser navigation is confined to the events list and
    /// the abstracts sub-path.
    pub fn is_navigation_restricted(&self) -> bool {
        matches!(self, Role::Reviewer | Role::Submitter)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
