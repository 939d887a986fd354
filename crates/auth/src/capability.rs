use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability identifier.
///
/// Capabilities are modeled as opaque `"resource.action"` strings
/// (e.g. `"events.create"`, `"abstracts.update"`). The role gate inspects the
/// resource and action parts; everything else treats them as labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The resource part (everything before the first `.`).
    pub fn resource(&self) -> &str {
        match self.0.split_once('.') {
            Some((resource, _)) => resource,
            None => &self.0,
        }
    }

    /// The action part (everything after the last `.`).
    pub fn action(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((_, action)) => action,
            None => &self.0,
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
