use std::fmt;

/// A replica identifier, opaque to the CRDT core.
///
/// Unique per replica for the lifetime of a document. Stable across restarts
/// only if the caller keeps it stable — this crate never generates or
/// persists one on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicaId(String);

impl ReplicaId {
    /// Wrap any string-like value as a replica id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReplicaId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ReplicaId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
