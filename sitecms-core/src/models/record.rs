//! Record identity shared by every editable collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a record inside one collection (service, link, project, ...).
///
/// Identifiers are opaque strings. Generated ones look like `p-<uuid>` so they
/// are never reused, even after the record they named was removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier with the given kind prefix.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A record that lives in an ordered, id-keyed collection.
pub trait Record: Clone {
    /// Prefix used when generating identifiers for this record kind.
    const ID_PREFIX: &'static str;
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &RecordId;

    fn set_id(&mut self, id: RecordId);
}

macro_rules! impl_record {
    ($ty:ty, $prefix:expr, $kind:expr) => {
        impl $crate::models::Record for $ty {
            const ID_PREFIX: &'static str = $prefix;
            const KIND: &'static str = $kind;

            fn id(&self) -> &$crate::models::RecordId {
                &self.id
            }

            fn set_id(&mut self, id: $crate::models::RecordId) {
                self.id = id;
            }
        }
    };
}

pub(crate) use impl_record;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uses_prefix() {
        let id = RecordId::generate("p");
        assert!(id.as_str().starts_with("p-"));
        assert_eq!(id.as_str().len(), 2 + 32);
    }

    #[test]
    fn test_generate_is_unique() {
        let a = RecordId::generate("s");
        let b = RecordId::generate("s");
        assert_ne!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = RecordId::new("s1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s1\"");
        let parsed: RecordId = serde_json::from_str("\"p9\"").unwrap();
        assert_eq!(parsed, "p9");
    }
}
