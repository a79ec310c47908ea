use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symbolic identifier (action names, smart-object types, item ids, registry tags).
///
/// Built-in identifiers are `'static` and cost nothing to create; data-driven ones own their
/// string. The empty id stands for "no symbol".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct StrId(Cow<'static, str>);

impl StrId {
    pub const EMPTY: StrId = StrId(Cow::Borrowed(""));

    pub const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    pub fn new(s: impl Into<String>) -> Self {
        Self(Cow::Owned(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&'static str> for StrId {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for StrId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for StrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
