use core::fmt;

use arcstr::ArcStr;

#[cfg(doc)]
use crate::scene::Scene;

/// Name/key of an entity in a [`Scene`].
///
/// Names are unique within a scene. An entity inserted without a name is given an
/// [`Name::Anonym`] name instead, which is never reused.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Name {
    /// An explicitly set name.
    Specific(ArcStr),

    /// An automatically assigned name.
    Anonym(usize),
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::Specific(value.into())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::Specific(value.into())
    }
}

impl From<ArcStr> for Name {
    fn from(value: ArcStr) -> Self {
        Self::Specific(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Specific(name) => write!(f, "'{name}'"),
            Name::Anonym(index) => write!(f, "[anonymous #{index}]"),
        }
    }
}
