//! A present-or-absent box for sparse records.
//!
//! The daemon treats a missing key as "not requested", which is a different thing from a key
//! whose value is `null`. [`Optional`] keeps that distinction in the type system: an absent value
//! is never written to the wire, and a key missing from a response decodes to
//! [`Optional::Absent`].

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser};

/// Message used when something tries to encode an absent value.
pub(crate) const ABSENT_FIELD: &str =
    "absent values must be skipped, not encoded; mark the field with `skip_serializing_if`";

/// A value that was either requested and received, or not requested at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
    /// The field was requested (or set) and carries a value.
    Present(T),
    /// The field was not requested (or not set).
    Absent,
}

impl<T> Optional<T> {
    /// Returns `true` if the value is present.
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns `true` if the value is absent. Used as the `skip_serializing_if` predicate.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrows the contained value, or `None` when absent.
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Converts into a standard [`Option`].
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Maps the contained value, keeping absence.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        match self {
            Self::Present(value) => Optional::Present(f(value)),
            Self::Absent => Optional::Absent,
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Absent => Err(ser::Error::custom(ABSENT_FIELD)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Present)
    }
}
