//! Tri-state field wrapper: a DTO only applies what the client actually sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `Unset` when the key is missing, `Null` for an explicit `null`.
///
/// Containers must use `#[serde(default)]` so missing keys stay `Unset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unset,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Takes `other` when it was set.
    pub fn merge(&mut self, other: Patch<T>) {
        if other.is_set() {
            *self = other;
        }
    }
}

impl Patch<String> {
    /// Writes the value into `target`; an explicit null clears it.
    pub fn apply_to(&self, target: &mut String) {
        match self {
            Self::Value(value) => target.clone_from(value),
            Self::Null => target.clear(),
            Self::Unset => {}
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(value) => value.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}
