use serde::{Deserialize, Deserializer};

/// Update instruction for a nullable column.
///
/// A key missing from the request body leaves the column `Unchanged`,
/// an explicit `null` clears it, and any other value replaces it.
/// Fields using this type must carry `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Unchanged
    }
}

impl<T> Setting<T> {
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Setting::Unchanged => current,
            Setting::Clear => None,
            Setting::Set(value) => Some(value),
        }
    }

    /// Value for a brand new record, where unchanged and cleared both mean absent
    pub fn into_option(self) -> Option<T> {
        self.apply(None)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Setting::Set(value),
            None => Setting::Clear,
        })
    }
}
