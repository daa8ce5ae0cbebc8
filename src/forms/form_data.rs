use std::collections::HashMap;

use serde::Deserialize;

/// Raw submitted values keyed by field name, as decoded from the request body.
#[derive(Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Drops every key that is not one of `fields`.
    pub fn restrict_to(mut self, fields: &[&str]) -> Self {
        self.0.retain(|key, _| fields.contains(&key.as_str()));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
