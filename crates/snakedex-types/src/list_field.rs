//! Ordered list values edited entry-by-entry (habitat, color, diet, first aid).
//!
//! `ListField` is immutable: every edit returns a new value. The form keeps
//! the latest value and swaps it in, so no operation can reorder the
//! entries it did not touch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An ordered sequence of free-text entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListField(Vec<String>);

impl ListField {
    /// The editing baseline: one empty entry.
    pub fn single_empty() -> Self {
        Self(vec![String::new()])
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Appends an empty entry at the end.
    #[must_use]
    pub fn push_empty(&self) -> Self {
        let mut entries = self.0.clone();
        entries.push(String::new());
        Self(entries)
    }

    /// Removes the entry at `index`. Out-of-range indices leave the list unchanged.
    #[must_use]
    pub fn remove(&self, index: usize) -> Self {
        let mut entries = self.0.clone();
        if index < entries.len() {
            entries.remove(index);
        }
        Self(entries)
    }

    /// Replaces the entry at `index`. Out-of-range indices leave the list unchanged.
    #[must_use]
    pub fn replace(&self, index: usize, value: impl Into<String>) -> Self {
        let mut entries = self.0.clone();
        if let Some(slot) = entries.get_mut(index) {
            *slot = value.into();
        }
        Self(entries)
    }

    /// Joins the non-blank entries for display. Empty when nothing is filled in.
    pub fn display(&self) -> String {
        self.0
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ListField {
    fn default() -> Self {
        Self::single_empty()
    }
}

impl<'de> Deserialize<'de> for ListField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map_or_else(ListField::single_empty, |v| normalize_list_value(&v)))
    }
}

/// Normalizes whatever the backend sent for a list-valued field.
///
/// - array: entries as strings (`null` entries become empty strings)
/// - non-empty string: split on `,`, each piece trimmed
/// - anything else (empty string, null, number, object): one empty entry
///
/// The result is never empty.
pub fn normalize_list_value(value: &Value) -> ListField {
    let entries: Vec<String> = match value {
        Value::Array(items) => items.iter().map(entry_text).collect(),
        Value::String(s) if !s.is_empty() => s.split(',').map(|p| p.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    if entries.is_empty() {
        ListField::single_empty()
    } else {
        ListField(entries)
    }
}

fn entry_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
