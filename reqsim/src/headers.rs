//! Ordered, case-insensitive header storage for the environment builder.

use crate::constants::HEADER_VAR_PREFIX;

/// Header names mapped to an ordered set of values.
///
/// - Names keep the spelling of their first insertion and are looked up
///   case-insensitively.
/// - Names iterate in first-insertion order.
/// - Each name's values are a set: adding a value that is already present
///   leaves it in its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    /// Create an empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `value` under `name` unless that exact value is already present.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                if let Some((_, values)) = self.entries.get_mut(idx)
                    && !values.contains(&value)
                {
                    values.push(value);
                }
            },
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Remove every value of `name`. Missing names are a no-op.
    pub fn remove(&mut self, name: &str) {
        if let Some(idx) = self.position(name) {
            self.entries.remove(idx);
        }
    }

    /// Remove a single value of `name`, leaving the others intact.
    ///
    /// A name left without values is dropped entirely, so an assembled
    /// environment carries no `HTTP_<NAME>` variable for it. Missing names
    /// and values are a no-op.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        let Some(idx) = self.position(name) else {
            return;
        };
        let now_empty = self.entries.get_mut(idx).is_some_and(|(_, values)| {
            values.retain(|v| v != value);
            values.is_empty()
        });
        if now_empty {
            self.entries.remove(idx);
        }
    }

    /// All values of `name` (case-insensitive), in insertion order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .and_then(|idx| self.entries.get(idx))
            .map(|(_, values)| values.as_slice())
    }

    /// Values of `name` joined with `", "`.
    #[must_use]
    pub fn get_joined(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(", "))
    }

    /// Whether `name` is present (case-insensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate over `(name, values)` in first-insertion order of names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// Environment variable name for a header: `X-Custom-Id` -> `HTTP_X_CUSTOM_ID`.
#[must_use]
pub fn env_var_name(header: &str) -> String {
    let mut out = String::with_capacity(HEADER_VAR_PREFIX.len() + header.len());
    out.push_str(HEADER_VAR_PREFIX);
    out.extend(
        header
            .chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() }),
    );
    out
}

/// Header name for an environment variable: `HTTP_X_CUSTOM_ID` -> `X-Custom-Id`.
///
/// Returns `None` for variables without the `HTTP_` prefix.
#[must_use]
pub fn header_name_from_var(var: &str) -> Option<String> {
    let raw = var.strip_prefix(HEADER_VAR_PREFIX)?;
    if raw.is_empty() {
        return None;
    }
    let words: Vec<String> = raw
        .split('_')
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect();
    Some(words.join("-"))
}
