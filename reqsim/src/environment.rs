//! The assembled request environment.
//!
//! An [`Environment`] is the flat, ordered variable map a server derives from
//! a connection (`REQUEST_METHOD`, `HTTP_HOST`, `CONTENT_TYPE`, ...). It is
//! produced by [`EnvironmentBuilder::assemble`](crate::EnvironmentBuilder::assemble)
//! and consumed by [`Request`](crate::Request).
//!
//! # Usage
//!
//! ```
//! use reqsim::EnvironmentBuilder;
//!
//! let env = EnvironmentBuilder::new()
//!     .set_method("POST")
//!     .set_uri("http://example.com:8080/users?page=2")?
//!     .assemble();
//!
//! assert_eq!(env.get_str("REQUEST_METHOD"), Some("POST"));
//! assert_eq!(env.get_int("SERVER_PORT"), Some(8080));
//! assert_eq!(env.get_or("REMOTE_ADDR", "127.0.0.1"), "127.0.0.1");
//! # Ok::<(), reqsim::Error>(())
//! ```

use std::fmt;

/// A single environment value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EnvValue {
    /// Text value.
    Str(String),
    /// Integer value (ports, lengths, timestamps).
    Int(i64),
    /// Fractional value (high-resolution timestamps).
    Float(f64),
    /// The variable exists but carries no value.
    Absent,
}

impl EnvValue {
    /// The text value, if this is [`EnvValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if this is [`EnvValue::Int`].
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The fractional value, if this is [`EnvValue::Float`].
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether this is [`EnvValue::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Absent => Ok(()),
        }
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for EnvValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for EnvValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for EnvValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Ordered map of environment variables.
///
/// Inserting an existing name replaces its value without moving it, so the
/// iteration order is the order names were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: Vec<(String, EnvValue)>,
}

impl Environment {
    /// Create an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<EnvValue>) {
        let name = name.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.vars.push((name, value)),
        }
    }

    /// The value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnvValue> {
        self.vars.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// The text value of `name`.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(EnvValue::as_str)
    }

    /// The integer value of `name`.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(EnvValue::as_int)
    }

    /// The fractional value of `name`.
    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(EnvValue::as_float)
    }

    /// The value of `name` rendered as text, or `default` when missing or absent.
    #[must_use]
    pub fn get_or(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            None | Some(EnvValue::Absent) => default.to_string(),
            Some(value) => value.to_string(),
        }
    }

    /// Whether `name` is set (even to [`EnvValue::Absent`]).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.iter().any(|(k, _)| k == name)
    }

    /// Iterate over variables in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Variable names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(k, _)| k.as_str())
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the environment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Every present variable rendered as text, in order. Absent values are skipped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter(|(_, v)| !v.is_absent())
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<EnvValue>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_env() -> Environment {
        let mut env = Environment::new();
        env.insert("SERVER_PORT", 3000i64);
        env.insert("HTTP_HOST", "localhost");
        env.insert("REQUEST_TIME_FLOAT", 1.5f64);
        env.insert("REMOTE_ADDR", None::<String>);
        env
    }

    #[test]
    fn test_get() {
        let env = mock_env();
        assert_eq!(env.get_int("SERVER_PORT"), Some(3000));
        assert_eq!(env.get_str("HTTP_HOST"), Some("localhost"));
        assert_eq!(env.get_float("REQUEST_TIME_FLOAT"), Some(1.5));
        assert_eq!(env.get("REMOTE_ADDR"), Some(&EnvValue::Absent));
        assert_eq!(env.get("NONEXISTENT"), None);
    }

    #[test]
    fn test_typed_getters_mismatch() {
        let env = mock_env();
        assert_eq!(env.get_str("SERVER_PORT"), None);
        assert_eq!(env.get_int("HTTP_HOST"), None);
    }

    #[test]
    fn test_get_or() {
        let env = mock_env();
        assert_eq!(env.get_or("SERVER_PORT", "80"), "3000");
        assert_eq!(env.get_or("REMOTE_ADDR", "0.0.0.0"), "0.0.0.0");
        assert_eq!(env.get_or("NONEXISTENT", "default"), "default");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut env = mock_env();
        env.insert("SERVER_PORT", 8080i64);
        assert_eq!(env.names().next(), Some("SERVER_PORT"));
        assert_eq!(env.get_int("SERVER_PORT"), Some(8080));
        assert_eq!(env.len(), 4);
    }

    #[test]
    fn test_contains_absent() {
        let env = mock_env();
        assert!(env.contains("REMOTE_ADDR"));
        assert!(!env.contains("HTTP_COOKIE"));
    }

    #[test]
    fn test_to_pairs_skips_absent() {
        let env = mock_env();
        assert_eq!(
            env.to_pairs(),
            vec![
                ("SERVER_PORT".to_string(), "3000".to_string()),
                ("HTTP_HOST".to_string(), "localhost".to_string()),
                ("REQUEST_TIME_FLOAT".to_string(), "1.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_iterator() {
        let env: Environment = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get_str("A"), Some("3"));
    }
}
