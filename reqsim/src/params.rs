//! Ordered name/value parameters (query strings and form bodies).
//!
//! `Params` keeps the position of a name's first insertion; writing the same
//! name again replaces the value in place. This gives query strings and form
//! bodies a deterministic key order that matches the order the caller
//! configured them in.

use url::form_urlencoded;

/// Insertion-ordered, last-write-wins map of string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parse a form-encoded string (`a=1&b=two+words`).
    ///
    /// Decoding is lossy: invalid percent sequences are kept verbatim and
    /// invalid UTF-8 is replaced. Repeated names keep the last value.
    #[must_use]
    pub fn parse(encoded: &str) -> Self {
        form_urlencoded::parse(encoded.as_bytes()).collect()
    }

    /// Set `name` to `value`, keeping the name's original position if present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Remove `name`, returning its value. Missing names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == name)?;
        Some(self.pairs.remove(idx).1)
    }

    /// Value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encode the parameters (`application/x-www-form-urlencoded`).
    ///
    /// Spaces become `+`; an empty set encodes to an empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Percent-encode a single value the way form encoding does (`+` for space).
#[must_use]
pub fn url_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decode a single form-encoded value (`+` as space, lossy on bad input).
#[must_use]
pub fn url_decode(value: &str) -> String {
    // A literal `&` would end the pair early.
    let pair = format!("v={}", value.replace('&', "%26"));
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}
