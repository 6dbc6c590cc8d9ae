//! Request bodies.
//!
//! A [`RequestBody`] knows how to describe itself to an environment (content
//! type and length) and how to hand its payload to a request (a fresh byte
//! stream, plus pre-parsed params and files for form-like bodies).
//!
//! # Example
//!
//! ```
//! use reqsim::body::{Multipart, RequestBody};
//!
//! let json = RequestBody::json_str(r#"{"name":"Alice"}"#);
//! assert_eq!(json.content_type(), "application/json");
//! assert_eq!(json.byte_len(), 16);
//!
//! let form = RequestBody::url_encoded([("name", "Alice"), ("city", "New York")]);
//! assert_eq!(&*form.raw_bytes(), b"name=Alice&city=New+York");
//!
//! let multipart = RequestBody::from(Multipart::new().add_param("name", "Alice"));
//! assert!(multipart.raw_bytes().is_empty());
//! ```

mod multipart;

pub use multipart::{FileEntry, Multipart};

use crate::constants::{MIME_FORM_URLENCODED, MIME_JSON, MIME_XML};
use crate::error::Result;
use crate::params::Params;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Cursor;

/// Readable body stream, positioned at the start.
pub type BodyStream = Cursor<Vec<u8>>;

/// The payload of a simulated request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestBody {
    /// Opaque bytes with a caller-chosen content type.
    Raw {
        /// Content type sent with the body.
        content_type: String,
        /// Body bytes.
        bytes: Vec<u8>,
    },
    /// Serialized JSON (`application/json`).
    Json(Vec<u8>),
    /// XML document (`application/xml`).
    Xml(Vec<u8>),
    /// Form fields (`application/x-www-form-urlencoded`).
    UrlEncoded(Params),
    /// Form fields and files (`multipart/form-data`).
    Multipart(Multipart),
}

impl RequestBody {
    /// Opaque body with an explicit content type.
    #[must_use]
    pub fn raw(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Raw {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// JSON body serialized from `value`.
    ///
    /// Fails with [`Error::Encoding`](crate::Error::Encoding) when `value`
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_vec(value)?))
    }

    /// JSON body from an already-serialized document, used verbatim.
    #[must_use]
    pub fn json_str(json: impl Into<String>) -> Self {
        Self::Json(json.into().into_bytes())
    }

    /// XML body, used verbatim.
    #[must_use]
    pub fn xml(xml: impl Into<String>) -> Self {
        Self::Xml(xml.into().into_bytes())
    }

    /// Form-encoded body from name/value pairs.
    #[must_use]
    pub fn url_encoded<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::UrlEncoded(params.into_iter().collect())
    }

    /// Content type announced for this body.
    #[must_use]
    pub fn content_type(&self) -> Cow<'_, str> {
        match self {
            Self::Raw { content_type, .. } => Cow::Borrowed(content_type),
            Self::Json(_) => Cow::Borrowed(MIME_JSON),
            Self::Xml(_) => Cow::Borrowed(MIME_XML),
            Self::UrlEncoded(_) => Cow::Borrowed(MIME_FORM_URLENCODED),
            Self::Multipart(multipart) => Cow::Owned(multipart.content_type()),
        }
    }

    /// Content type without parameters, lowercased (`multipart/form-data`).
    #[must_use]
    pub fn media_type(&self) -> String {
        media_type_of(&self.content_type())
    }

    /// Body length announced as `CONTENT_LENGTH`.
    ///
    /// Exact for every variant except [`RequestBody::Multipart`], whose
    /// length is an estimate (see [`Multipart::byte_len`]).
    #[must_use]
    pub fn byte_len(&self) -> u64 {
        match self {
            Self::Multipart(multipart) => multipart.byte_len(),
            _ => self.raw_bytes().len() as u64,
        }
    }

    /// The body as bytes.
    ///
    /// Always empty for multipart bodies: their content reaches the request
    /// through [`params`](Self::params) and [`files`](Self::files).
    #[must_use]
    pub fn raw_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Raw { bytes, .. } | Self::Json(bytes) | Self::Xml(bytes) => Cow::Borrowed(bytes),
            Self::UrlEncoded(params) => Cow::Owned(params.to_query_string().into_bytes()),
            Self::Multipart(_) => Cow::Borrowed(&[]),
        }
    }

    /// The raw payload of `Raw`, `Json` and `Xml` bodies.
    #[must_use]
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::Raw { bytes, .. } | Self::Json(bytes) | Self::Xml(bytes) => Some(bytes),
            Self::UrlEncoded(_) | Self::Multipart(_) => None,
        }
    }

    /// A new stream over [`raw_bytes`](Self::raw_bytes).
    ///
    /// Every call returns an independent stream positioned at the start.
    #[must_use]
    pub fn stream(&self) -> BodyStream {
        Cursor::new(self.raw_bytes().into_owned())
    }

    /// Form fields of `UrlEncoded` and `Multipart` bodies.
    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::UrlEncoded(params) => Some(params),
            Self::Multipart(multipart) => Some(multipart.params()),
            _ => None,
        }
    }

    /// Mutable form fields of `UrlEncoded` and `Multipart` bodies.
    pub fn params_mut(&mut self) -> Option<&mut Params> {
        match self {
            Self::UrlEncoded(params) => Some(params),
            Self::Multipart(multipart) => Some(multipart.params_mut()),
            _ => None,
        }
    }

    /// Files of a multipart body; `None` when no file is attached.
    #[must_use]
    pub fn files(&self) -> Option<&[(String, FileEntry)]> {
        match self {
            Self::Multipart(multipart) => multipart.files(),
            _ => None,
        }
    }
}

impl From<Multipart> for RequestBody {
    fn from(multipart: Multipart) -> Self {
        Self::Multipart(multipart)
    }
}

impl From<Params> for RequestBody {
    fn from(params: Params) -> Self {
        Self::UrlEncoded(params)
    }
}

/// Lowercased media type of a content type, without parameters.
///
/// For a joined header value (`a/b, c/d`) only the first entry counts.
pub(crate) fn media_type_of(content_type: &str) -> String {
    content_type
        .split([';', ','])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests;
