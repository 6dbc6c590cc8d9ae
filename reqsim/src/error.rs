//! Error types for environment assembly and request construction.

use std::path::PathBuf;

/// Errors raised while configuring a builder or turning it into a request.
///
/// Every error is raised synchronously by the call that caused it; nothing
/// is deferred to `assemble()`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `set_uri` was given a string that does not parse as a URI.
    #[error("invalid URI `{uri}`: {source}")]
    MalformedUri {
        /// The rejected input.
        uri: String,
        /// Parser diagnostic.
        #[source]
        source: url::ParseError,
    },

    /// A multipart file was added from a path that does not exist.
    #[error("file `{}` not found", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Reading a file's metadata or opening it failed.
    #[error("i/o error on `{}`: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The request factory does not know the configured method.
    ///
    /// The builder accepts any method string; only request construction
    /// rejects unknown ones.
    #[error("unsupported HTTP method `{0}`")]
    InvalidMethod(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
