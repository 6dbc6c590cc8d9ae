//! HTTP authorization schemes.
//!
//! A scheme contributes two things to an assembled environment: the
//! `Authorization` header value, and any variables a server would derive from
//! it (decoded basic-auth credentials).
//!
//! Empty usernames, passwords, and tokens are accepted so that invalid
//! credentials can be simulated on purpose.
//!
//! Basic credentials land in `AUTH_USER` and `AUTH_PASSWORD`, not the
//! `PHP_AUTH_USER` / `PHP_AUTH_PW` pair some servers populate.

use crate::constants::{VAR_AUTH_PASSWORD, VAR_AUTH_USER};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// An authorization scheme attached to a request.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Authorization {
    /// `Authorization: Basic base64(username:password)`.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// `Authorization: Bearer <token>`.
    Bearer {
        /// Opaque token.
        token: String,
    },
}

impl Authorization {
    /// Basic authorization with the given credentials.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token authorization.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Scheme name as it appears in the header (`Basic`, `Bearer`).
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "Basic",
            Self::Bearer { .. } => "Bearer",
        }
    }

    /// The `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            },
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }

    /// Variables a server derives from this scheme beyond the header itself.
    #[must_use]
    pub fn implied_vars(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Basic { username, password } => vec![
                (VAR_AUTH_USER, username.clone()),
                (VAR_AUTH_PASSWORD, password.clone()),
            ],
            Self::Bearer { .. } => Vec::new(),
        }
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets stay out of logs.
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_value_decodes() {
        let auth = Authorization::basic("u", "p");
        let header = auth.header_value();
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"u:p");
    }

    #[test]
    fn test_basic_known_encoding() {
        let auth = Authorization::basic("myuser", "mypass");
        assert_eq!(auth.header_value(), "Basic bXl1c2VyOm15cGFzcw==");
    }

    #[test]
    fn test_basic_implied_vars() {
        let auth = Authorization::basic("u", "p");
        assert_eq!(
            auth.implied_vars(),
            vec![(VAR_AUTH_USER, "u".to_string()), (VAR_AUTH_PASSWORD, "p".to_string())]
        );
    }

    #[test]
    fn test_bearer() {
        let auth = Authorization::bearer("my_big_log_token");
        assert_eq!(auth.header_value(), "Bearer my_big_log_token");
        assert!(auth.implied_vars().is_empty());
        assert_eq!(auth.scheme(), "Bearer");
    }

    #[test]
    fn test_empty_credentials_accepted() {
        let auth = Authorization::basic("", "");
        assert_eq!(auth.header_value(), "Basic Og==");
        assert_eq!(Authorization::bearer("").header_value(), "Bearer ");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let basic = format!("{:?}", Authorization::basic("alice", "hunter2"));
        assert!(basic.contains("alice"));
        assert!(!basic.contains("hunter2"));

        let bearer = format!("{:?}", Authorization::bearer("secret-token"));
        assert!(!bearer.contains("secret-token"));
    }
}
