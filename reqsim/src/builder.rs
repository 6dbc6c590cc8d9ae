//! Fluent builder for simulated request environments.
//!
//! # Example
//!
//! ```
//! use reqsim::{Authorization, EnvironmentBuilder, RequestBody};
//!
//! let builder = EnvironmentBuilder::new()
//!     .set_method("POST")
//!     .set_uri("https://api.example.com/users?page=2")?
//!     .add_get_param("limit", "10")
//!     .add_header("Accept", "application/json")
//!     .add_cookie("session", "abc 123")
//!     .set_authorization(Authorization::bearer("token"))
//!     .set_request_body(RequestBody::json_str(r#"{"name":"Alice"}"#));
//!
//! let env = builder.assemble();
//! assert_eq!(env.get_str("HTTPS"), Some("on"));
//! assert_eq!(env.get_str("REQUEST_URI"), Some("/users?page=2&limit=10"));
//! assert_eq!(env.get_str("HTTP_COOKIE"), Some("session=abc+123"));
//! assert_eq!(env.get_str("CONTENT_TYPE"), Some("application/json"));
//! assert_eq!(env.get_int("CONTENT_LENGTH"), Some(16));
//! # Ok::<(), reqsim::Error>(())
//! ```

use crate::auth::Authorization;
use crate::body::RequestBody;
use crate::constants::{
    BASELINE_HEADERS, DEFAULT_HOST, DEFAULT_IS_HTTPS, DEFAULT_METHOD, DEFAULT_PATH, DEFAULT_PORT,
    DEFAULT_PROTOCOL, HEADER_CONTENT_TYPE, HEADER_CONTENT_TYPE_TITLE, VAR_CONTENT_LENGTH,
    VAR_CONTENT_TYPE, VAR_HTTP_AUTHORIZATION, VAR_HTTP_COOKIE, VAR_HTTP_HOST,
    VAR_HTTP_X_FORWARDED_FOR, VAR_HTTPS, VAR_QUERY_STRING, VAR_REMOTE_ADDR, VAR_REQUEST_METHOD,
    VAR_REQUEST_TIME, VAR_REQUEST_TIME_FLOAT, VAR_REQUEST_URI, VAR_SERVER_PORT,
    VAR_SERVER_PROTOCOL,
};
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::headers::{HeaderMap, env_var_name};
use crate::params::{Params, url_encode};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Builder for a simulated request environment.
///
/// Configure it with the `set_*`, `add_*` and `remove_*` methods, then call
/// [`assemble`](Self::assemble) to produce the variable map. Assembling does
/// not consume or change the builder, so it can be adjusted and assembled
/// again.
///
/// A fresh builder describes `GET http://localhost:80` over `HTTP/1.1` with a
/// baseline set of `User-Agent`, `Accept-Encoding`, `Cache-Control` and
/// `Connection` headers.
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
    method: String,
    protocol: String,
    // Reset together by `set_uri`.
    https: bool,
    host: String,
    port: u16,
    path: String,
    remote_addr: Option<String>,
    forwarded_for: Option<String>,
    headers: HeaderMap,
    cookies: Params,
    query: Params,
    authorization: Option<Authorization>,
    body: Option<RequestBody>,
}

/// Components pulled out of a URI before any builder state changes.
#[derive(Debug, Default)]
struct UriParts {
    https: bool,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
}

impl Default for EnvironmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentBuilder {
    /// Create a builder with the default request line and baseline headers.
    #[must_use]
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in BASELINE_HEADERS {
            headers.add(*name, *value);
        }
        Self {
            method: DEFAULT_METHOD.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            https: DEFAULT_IS_HTTPS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            remote_addr: None,
            forwarded_for: None,
            headers,
            cookies: Params::new(),
            query: Params::new(),
            authorization: None,
            body: None,
        }
    }

    // =========================================================================
    // Request line
    // =========================================================================

    /// Set the request method.
    ///
    /// Any string is accepted, including invalid methods.
    #[must_use]
    pub fn set_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the server protocol (e.g. `HTTP/2.0`).
    #[must_use]
    pub fn set_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Set the client address reported as `REMOTE_ADDR`.
    #[must_use]
    pub fn set_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Set the address reported as `HTTP_X_FORWARDED_FOR`.
    #[must_use]
    pub fn set_forwarded_for(mut self, addr: impl Into<String>) -> Self {
        self.forwarded_for = Some(addr.into());
        self
    }

    /// Set the request URI.
    ///
    /// Accepts absolute URIs (`https://host:8443/path?q=1`) and relative
    /// references (`/path?q=1`). HTTPS, host, port and path are reset to
    /// their defaults and then taken from `uri`. Query parameters are merged
    /// into the existing GET params instead of replacing them, so params
    /// from earlier calls survive unless `uri` sets the same name.
    ///
    /// Fails with [`Error::MalformedUri`]. Use [`update_uri`](Self::update_uri)
    /// to keep the builder when the URI may be rejected.
    pub fn set_uri(mut self, uri: &str) -> Result<Self> {
        self.update_uri(uri)?;
        Ok(self)
    }

    /// In-place form of [`set_uri`](Self::set_uri).
    ///
    /// On error the builder is left exactly as it was.
    pub fn update_uri(&mut self, uri: &str) -> Result<()> {
        let parts = parse_uri(uri)?;

        self.https = parts.https;
        self.host = parts.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        self.port = parts.port.unwrap_or(DEFAULT_PORT);
        self.path = parts.path;
        if let Some(query) = parts.query {
            self.query.extend(Params::parse(&query).iter());
        }

        tracing::debug!(
            uri,
            host = %self.host,
            port = self.port,
            https = self.https,
            "parsed request uri"
        );
        Ok(())
    }

    // =========================================================================
    // Query parameters
    // =========================================================================

    /// Set a GET parameter.
    #[must_use]
    pub fn add_get_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name, value);
        self
    }

    /// Set several GET parameters.
    #[must_use]
    pub fn add_get_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(params);
        self
    }

    /// Remove a GET parameter. Missing names are a no-op.
    #[must_use]
    pub fn remove_get_param(mut self, name: &str) -> Self {
        self.query.remove(name);
        self
    }

    // =========================================================================
    // Headers and cookies
    // =========================================================================

    /// Add a header value. Repeating an existing value has no effect.
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Remove a header with all its values.
    #[must_use]
    pub fn remove_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Remove one value of a header, keeping its other values.
    ///
    /// Removing the last value removes the header itself: [`Self::assemble`]
    /// then emits no `HTTP_<NAME>` variable for it.
    #[must_use]
    pub fn remove_header_value(mut self, name: &str, value: &str) -> Self {
        self.headers.remove_value(name, value);
        self
    }

    /// Set a cookie.
    #[must_use]
    pub fn add_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name, value);
        self
    }

    /// Remove a cookie. Missing names are a no-op.
    #[must_use]
    pub fn remove_cookie(mut self, name: &str) -> Self {
        self.cookies.remove(name);
        self
    }

    // =========================================================================
    // Authorization and body
    // =========================================================================

    /// Set the authorization scheme, replacing any previous one.
    #[must_use]
    pub fn set_authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Clear the authorization scheme.
    #[must_use]
    pub fn remove_authorization(mut self) -> Self {
        self.authorization = None;
        self
    }

    /// Set the request body, replacing any previous one.
    #[must_use]
    pub fn set_request_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Clear the request body.
    #[must_use]
    pub fn remove_request_body(mut self) -> Self {
        self.body = None;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Configured method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Configured protocol.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Whether the request is over HTTPS.
    #[must_use]
    pub const fn is_https(&self) -> bool {
        self.https
    }

    /// Host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Configured headers (the body's content type is not included).
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Configured cookies.
    #[must_use]
    pub const fn cookies(&self) -> &Params {
        &self.cookies
    }

    /// Configured GET parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Params {
        &self.query
    }

    /// Configured authorization scheme.
    #[must_use]
    pub const fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    /// Configured request body.
    #[must_use]
    pub const fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    /// Produce the environment variables for the current configuration.
    ///
    /// Variables appear in this order:
    ///
    /// 1. Request line and connection: `SERVER_PROTOCOL`, `HTTPS`,
    ///    `SERVER_PORT`, `HTTP_HOST`, `REQUEST_METHOD`, `REQUEST_URI`,
    ///    `QUERY_STRING`, `REQUEST_TIME_FLOAT`, `REQUEST_TIME`,
    ///    `REMOTE_ADDR`, `HTTP_X_FORWARDED_FOR`.
    /// 2. `HTTP_AUTHORIZATION` and the scheme's implied variables.
    /// 3. `HTTP_COOKIE`, when any cookie is set.
    /// 4. One `HTTP_<NAME>` per header, values joined with `", "`. A body
    ///    adds its content type as a `Content-Type` header value first.
    /// 5. `CONTENT_TYPE` (from the `Content-Type` header) and
    ///    `CONTENT_LENGTH` (from the body).
    ///
    /// Only the `REQUEST_TIME*` values differ between calls.
    #[must_use]
    pub fn assemble(&self) -> Environment {
        let query = self.query.to_query_string();
        let request_uri = if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        };
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        let mut env = Environment::new();
        env.insert(VAR_SERVER_PROTOCOL, self.protocol.as_str());
        env.insert(VAR_HTTPS, if self.https { "on" } else { "off" });
        env.insert(VAR_SERVER_PORT, i64::from(self.port));
        env.insert(VAR_HTTP_HOST, self.host.as_str());
        env.insert(VAR_REQUEST_METHOD, self.method.as_str());
        env.insert(VAR_REQUEST_URI, request_uri);
        env.insert(VAR_QUERY_STRING, query);
        env.insert(VAR_REQUEST_TIME_FLOAT, now.as_secs_f64());
        env.insert(VAR_REQUEST_TIME, saturating_i64(now.as_secs()));
        env.insert(VAR_REMOTE_ADDR, self.remote_addr.clone());
        env.insert(VAR_HTTP_X_FORWARDED_FOR, self.forwarded_for.clone());

        if let Some(auth) = &self.authorization {
            env.insert(VAR_HTTP_AUTHORIZATION, auth.header_value());
            for (name, value) in auth.implied_vars() {
                env.insert(name, value);
            }
        }

        if !self.cookies.is_empty() {
            env.insert(VAR_HTTP_COOKIE, self.cookie_header());
        }

        let mut headers = self.headers.clone();
        let mut content_length = None;
        if let Some(body) = &self.body {
            headers.add(HEADER_CONTENT_TYPE_TITLE, body.content_type().into_owned());
            content_length = Some(saturating_i64(body.byte_len()));
        }

        let mut content_type = None;
        for (name, values) in headers.iter() {
            let joined = values.join(", ");
            if name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE) {
                content_type = Some(joined.clone());
            }
            env.insert(env_var_name(name), joined);
        }

        env.insert(VAR_CONTENT_TYPE, content_type);
        env.insert(VAR_CONTENT_LENGTH, content_length);

        tracing::debug!(
            vars = env.len(),
            headers = headers.len(),
            has_body = self.body.is_some(),
            has_authorization = self.authorization.is_some(),
            "assembled request environment"
        );
        env
    }

    /// `name=value` cookie pairs joined with `"; "`, values form-encoded.
    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={}", url_encode(value)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Split `uri` into the parts the builder tracks.
///
/// Absolute URIs are validated with [`Url`], but host, port and path are
/// taken from the input as written: no case folding, dot-segment removal,
/// percent-encoding or default-port elision. Relative references are split
/// the same way.
fn parse_uri(uri: &str) -> Result<UriParts> {
    let https = match Url::parse(uri) {
        Ok(url) => url.scheme().eq_ignore_ascii_case("https"),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let (path, query) = split_path_and_query(uri);
            return Ok(UriParts {
                path: path.to_string(),
                query,
                ..UriParts::default()
            });
        },
        Err(source) => {
            return Err(Error::MalformedUri {
                uri: uri.to_string(),
                source,
            });
        },
    };

    // `Url::parse` accepted it, so a scheme and `:` are present.
    let rest = uri
        .trim()
        .split_once(':')
        .map_or("", |(_, rest)| rest);
    let (hier, query) = split_path_and_query(rest);
    let (host, port, path) = match hier.strip_prefix("//") {
        Some(authority_and_path) => {
            let (authority, path) = authority_and_path
                .find('/')
                .map_or((authority_and_path, ""), |idx| authority_and_path.split_at(idx));
            let (host, port) = split_host_port(authority);
            (host, port, path)
        },
        None => (None, None, hier),
    };

    Ok(UriParts {
        https,
        host: host.map(str::to_string),
        port,
        path: path.to_string(),
        query,
    })
}

/// `path?query#fragment` into the path and the query; the fragment is dropped.
fn split_path_and_query(input: &str) -> (&str, Option<String>) {
    let without_fragment = input.split_once('#').map_or(input, |(before, _)| before);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (without_fragment, None),
    }
}

/// `user@host:port` into the host and the written port, if any.
fn split_host_port(authority: &str) -> (Option<&str>, Option<u16>) {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (host, port) = if host_port.starts_with('[') {
        // IPv6 literal: the port follows the closing bracket.
        match host_port.split_once(']') {
            Some((addr, tail)) => (
                host_port.get(..=addr.len()).unwrap_or(host_port),
                tail.strip_prefix(':'),
            ),
            None => (host_port, None),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    let host = (!host.is_empty()).then_some(host);
    (host, port.and_then(|port| port.parse().ok()))
}
