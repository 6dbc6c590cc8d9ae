//! Centralized constants for the reqsim crate.
//!
//! All defaults, fixed tokens, and environment variable names are defined
//! here so the builder, the bodies, and the request factory agree on them.

// ============================================================================
// BUILDER DEFAULTS
// ============================================================================

/// Request method used until `EnvironmentBuilder::set_method` is called.
pub const DEFAULT_METHOD: &str = "GET";

/// Server protocol used until `EnvironmentBuilder::set_protocol` is called.
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// Host used when no URI (or a URI without a host) has been set.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when no URI (or a URI without a port) has been set.
pub const DEFAULT_PORT: u16 = 80;

/// Request path used when no URI has been set.
pub const DEFAULT_PATH: &str = "";

/// Whether a fresh builder describes an HTTPS request.
pub const DEFAULT_IS_HTTPS: bool = false;

/// User agent sent by every fresh builder.
pub const DEFAULT_USER_AGENT: &str = concat!("Reqsim/", env!("CARGO_PKG_VERSION"));

/// Headers every fresh builder starts with, in insertion order.
///
/// `Accept-Encoding` appears twice so that it carries two values.
pub const BASELINE_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", DEFAULT_USER_AGENT),
    ("Accept-Encoding", "gzip"),
    ("Accept-Encoding", "deflate"),
    ("Cache-Control", "no-cache"),
    ("Connection", "keep-alive"),
];

// ============================================================================
// MULTIPART
// ============================================================================

/// Boundary token used by every multipart body.
///
/// Fixed rather than random so assembled environments are reproducible.
pub const MULTIPART_BOUNDARY: &str = "--------------------------477985590996817534165738";

/// Per-field overhead used by the multipart length estimate.
pub const MULTIPART_FIELD_OVERHEAD: usize = 40;

// ============================================================================
// COMMON HEADER NAMES
// ============================================================================

/// Content-Type header name (lowercase for lookups).
pub const HEADER_CONTENT_TYPE: &str = "content-type";

/// Content-Type header name (title-case for setting headers).
pub const HEADER_CONTENT_TYPE_TITLE: &str = "Content-Type";

/// Content-Length header name (title-case for setting headers).
pub const HEADER_CONTENT_LENGTH_TITLE: &str = "Content-Length";

/// Cookie header name (lowercase for lookups).
pub const HEADER_COOKIE: &str = "cookie";

// ============================================================================
// COMMON MIME TYPES
// ============================================================================

/// JSON MIME type.
pub const MIME_JSON: &str = "application/json";

/// XML MIME type.
pub const MIME_XML: &str = "application/xml";

/// Form URL-encoded MIME type.
pub const MIME_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Multipart form-data MIME type (without the boundary parameter).
pub const MIME_MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Fallback MIME type for files whose type cannot be guessed.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

// ============================================================================
// ENVIRONMENT VARIABLE NAMES
// ============================================================================

/// Server protocol (e.g. `HTTP/1.1`).
pub const VAR_SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";

/// `"on"` or `"off"`.
pub const VAR_HTTPS: &str = "HTTPS";

/// Server port.
pub const VAR_SERVER_PORT: &str = "SERVER_PORT";

/// Host name.
pub const VAR_HTTP_HOST: &str = "HTTP_HOST";

/// Request method.
pub const VAR_REQUEST_METHOD: &str = "REQUEST_METHOD";

/// Path plus `?query` when a query is present.
pub const VAR_REQUEST_URI: &str = "REQUEST_URI";

/// Form-encoded query string.
pub const VAR_QUERY_STRING: &str = "QUERY_STRING";

/// Request timestamp with sub-second precision.
pub const VAR_REQUEST_TIME_FLOAT: &str = "REQUEST_TIME_FLOAT";

/// Request timestamp in whole seconds.
pub const VAR_REQUEST_TIME: &str = "REQUEST_TIME";

/// Client address.
pub const VAR_REMOTE_ADDR: &str = "REMOTE_ADDR";

/// Forwarded-for address.
pub const VAR_HTTP_X_FORWARDED_FOR: &str = "HTTP_X_FORWARDED_FOR";

/// Authorization header value.
pub const VAR_HTTP_AUTHORIZATION: &str = "HTTP_AUTHORIZATION";

/// Cookie header value.
pub const VAR_HTTP_COOKIE: &str = "HTTP_COOKIE";

/// Body content type.
pub const VAR_CONTENT_TYPE: &str = "CONTENT_TYPE";

/// Body length.
pub const VAR_CONTENT_LENGTH: &str = "CONTENT_LENGTH";

/// Decoded basic-auth username.
///
/// Some servers name this `PHP_AUTH_USER`; reqsim uses the unprefixed form.
pub const VAR_AUTH_USER: &str = "AUTH_USER";

/// Decoded basic-auth password (`PHP_AUTH_PW` on some servers).
pub const VAR_AUTH_PASSWORD: &str = "AUTH_PASSWORD";

/// Prefix applied to every header turned into a variable.
pub const HEADER_VAR_PREFIX: &str = "HTTP_";
