//! Server-side request view built from an assembled environment.
//!
//! [`Request::from_builder`] assembles a builder's environment and reads it
//! back the way a server would: method and URI from the request line
//! variables, headers from every `HTTP_*` variable, cookies from the
//! `Cookie` header, and body, parsed body and uploads from the builder's
//! [`RequestBody`].
//!
//! # Example
//!
//! ```
//! use reqsim::{EnvironmentBuilder, Method, Request, RequestBody};
//!
//! let builder = EnvironmentBuilder::new()
//!     .set_method("POST")
//!     .set_uri("/users?page=2")?
//!     .add_cookie("session", "abc")
//!     .set_request_body(RequestBody::url_encoded([("name", "Alice")]));
//!
//! let req = Request::from_builder(&builder)?;
//! assert_eq!(req.method(), Method::Post);
//! assert_eq!(req.query("page"), Some("2"));
//! assert_eq!(req.cookie("session"), Some("abc"));
//! assert!(req.is_form());
//! # Ok::<(), reqsim::Error>(())
//! ```

mod cookie;

use cookie::parse_cookie_header;

use crate::body::{BodyStream, RequestBody, media_type_of};
use crate::builder::EnvironmentBuilder;
use crate::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROTOCOL, HEADER_CONTENT_LENGTH_TITLE, HEADER_CONTENT_TYPE,
    HEADER_CONTENT_TYPE_TITLE, HEADER_COOKIE, MIME_FORM_URLENCODED, MIME_JSON,
    MIME_MULTIPART_FORM_DATA, VAR_AUTH_PASSWORD, VAR_AUTH_USER, VAR_CONTENT_LENGTH,
    VAR_CONTENT_TYPE, VAR_HTTP_HOST, VAR_HTTPS, VAR_QUERY_STRING, VAR_REQUEST_METHOD,
    VAR_REQUEST_URI, VAR_SERVER_PORT, VAR_SERVER_PROTOCOL,
};
use crate::environment::{EnvValue, Environment};
use crate::error::{Error, Result};
use crate::headers::{HeaderMap, header_name_from_var};
use crate::params::Params;
use crate::upload::{UploadedFile, resolve_uploads};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Method {
    /// HTTP GET method - retrieve a resource.
    Get,
    /// HTTP POST method - create a resource.
    Post,
    /// HTTP PUT method - replace a resource.
    Put,
    /// HTTP PATCH method - partially update a resource.
    Patch,
    /// HTTP DELETE method - remove a resource.
    Delete,
    /// HTTP HEAD method - retrieve headers only.
    Head,
    /// HTTP OPTIONS method - retrieve allowed methods.
    Options,
    /// HTTP TRACE method - loop-back test.
    Trace,
    /// HTTP CONNECT method - open a tunnel.
    Connect,
}

impl Method {
    /// Returns the method as an uppercase string (e.g., "GET", "POST").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parse a method name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// A request body decoded into structured data.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParsedBody {
    /// Form fields (url-encoded or multipart).
    Form(Params),
    /// A JSON document.
    Json(serde_json::Value),
}

/// Server-side view of a simulated request.
///
/// Headers are looked up case-insensitively. The body can be read any number
/// of times: [`body`](Self::body) returns a fresh stream on every call.
#[derive(Clone)]
pub struct Request {
    method: Method,
    protocol: String,
    https: bool,
    host: String,
    port: u16,
    path: String,
    query_string: String,
    user_info: Option<String>,
    headers: HeaderMap,
    media_type: Option<String>,
    cookies: Params,
    query: Params,
    server_params: Environment,
    body: Vec<u8>,
    parsed_body: Option<ParsedBody>,
    uploaded_files: Vec<UploadedFile>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Server params repeat everything else; only count them.
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri())
            .field("headers", &self.headers.len())
            .field("cookies", &self.cookies.len())
            .field("body", &self.body.len())
            .field("uploaded_files", &self.uploaded_files.len())
            .field("server_params", &self.server_params.len())
            .finish_non_exhaustive()
    }
}

impl Request {
    /// Assemble `builder` and build the request a server would see.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMethod`] when the configured method is not a known
    /// HTTP method.
    pub fn from_builder(builder: &EnvironmentBuilder) -> Result<Self> {
        Self::from_environment(builder.assemble(), builder.request_body())
    }

    /// Build a request from an environment and the body it was assembled with.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMethod`] when `REQUEST_METHOD` is missing or not a
    /// known HTTP method.
    pub fn from_environment(env: Environment, body: Option<&RequestBody>) -> Result<Self> {
        let raw_method = env.get_or(VAR_REQUEST_METHOD, "");
        let method = raw_method.parse::<Method>().inspect_err(|_| {
            tracing::debug!(method = %raw_method, "rejected request method");
        })?;

        let request_uri = env.get_or(VAR_REQUEST_URI, "");
        let path = request_uri
            .split_once('?')
            .map_or(request_uri.as_str(), |(path, _)| path)
            .to_string();
        let query_string = env.get_or(VAR_QUERY_STRING, "");
        let port = env
            .get_int(VAR_SERVER_PORT)
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(DEFAULT_PORT);

        let headers = headers_from_env(&env);
        let cookies = headers
            .get_joined(HEADER_COOKIE)
            .map(|header| parse_cookie_header(&header))
            .unwrap_or_default();

        let media_type = env
            .get_str(VAR_CONTENT_TYPE)
            .map(media_type_of)
            .filter(|media_type| !media_type.is_empty());
        let parsed_body = body.and_then(|body| parse_body(method, media_type.as_deref(), body));
        let uploaded_files = resolve_uploads(body);

        tracing::debug!(
            method = %method,
            path = %path,
            headers = headers.len(),
            media_type = media_type.as_deref().unwrap_or(""),
            uploads = uploaded_files.len(),
            "built request from environment"
        );

        Ok(Self {
            method,
            protocol: env.get_or(VAR_SERVER_PROTOCOL, DEFAULT_PROTOCOL),
            https: env.get_str(VAR_HTTPS) == Some("on"),
            host: env.get_or(VAR_HTTP_HOST, DEFAULT_HOST),
            port,
            path,
            query: Params::parse(&query_string),
            query_string,
            user_info: user_info_from_env(&env),
            headers,
            media_type,
            cookies,
            body: body.map(|body| body.raw_bytes().into_owned()).unwrap_or_default(),
            parsed_body,
            uploaded_files,
            server_params: env,
        })
    }

    // =========================================================================
    // Request line and URI
    // =========================================================================

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Protocol from `SERVER_PROTOCOL` (e.g. `HTTP/1.1`).
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// `https` or `http`.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.https { "https" } else { "http" }
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

    /// Request path; an empty path reads as `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        if self.path.is_empty() { "/" } else { &self.path }
    }

    /// Raw query string without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// `user:password` from basic authorization, if any.
    #[must_use]
    pub fn user_info(&self) -> Option<&str> {
        self.user_info.as_deref()
    }

    /// Full request URI.
    ///
    /// The port is omitted when it is the default for the scheme.
    #[must_use]
    pub fn uri(&self) -> String {
        let mut uri = format!("{}://", self.scheme());
        if let Some(user_info) = &self.user_info {
            uri.push_str(user_info);
            uri.push('@');
        }
        uri.push_str(&self.host);
        let default_port = if self.https { 443 } else { 80 };
        if self.port != default_port {
            uri.push_str(&format!(":{}", self.port));
        }
        uri.push_str(self.path());
        if !self.query_string.is_empty() {
            uri.push('?');
            uri.push_str(&self.query_string);
        }
        uri
    }

    // =========================================================================
    // Query, headers, cookies
    // =========================================================================

    /// Query parameter value.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name)
    }

    /// All query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Params {
        &self.query
    }

    /// First value of a header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    /// All values of a header (case-insensitive); empty when missing.
    #[must_use]
    pub fn header_all(&self, name: &str) -> &[String] {
        self.headers.get(name).unwrap_or_default()
    }

    /// Whether a header is present (case-insensitive).
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// All headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded cookie value.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name)
    }

    /// All decoded cookies.
    #[must_use]
    pub const fn cookies(&self) -> &Params {
        &self.cookies
    }

    /// The full environment the request was built from.
    #[must_use]
    pub const fn server_params(&self) -> &Environment {
        &self.server_params
    }

    /// A single environment variable.
    #[must_use]
    pub fn server_param(&self, name: &str) -> Option<&EnvValue> {
        self.server_params.get(name)
    }

    // =========================================================================
    // Body
    // =========================================================================

    /// A fresh stream over the body, positioned at the start.
    ///
    /// Empty for multipart bodies and requests without a body.
    #[must_use]
    pub fn body(&self) -> BodyStream {
        Cursor::new(self.body.clone())
    }

    /// Body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, if valid.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Body decoded into form fields or JSON, when the content type allows.
    #[must_use]
    pub const fn parsed_body(&self) -> Option<&ParsedBody> {
        self.parsed_body.as_ref()
    }

    /// Files uploaded with a multipart body, in the order they were added.
    #[must_use]
    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded_files
    }

    /// The upload sent under `field`.
    #[must_use]
    pub fn uploaded_file(&self, field: &str) -> Option<&UploadedFile> {
        self.uploaded_files.iter().find(|file| file.field() == field)
    }

    /// Content type from the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(HEADER_CONTENT_TYPE)
    }

    /// Media type from `CONTENT_TYPE`: the first entry, lowercased, without
    /// parameters.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Whether the media type is `application/json`.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.media_type() == Some(MIME_JSON)
    }

    /// Whether the media type is url-encoded or multipart form data.
    #[must_use]
    pub fn is_form(&self) -> bool {
        self.media_type()
            .is_some_and(|mt| mt == MIME_FORM_URLENCODED || mt == MIME_MULTIPART_FORM_DATA)
    }
}

/// Rebuild headers from `HTTP_*` variables plus `CONTENT_TYPE` and `CONTENT_LENGTH`.
fn headers_from_env(env: &Environment) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (var, value) in env.iter() {
        if value.is_absent() {
            continue;
        }
        let name = match var {
            VAR_CONTENT_TYPE => Some(HEADER_CONTENT_TYPE_TITLE.to_string()),
            VAR_CONTENT_LENGTH => Some(HEADER_CONTENT_LENGTH_TITLE.to_string()),
            _ => header_name_from_var(var),
        };
        if let Some(name) = name {
            headers.add(name, value.to_string());
        }
    }
    headers
}

fn user_info_from_env(env: &Environment) -> Option<String> {
    let user = env.get_str(VAR_AUTH_USER)?;
    match env.get_str(VAR_AUTH_PASSWORD) {
        Some(password) if !password.is_empty() => Some(format!("{user}:{password}")),
        _ => Some(user.to_string()),
    }
}

/// Decode `body` according to the request's media type.
///
/// POSTed forms hand over the body's own params; other JSON and url-encoded
/// requests are parsed from the raw bytes.
fn parse_body(method: Method, media_type: Option<&str>, body: &RequestBody) -> Option<ParsedBody> {
    let media_type = media_type?;
    let is_form = media_type == MIME_FORM_URLENCODED || media_type == MIME_MULTIPART_FORM_DATA;
    if method == Method::Post
        && is_form
        && let Some(params) = body.params()
    {
        return Some(ParsedBody::Form(params.clone()));
    }

    match media_type {
        MIME_JSON => match serde_json::from_slice(&body.raw_bytes()) {
            Ok(value) => Some(ParsedBody::Json(value)),
            Err(err) => {
                tracing::debug!(error = %err, "request body is not valid JSON");
                None
            },
        },
        MIME_FORM_URLENCODED => Some(ParsedBody::Form(Params::parse(
            &String::from_utf8_lossy(&body.raw_bytes()),
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
