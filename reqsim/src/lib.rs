//! Synthetic HTTP request environments for tests.
//!
//! `reqsim` builds the flat variable map a web server hands to application
//! code (`REQUEST_METHOD`, `HTTP_HOST`, `CONTENT_TYPE`, ...) without any
//! network traffic, and turns it into a typed [`Request`] with headers,
//! cookies, query params, a body stream, a parsed body and uploaded files.
//!
//! # Quick start
//!
//! ```
//! use reqsim::{Authorization, EnvironmentBuilder, Request, RequestBody};
//!
//! let builder = EnvironmentBuilder::new()
//!     .set_method("POST")
//!     .set_uri("https://api.example.com/users?page=2")?
//!     .add_header("Accept", "application/json")
//!     .set_authorization(Authorization::basic("admin", "secret"))
//!     .set_request_body(RequestBody::json(&serde_json::json!({"name": "Alice"}))?);
//!
//! let env = builder.assemble();
//! assert_eq!(env.get_str("REQUEST_METHOD"), Some("POST"));
//! assert_eq!(env.get_str("HTTPS"), Some("on"));
//!
//! let req = Request::from_builder(&builder)?;
//! assert_eq!(req.user_info(), Some("admin:secret"));
//! assert!(req.is_json());
//! # Ok::<(), reqsim::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`builder`] - [`EnvironmentBuilder`], the fluent entry point
//! - [`environment`] - the assembled variable map
//! - [`body`] - raw, JSON, XML, url-encoded and multipart bodies
//! - [`auth`] - basic and bearer authorization
//! - [`upload`] - upload descriptors for multipart files
//! - [`request`] - the server-side [`Request`] view

pub mod auth;
pub mod body;
pub mod builder;
pub mod constants;
pub mod environment;
pub mod error;
pub mod headers;
pub mod params;
pub mod request;
pub mod upload;

pub use auth::Authorization;
pub use body::{BodyStream, FileEntry, Multipart, RequestBody};
pub use builder::EnvironmentBuilder;
pub use environment::{EnvValue, Environment};
pub use error::{Error, Result};
pub use headers::HeaderMap;
pub use params::Params;
pub use request::{Method, ParsedBody, Request};
pub use upload::{UploadStatus, UploadedFile, resolve_uploads};
