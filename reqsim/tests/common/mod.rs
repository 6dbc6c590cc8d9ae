//! Shared test utilities and fixtures.
//!
//! This module provides common helpers for integration tests.

use reqsim::{EnvironmentBuilder, Params};
use std::path::PathBuf;
use std::sync::Once;

/// Form fields shared by the body tests.
#[allow(dead_code)]
pub const ENTITY_BODY_DATA: [(&str, &str); 3] =
    [("var1", "Value 1"), ("var2", "2"), ("var3", "val_3")];

/// `ENTITY_BODY_DATA` as params.
#[allow(dead_code)]
pub fn entity_params() -> Params {
    ENTITY_BODY_DATA.into_iter().collect()
}

/// Path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A POST builder aimed at `uri`.
#[allow(dead_code)]
pub fn post(uri: &str) -> EnvironmentBuilder {
    EnvironmentBuilder::new()
        .set_method("POST")
        .set_uri(uri)
        .unwrap()
}

/// Route library logs to the test writer once per binary.
#[allow(dead_code)]
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
