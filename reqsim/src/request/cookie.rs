//! Parsing of the `Cookie` request header.

use crate::params::{Params, url_decode};

/// Parse a `Cookie` header (`a=1; b=two+words`) into decoded name/value pairs.
///
/// Pairs without `=` or with an empty name are skipped. Repeated names keep
/// the last value.
pub(crate) fn parse_cookie_header(header: &str) -> Params {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), url_decode(value.trim())))
        })
        .collect()
}
