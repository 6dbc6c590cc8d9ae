use super::*;
use crate::Error;
use crate::constants::{MIME_OCTET_STREAM, MULTIPART_BOUNDARY};
use crate::upload::UploadStatus;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

fn fixture(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .unwrap();
    file.write_all(content).unwrap();
    file
}

fn read_all(mut stream: BodyStream) -> Vec<u8> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    buf
}

// =========================================================================
// RAW BODIES
// =========================================================================

#[test]
fn test_raw_body() {
    let body = RequestBody::raw("text/csv", "a,b\n1,2\n");
    assert_eq!(body.content_type(), "text/csv");
    assert_eq!(body.byte_len(), 8);
    assert_eq!(body.raw_body(), Some(&b"a,b\n1,2\n"[..]));
    assert!(body.params().is_none());
    assert!(body.files().is_none());
}

#[test]
fn test_raw_length_counts_bytes_not_chars() {
    let body = RequestBody::raw("text/plain; charset=utf-8", "héllo");
    assert_eq!(body.byte_len(), 6);
    assert_eq!(body.media_type(), "text/plain");
}

#[test]
fn test_json_from_value_matches_json_str() {
    let mut data = BTreeMap::new();
    data.insert("var1", "val1");
    data.insert("var2", "val2");

    let built = RequestBody::json(&data).unwrap();
    let verbatim = RequestBody::json_str(r#"{"var1":"val1","var2":"val2"}"#);
    assert_eq!(built, verbatim);
    assert_eq!(built.content_type(), "application/json");
}

#[test]
fn test_json_serde_value() {
    let body = RequestBody::json(&serde_json::json!({"var1": "Value 1", "var2": 2})).unwrap();
    let raw = body.raw_body().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(raw).unwrap();
    assert_eq!(parsed["var2"], 2);
}

#[test]
fn test_json_encoding_failure() {
    // Map keys must serialize as strings.
    let mut data = HashMap::new();
    data.insert(vec![1u8], "value");

    let result = RequestBody::json(&data);
    assert!(matches!(result, Err(Error::Encoding(_))));
}

#[test]
fn test_xml_body() {
    let body = RequestBody::xml("<root><a>1</a></root>");
    assert_eq!(body.content_type(), "application/xml");
    assert_eq!(body.byte_len(), 21);
    assert_eq!(read_all(body.stream()), b"<root><a>1</a></root>");
}

#[test]
fn test_streams_are_independent() {
    let body = RequestBody::json_str(r#"{"a":1}"#);
    let mut first = body.stream();
    let mut head = [0u8; 3];
    first.read_exact(&mut head).unwrap();

    let second = body.stream();
    assert_eq!(second.position(), 0);
    assert_eq!(read_all(second), br#"{"a":1}"#);
    assert_eq!(first.position(), 3);
}

// =========================================================================
// URL-ENCODED BODIES
// =========================================================================

#[test]
fn test_url_encoded_body() {
    let body = RequestBody::url_encoded([("var1", "Value 1"), ("var2", "2"), ("var3", "val_3")]);
    assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
    assert_eq!(&*body.raw_bytes(), b"var1=Value+1&var2=2&var3=val_3");
    assert_eq!(body.byte_len(), 30);
    assert_eq!(body.params().and_then(|p| p.get("var1")), Some("Value 1"));
    assert!(body.raw_body().is_none());
}

#[test]
fn test_url_encoded_params_mut() {
    let mut body = RequestBody::url_encoded([("a", "1")]);
    if let Some(params) = body.params_mut() {
        params.insert("b", "2");
        params.remove("a");
    }
    assert_eq!(&*body.raw_bytes(), b"b=2");
}

// =========================================================================
// MULTIPART BODIES
// =========================================================================

#[test]
fn test_multipart_content_type() {
    let body = RequestBody::from(Multipart::new());
    assert_eq!(
        body.content_type(),
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
    );
    assert_eq!(body.media_type(), "multipart/form-data");
}

#[test]
fn test_multipart_raw_content_is_empty() {
    let file = fixture(b"payload");
    let body = RequestBody::from(
        Multipart::new()
            .add_param("a", "1")
            .add_file("f", file.path())
            .unwrap(),
    );
    assert!(body.raw_bytes().is_empty());
    assert!(read_all(body.stream()).is_empty());
    assert!(body.raw_body().is_none());
}

#[test]
fn test_multipart_length_params_only() {
    let body = Multipart::new().add_param("var1", "val1");
    // (50 + 40 + 4 + 4) * 8
    assert_eq!(body.byte_len(), 784);
}

#[test]
fn test_multipart_length_with_file() {
    let file = fixture(&[0u8; 100]);
    let body = Multipart::new()
        .add_param("name", "x")
        .add_file("upload", file.path())
        .unwrap();

    let boundary = MULTIPART_BOUNDARY.len() as u64;
    let expected_file = (boundary + 40 + 6) * 8 + 100;
    let expected_param = (boundary + 40 + 4 + 1) * 8;
    assert_eq!(body.byte_len(), expected_file + expected_param);
}

#[test]
fn test_multipart_files_none_until_added() {
    let body = Multipart::new().add_param("a", "1");
    assert!(body.files().is_none());

    let file = fixture(b"x");
    let body = body.add_file("f", file.path()).unwrap();
    assert_eq!(body.files().map(<[_]>::len), Some(1));

    let body = body.remove_file("f");
    assert!(body.files().is_none());
}

#[test]
fn test_multipart_add_file_records_metadata() {
    let file = fixture(b"hello world");
    let body = Multipart::new().add_file("file1", file.path()).unwrap();
    let entry = body.file("file1").unwrap();

    assert_eq!(entry.path(), file.path());
    assert_eq!(entry.size(), 11);
    assert_eq!(entry.media_type(), "text/plain");
    assert_eq!(entry.status(), UploadStatus::Ok);
    assert_eq!(
        entry.filename(),
        file.path().file_name().unwrap().to_str().unwrap()
    );
}

#[test]
fn test_multipart_size_snapshot_at_add_time() {
    let mut file = fixture(b"12345");
    let body = Multipart::new().add_file("f", file.path()).unwrap();

    file.write_all(b"more bytes after the fact").unwrap();
    file.flush().unwrap();

    assert_eq!(body.file("f").map(FileEntry::size), Some(5));
}

#[test]
fn test_multipart_add_missing_file() {
    let result = Multipart::new().add_file("f", "/definitely/not/here.txt");
    match result {
        Err(Error::FileNotFound { path }) => {
            assert_eq!(path, std::path::Path::new("/definitely/not/here.txt"));
        },
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_multipart_unknown_extension_is_octet_stream() {
    let file = tempfile::Builder::new()
        .suffix(".zzunknown")
        .tempfile()
        .unwrap();
    let body = Multipart::new().add_file("f", file.path()).unwrap();
    assert_eq!(
        body.file("f").map(FileEntry::media_type),
        Some(MIME_OCTET_STREAM)
    );
}

#[test]
fn test_multipart_with_files() {
    let one = fixture(b"1");
    let two = fixture(b"22");
    let body = Multipart::with_files(
        [("var1", "val1")],
        [("file1", one.path()), ("file2", two.path())],
    )
    .unwrap();

    assert_eq!(body.params().get("var1"), Some("val1"));
    assert_eq!(body.files().map(<[_]>::len), Some(2));
    assert_eq!(body.file("file2").map(FileEntry::size), Some(2));
}

#[test]
fn test_multipart_with_files_fails_on_missing() {
    let one = fixture(b"1");
    let result = Multipart::with_files(
        Vec::<(String, String)>::new(),
        [
            ("file1", one.path().to_path_buf()),
            ("file2", std::path::PathBuf::from("/nope/missing.txt")),
        ],
    );
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[test]
fn test_multipart_same_field_replaces_file() {
    let one = fixture(b"1");
    let two = fixture(b"22");
    let body = Multipart::new()
        .add_file("f", one.path())
        .unwrap()
        .add_file("f", two.path())
        .unwrap();

    assert_eq!(body.files().map(<[_]>::len), Some(1));
    assert_eq!(body.file("f").map(FileEntry::size), Some(2));
}

#[test]
fn test_multipart_remove_param() {
    let body = Multipart::new()
        .add_param("a", "1")
        .add_param("b", "2")
        .remove_param("a")
        .remove_param("missing");
    assert_eq!(body.params().len(), 1);
    assert_eq!(body.params().get("b"), Some("2"));
}

proptest! {
    /// Multipart length follows the estimate formula for any field set.
    #[test]
    fn multipart_length_matches_formula(
        fields in prop::collection::vec(("[a-z]{1,12}", "[ -~]{0,40}"), 0..8)
    ) {
        let mut body = Multipart::new();
        for (name, value) in &fields {
            body = body.add_param(name.clone(), value.clone());
        }

        let boundary = MULTIPART_BOUNDARY.len() as u64;
        let expected: u64 = body
            .params()
            .iter()
            .map(|(n, v)| (boundary + 40 + n.len() as u64 + v.len() as u64) * 8)
            .sum();
        prop_assert_eq!(body.byte_len(), expected);
    }

    /// Url-encoded bodies decode back to their params.
    #[test]
    fn url_encoded_decodes_to_params(
        fields in prop::collection::vec(("[a-zA-Z0-9]{1,10}", ".{0,20}"), 0..10)
    ) {
        let body = RequestBody::url_encoded(fields);
        let raw = String::from_utf8(body.raw_bytes().into_owned()).unwrap();
        prop_assert_eq!(Some(&Params::parse(&raw)), body.params());
    }
}

#[test]
fn test_media_type_of_joined_value() {
    assert_eq!(
        media_type_of("Application/JSON, application/x-www-form-urlencoded"),
        "application/json"
    );
    assert_eq!(media_type_of("text/plain; charset=utf-8"), "text/plain");
    assert_eq!(media_type_of(""), "");
}
