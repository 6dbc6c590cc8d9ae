//! Multipart form-data bodies (fields plus file uploads).
//!
//! A multipart body is never encoded to the wire. Its fields and files are
//! handed to the request pre-parsed, the same way a server exposes multipart
//! data after it has consumed the body. Only the content type and an
//! estimated length reach the environment.
//!
//! # Example
//!
//! ```no_run
//! use reqsim::body::Multipart;
//!
//! let body = Multipart::new()
//!     .add_param("title", "Quarterly report")
//!     .add_file("report", "fixtures/report.pdf")?;
//!
//! assert_eq!(body.files().map(<[_]>::len), Some(1));
//! # Ok::<(), reqsim::Error>(())
//! ```

use crate::constants::{MIME_MULTIPART_FORM_DATA, MULTIPART_BOUNDARY, MULTIPART_FIELD_OVERHEAD};
use crate::error::{Error, Result};
use crate::params::Params;
use crate::upload::UploadStatus;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A file recorded on a multipart body.
///
/// Everything is captured when the file is added: later changes to the file
/// on disk do not change the recorded size or media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    filename: String,
    media_type: String,
    path: PathBuf,
    status: UploadStatus,
    size: u64,
}

impl FileEntry {
    /// Basename of the source path.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Media type guessed from the file extension.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared upload status.
    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        self.status
    }

    /// File size in bytes when the file was added.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Form fields and files sent as `multipart/form-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipart {
    params: Params,
    files: Vec<(String, FileEntry)>,
}

impl Multipart {
    /// Empty multipart body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Body with the given fields and files.
    ///
    /// Files are `(field, path)` pairs added with [`UploadStatus::Ok`]; the
    /// first missing path fails the whole call.
    pub fn with_files<K, V, F, P>(
        params: impl IntoIterator<Item = (K, V)>,
        files: impl IntoIterator<Item = (F, P)>,
    ) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
        F: Into<String>,
        P: AsRef<Path>,
    {
        let mut body = Self {
            params: params.into_iter().collect(),
            files: Vec::new(),
        };
        for (field, path) in files {
            body = body.add_file(field, path)?;
        }
        Ok(body)
    }

    /// Set a form field.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Remove a form field. Missing names are a no-op.
    #[must_use]
    pub fn remove_param(mut self, name: &str) -> Self {
        self.params.remove(name);
        self
    }

    /// Attach the file at `path` under `field` with [`UploadStatus::Ok`].
    pub fn add_file(self, field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        self.add_file_with_status(field, path, UploadStatus::Ok)
    }

    /// Attach the file at `path` under `field` with an explicit status.
    ///
    /// The file's size and media type are read now. Fails with
    /// [`Error::FileNotFound`] when `path` does not exist, leaving no record.
    /// Attaching to an existing field replaces its file in place.
    pub fn add_file_with_status(
        mut self,
        field: impl Into<String>,
        path: impl AsRef<Path>,
        status: UploadStatus,
    ) -> Result<Self> {
        let field = field.into();
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let entry = FileEntry {
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            media_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            path: path.to_path_buf(),
            status,
            size: metadata.len(),
        };
        tracing::trace!(
            field = %field,
            path = %path.display(),
            size = entry.size,
            "recorded multipart file"
        );

        match self.files.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = entry,
            None => self.files.push((field, entry)),
        }
        Ok(self)
    }

    /// Detach the file under `field`. Missing fields are a no-op.
    #[must_use]
    pub fn remove_file(mut self, field: &str) -> Self {
        self.files.retain(|(name, _)| name != field);
        self
    }

    /// Form fields.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable form fields.
    pub const fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Attached files in the order they were added.
    ///
    /// `None` when no file is attached, so callers can tell "no upload" from
    /// an empty upload set.
    #[must_use]
    pub fn files(&self) -> Option<&[(String, FileEntry)]> {
        if self.files.is_empty() {
            None
        } else {
            Some(&self.files)
        }
    }

    /// The file attached under `field`.
    #[must_use]
    pub fn file(&self, field: &str) -> Option<&FileEntry> {
        self.files
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, entry)| entry)
    }

    /// `multipart/form-data; boundary=<fixed boundary>`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("{MIME_MULTIPART_FORM_DATA}; boundary={MULTIPART_BOUNDARY}")
    }

    /// Estimated encoded length.
    ///
    /// Not a real encoding size. With `B` the boundary length:
    /// - each file adds `(B + 40 + field.len()) * 8 + size`
    /// - each field adds `(B + 40 + name.len() + value.len()) * 8`
    #[must_use]
    pub fn byte_len(&self) -> u64 {
        let overhead = MULTIPART_BOUNDARY.len() + MULTIPART_FIELD_OVERHEAD;
        let files: u64 = self
            .files
            .iter()
            .map(|(field, entry)| ((overhead + field.len()) * 8) as u64 + entry.size)
            .sum();
        let params: u64 = self
            .params
            .iter()
            .map(|(name, value)| ((overhead + name.len() + value.len()) * 8) as u64)
            .sum();
        files + params
    }
}
