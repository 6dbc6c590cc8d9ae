//! Uploaded-file descriptors resolved from multipart bodies.
//!
//! A multipart body records its files when they are added (name, media
//! type, size, status). [`resolve_uploads`] turns those records into
//! [`UploadedFile`] values, which are what a request handler sees. The file
//! itself is only opened when a handler reads it.

use crate::body::RequestBody;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Outcome of a file upload, using the conventional status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum UploadStatus {
    /// The upload succeeded (code 0).
    #[default]
    Ok,
    /// The file exceeds the server's size limit (code 1).
    IniSize,
    /// The file exceeds the form's declared size limit (code 2).
    FormSize,
    /// The file was only partially uploaded (code 3).
    Partial,
    /// No file was uploaded (code 4).
    NoFile,
    /// No temporary directory was available (code 6).
    NoTmpDir,
    /// The file could not be written to disk (code 7).
    CantWrite,
    /// A server extension stopped the upload (code 8).
    Extension,
}

impl UploadStatus {
    /// Numeric status code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::IniSize => 1,
            Self::FormSize => 2,
            Self::Partial => 3,
            Self::NoFile => 4,
            Self::NoTmpDir => 6,
            Self::CantWrite => 7,
            Self::Extension => 8,
        }
    }

    /// Status for a numeric code. Code 5 and codes above 8 are undefined.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::IniSize),
            2 => Some(Self::FormSize),
            3 => Some(Self::Partial),
            4 => Some(Self::NoFile),
            6 => Some(Self::NoTmpDir),
            7 => Some(Self::CantWrite),
            8 => Some(Self::Extension),
            _ => None,
        }
    }

    /// Whether this status describes a successful upload.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// A file attached to a request, as a handler would receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    field: String,
    path: PathBuf,
    client_filename: String,
    client_media_type: String,
    size: u64,
    status: UploadStatus,
}

impl UploadedFile {
    /// Form field the file was attached under.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Where the file's content lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original filename (basename of the source path).
    #[must_use]
    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    /// Media type recorded when the file was added.
    #[must_use]
    pub fn client_media_type(&self) -> &str {
        &self.client_media_type
    }

    /// Size recorded when the file was added.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Upload status.
    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        self.status
    }

    /// Whether the upload resolved without error.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.status.is_ok()
    }

    /// Open the file for reading.
    pub fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the file's current content.
    pub fn contents(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open()?
            .read_to_end(&mut buf)
            .map_err(|source| Error::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(buf)
    }
}

/// Resolve the files of a multipart body into upload descriptors.
///
/// Returns an empty list when there is no body, the body is not multipart,
/// or it carries no files. Descriptors keep the order the files were added.
#[must_use]
pub fn resolve_uploads(body: Option<&RequestBody>) -> Vec<UploadedFile> {
    let Some(files) = body.and_then(RequestBody::files) else {
        return Vec::new();
    };
    files
        .iter()
        .map(|(field, entry)| UploadedFile {
            field: field.clone(),
            path: entry.path().to_path_buf(),
            client_filename: entry.filename().to_string(),
            client_media_type: entry.media_type().to_string(),
            size: entry.size(),
            status: entry.status(),
        })
        .collect()
}
