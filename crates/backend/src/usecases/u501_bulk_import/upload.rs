use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::error::ImportError;

pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

/// Extension check on the client-supplied name, case-insensitive
pub fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Reduce a client-supplied name to a safe single path component
///
/// Directories are dropped, whitespace becomes `_`, anything outside
/// `[A-Za-z0-9._-]` is removed, and leading dots are stripped.
pub fn secure_filename(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Uploaded file kept on disk for the duration of one import
///
/// The file lives in the upload directory under a unique name and is
/// removed when the value is dropped.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn create(dir: &Path, file_name: &str, contents: &[u8]) -> Result<Self, ImportError> {
        std::fs::create_dir_all(dir)?;

        let suffix = format!("-{}", secure_filename(file_name));
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(contents)?;
        file.flush()?;

        tracing::debug!("Stored upload at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Fresh read handle positioned at the start
    pub fn open(&self) -> Result<File, ImportError> {
        Ok(self.file.reopen()?)
    }
}
