use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// An uploaded document staged on disk for the duration of one request.
///
/// The backing file is deleted when the guard drops, so it is released on
/// every exit path: success, extraction failure, early return, or panic unwind.
#[derive(Debug)]
pub struct StagedDocument {
    file: NamedTempFile,
    extension: String,
}

impl StagedDocument {
    /// Writes `bytes` to a fresh temporary file whose name keeps the declared extension.
    pub fn stage(bytes: &[u8], filename: Option<&str>) -> std::io::Result<Self> {
        let extension = declared_extension(filename);
        let suffix = format!(".{extension}");
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(
            "Staged {} byte upload at {}",
            bytes.len(),
            file.path().display()
        );
        Ok(Self { file, extension })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Lower-cased extension without the dot; `bin` when none was declared.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

fn declared_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}
