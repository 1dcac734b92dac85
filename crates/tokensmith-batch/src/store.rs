use std::path::Path;

use serde::Serialize;
use tokensmith_core::error::{Result, TokensmithError};
use tokensmith_core::types::CredentialStore;

/// Read the credential store. A missing or malformed file is fatal.
pub fn load(path: &Path) -> Result<CredentialStore> {
    let content = std::fs::read_to_string(path).map_err(|e| TokensmithError::Store {
        path: path.display().to_string(),
        message: format!("failed to read: {e}"),
    })?;

    serde_json::from_str(&content).map_err(|e| TokensmithError::Store {
        path: path.display().to_string(),
        message: format!("failed to parse: {e}"),
    })
}

/// Pretty JSON with 4-space indent and a trailing newline.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `bytes` to `path`, creating the parent directory if needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_err = |message: String| TokensmithError::Output {
        path: path.display().to_string(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| output_err(format!("failed to create directory: {e}")))?;
    }

    std::fs::write(path, bytes).map_err(|e| output_err(format!("failed to write: {e}")))
}
