//! Persistence of the receipt document.
//!
//! Receipts are written as pretty-printed JSON through a temporary file in
//! the destination directory that is renamed into place, so a reader never
//! sees a half-written receipt and a failed write leaves nothing behind.
//! The saved file is world-readable (`0644`) on unix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use drvc3_core::Receipt;
use drvc3_schema::SchemaViolations;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ReceiptError, Result};

/// Default output name for a receipt about `resource`: `receipt.<file-name>.json`.
pub fn default_output_path(resource: impl AsRef<Path>) -> PathBuf {
    let name = resource
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resource".to_string());
    PathBuf::from(format!("receipt.{name}.json"))
}

/// Mode of a saved receipt on unix.
#[cfg(unix)]
const RECEIPT_MODE: u32 = 0o644;

/// Atomically write a receipt to `path`.
pub fn persist(receipt: &Receipt, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = receipt
        .to_json_pretty()
        .map_err(|e| SchemaViolations::root(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ReceiptError::io(dir, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(RECEIPT_MODE))
            .map_err(|e| ReceiptError::io(tmp.path(), e))?;
    }
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ReceiptError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| ReceiptError::io(path, e.error))?;

    debug!(receipt_id = %receipt.receipt_id, path = %path.display(), "persisted receipt");
    Ok(())
}

/// Read a persisted receipt as a raw JSON document.
///
/// The document is not checked here; hand it to the
/// [`Verifier`](crate::Verifier).
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ReceiptError::io(path, e))?;
    parse_document(&text)
}

/// Parse JSON text. Text that is not JSON is a single violation at the root.
pub(crate) fn parse_document(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| ReceiptError::Schema(SchemaViolations::root(format!("not valid JSON: {e}"))))
}
