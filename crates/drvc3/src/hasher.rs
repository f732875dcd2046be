//! Content digests of in-memory bytes and of files.

use std::fs;
use std::path::Path;

use drvc3_core::ContentDigest;
use tracing::debug;

use crate::error::{ReceiptError, Result};

/// Digest a byte sequence. Pure; empty input is valid.
pub fn digest(bytes: &[u8]) -> ContentDigest {
    ContentDigest::of(bytes)
}

/// Read a file fully and digest its bytes.
///
/// Fails only when the file cannot be read.
pub fn digest_file(path: impl AsRef<Path>) -> Result<ContentDigest> {
    let path = path.as_ref();
    let bytes = read_resource(path)?;
    let digest = ContentDigest::of(&bytes);
    debug!(path = %path.display(), len = bytes.len(), %digest, "digested file");
    Ok(digest)
}

pub(crate) fn read_resource(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| ReceiptError::io(path, e))
}
