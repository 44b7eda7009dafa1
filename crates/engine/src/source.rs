use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use polyloc_core::language::strip_bom;

use crate::error::{EngineError, Result};

/// Read a source file as text.
///
/// Invalid UTF-8 is replaced rather than rejected, and a leading byte-order
/// mark is removed before any line is processed.
///
/// # Errors
///
/// `SourceOpen` when the file cannot be opened, `SourceRead` when reading fails.
pub fn load_text(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| EngineError::SourceOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| EngineError::SourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let text = String::from_utf8_lossy(&buf);
    Ok(strip_bom(&text).to_owned())
}
