//! Reading and writing the board's JSON snapshot file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::debug;

use crate::domain::Snapshot;
use crate::error::BoardError;

/// Reads the snapshot at `path`. A missing file is `Ok(None)`.
pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, BoardError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(BoardError::Persistence(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };
    serde_json::from_str(&contents).map(Some).map_err(|e| {
        BoardError::Persistence(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Writes the snapshot as pretty-printed UTF-8 JSON.
///
/// The data goes to a temp file beside `path` which is then renamed over it,
/// so a failure at any step leaves the previous file as it was.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), BoardError> {
    let contents = serde_json::to_string_pretty(snapshot)
        .map_err(|e| BoardError::Persistence(format!("failed to render snapshot: {e}")))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        BoardError::Persistence(format!("failed to create {}: {e}", dir.display()))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        BoardError::Persistence(format!(
            "failed to create temp file in {}: {e}",
            dir.display()
        ))
    })?;
    temp.write_all(contents.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| BoardError::Persistence(format!("failed to write snapshot: {e}")))?;
    temp.persist(path).map_err(|e| {
        BoardError::Persistence(format!("failed to persist {}: {e}", path.display()))
    })?;

    debug!(
        path = %path.display(),
        orders = snapshot.orders.len(),
        size_bytes = contents.len(),
        "Snapshot written"
    );
    Ok(())
}
