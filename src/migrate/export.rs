//! Export of a migration to a JSON file

use crate::clubhouse::ExportDocument;
use crate::translate::Migration;
use crate::{MigrationError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Wire form of a migration; stories carry no epic ids
pub fn export_document(migration: &Migration) -> ExportDocument {
    ExportDocument {
        epics: migration.epics.iter().map(|e| e.to_request()).collect(),
        stories: migration.stories.iter().map(|s| s.to_request(None)).collect(),
    }
}

/// Write the document as pretty JSON
///
/// The file is assembled next to the destination and renamed into place, so
/// a failed run never leaves a truncated export behind.
pub fn write_export(path: impl AsRef<Path>, document: &ExportDocument) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, document)?;
    file.write_all(b"\n")?;
    file.flush()?;
    file.persist(path).map_err(|e| MigrationError::Io(e.error))?;

    tracing::info!(
        path = %path.display(),
        epics = document.epics.len(),
        stories = document.stories.len(),
        "Wrote export file"
    );
    Ok(())
}
