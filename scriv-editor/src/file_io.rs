//! Thin load/save orchestration on top of [`PieceTable`]'s own atomic-save
//! protocol. Encoding detection, line-ending normalization, and the
//! temp-file/fsync/rename dance all live in `scriv_buffer`; this module only
//! maps paths to [`EditorError`]s the controller can surface.

use std::path::Path;

use scriv_buffer::PieceTable;

use crate::error::Result;

pub fn load(path: &Path, big_file_threshold_bytes: u64) -> Result<PieceTable> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > big_file_threshold_bytes {
        return Err(crate::error::EditorError::FileTooLarge {
            size: meta.len(),
            limit: big_file_threshold_bytes,
        });
    }
    Ok(PieceTable::load_from_file(path)?)
}

pub fn save(table: &PieceTable, path: &Path) -> Result<()> {
    table.save_to_path(path)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_rejects_files_above_threshold() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("scriv-file-io-test-{}", std::process::id()));
        std::fs::write(&path, b"0123456789").unwrap();

        let result = load(&path, 4);
        assert!(matches!(result, Err(crate::error::EditorError::FileTooLarge { .. })));

        std::fs::remove_file(&path).unwrap();
    }
}
