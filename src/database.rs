//! Reading and writing the filter database file.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::FilterDatabase;
use crate::{Error, Result};

/// Load a database written by the extractor (or by hand).
pub fn load(path: &Path) -> Result<FilterDatabase> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let file = fs::File::open(path)?;
    let db = serde_json::from_reader(BufReader::new(file))?;
    Ok(db)
}

/// Write `db` as pretty JSON (two-space indent).
pub fn save(path: &Path, db: &FilterDatabase) -> Result<()> {
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, db)?;
        Ok(())
    })
}

/// Write a file safely:
/// - write to `path.part`
/// - fsync + rename to the final path
///
/// An interrupted or failed write leaves no file at `path`.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<()>,
{
    let tmp_path = PathBuf::from(format!("{}.part", path.display()));

    let result = (|| -> Result<()> {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| Error::Other(Box::new(e.into_error())))?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::FilterRecord;

    #[test]
    fn save_then_load_keeps_the_database() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.json");

        let mut filters = BTreeMap::new();
        filters.insert("anull".to_owned(), FilterRecord::default());
        let db = FilterDatabase::new("7.1", "2025-01-01T00:00:00Z", filters);

        save(&path, &db)?;
        assert_eq!(load(&path)?, db);
        assert!(!dir.path().join("db.json.part").exists());
        assert!(std::fs::read_to_string(&path)?.contains("\n  \"ffmpeg_version\": \"7.1\""));
        Ok(())
    }

    #[test]
    fn load_reports_missing_input() {
        let err = load(Path::new("/no/such/dir/db.json")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn failed_write_leaves_no_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        let err = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            Err(Error::msg("simulated failure"))
        })
        .unwrap_err();

        assert!(err.to_string().contains("simulated failure"));
        assert!(!path.exists());
        assert!(!dir.path().join("out.md.part").exists());
        Ok(())
    }
}
