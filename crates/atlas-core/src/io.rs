use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `data` to `path` through a sibling tempfile so exported documents
/// are never observed half-written. Parent directories are created as
/// needed.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn creates_missing_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports/agent/context.md");
        atomic_write(&path, b"# context").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
