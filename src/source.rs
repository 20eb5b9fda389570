use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

pub fn ensure_source_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(AppError::MissingSourceDirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// Raw frame files in `dir`, in the order the file system lists them.
pub fn list_raw_frames(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    ensure_source_directory(dir)?;

    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extension) {
            frames.push(path);
        }
    }

    debug!("Found {} .{} files in {}", frames.len(), extension, dir.display());
    Ok(frames)
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_raw_files() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join("20_00_00_000.raw"), b"")?;
        fs::write(tmp.path().join("20_00_01_000.RAW"), b"")?;
        fs::write(tmp.path().join("20_00_02_000.png"), b"")?;
        fs::create_dir(tmp.path().join("nested.raw"))?;

        let mut names: Vec<String> = list_raw_frames(tmp.path(), "raw")?
            .iter()
            .map(|p| file_name_of(p))
            .collect();
        names.sort();

        assert_eq!(names, vec!["20_00_00_000.raw", "20_00_01_000.RAW"]);
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let err = list_raw_frames(Path::new("/nonexistent/20230615"), "raw").unwrap_err();
        assert!(matches!(err, AppError::MissingSourceDirectory(_)));
    }
}
