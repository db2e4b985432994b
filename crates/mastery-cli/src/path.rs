//! Journal path checks.

use std::path::{Path, PathBuf};

/// Resolves a journal path.
///
/// With `must_exist`, the file has to be there already; commands that only
/// read must not create an empty journal as a side effect. Otherwise the
/// parent directory has to exist.
pub fn validate_journal_path(journal: &str, must_exist: bool) -> Result<PathBuf, String> {
    if journal.trim().is_empty() {
        return Err("journal path is empty".to_string());
    }
    let path = PathBuf::from(journal);
    if path.is_dir() {
        return Err(format!("{} is a directory", sanitize_path_for_error(&path)));
    }
    if must_exist {
        if !path.is_file() {
            return Err(format!("{} does not exist", sanitize_path_for_error(&path)));
        }
    } else if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(format!(
                "parent directory of {} does not exist",
                sanitize_path_for_error(&path)
            ));
        }
    }
    Ok(path)
}

/// File name only, so error output does not leak directory layout.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_rejected_only_for_reads() {
        let dir = TempDir::new().unwrap();
        let journal = dir.path().join("new.mvj");
        let journal = journal.to_str().unwrap();
        assert!(validate_journal_path(journal, true).is_err());
        assert!(validate_journal_path(journal, false).is_ok());
    }

    #[test]
    fn missing_parent_is_rejected() {
        let dir = TempDir::new().unwrap();
        let journal = dir.path().join("nope").join("x.mvj");
        let err = validate_journal_path(journal.to_str().unwrap(), false).unwrap_err();
        assert!(err.contains("x.mvj"));
        assert!(!err.contains("nope"));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(validate_journal_path(dir.path().to_str().unwrap(), false).is_err());
    }
}
