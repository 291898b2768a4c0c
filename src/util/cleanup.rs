use crate::models::outcome::BatchReport;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Delete every file below `dir`, leaving the directory tree in place.
/// Files that are locked or vanish mid-walk are counted as failures.
pub fn purge_files_recursive(dir: &Path) -> BatchReport {
    let mut report = BatchReport::default();
    for entry in WalkDir::new(dir).min_depth(1).into_iter() {
        let entry = match entry {
            Ok(e)  => e,
            Err(_) => { report.failed += 1; continue; }
        };
        if entry.file_type().is_dir() { continue; }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                report.removed += 1;
                report.bytes_reclaimed += size;
            }
            Err(_) => report.failed += 1,
        }
    }
    report
}

/// Delete the regular files directly inside `dir`; subdirectories are untouched.
pub fn purge_top_level_files(dir: &Path) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { report.failed += 1; continue };
        let Ok(meta) = entry.metadata() else { report.failed += 1; continue };
        if !meta.is_file() { continue; }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                report.removed += 1;
                report.bytes_reclaimed += meta.len();
            }
            Err(_) => report.failed += 1,
        }
    }
    Ok(report)
}

/// Remove `dir` with everything in it, then recreate it empty.
pub fn reset_dir(dir: &Path) -> io::Result<()> {
    fs::remove_dir_all(dir)?;
    fs::create_dir_all(dir)
}

/// Remove every entry inside `dir`, files and subdirectories alike, keeping
/// `dir` itself. Entries that cannot be removed are counted.
pub fn empty_dir(dir: &Path) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { report.failed += 1; continue };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let result = if is_dir { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
        match result {
            Ok(()) => report.removed += 1,
            Err(_) => report.failed += 1,
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(dir: &Path) {
        fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        fs::write(dir.join("top.tmp"), vec![1u8; 100]).unwrap();
        fs::write(dir.join("nested/mid.tmp"), vec![1u8; 10]).unwrap();
        fs::write(dir.join("nested/deeper/low.tmp"), vec![1u8; 1]).unwrap();
    }

    #[test]
    fn recursive_purge_keeps_directories() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let report = purge_files_recursive(dir.path());
        assert_eq!(report, BatchReport { removed: 3, failed: 0, bytes_reclaimed: 111 });
        assert!(dir.path().join("nested/deeper").is_dir());
        assert!(!dir.path().join("top.tmp").exists());
    }

    #[test]
    fn recursive_purge_of_missing_dir_counts_failure() {
        let dir = tempfile::tempdir().unwrap();
        let report = purge_files_recursive(&dir.path().join("gone"));
        assert_eq!(report.removed, 0);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn top_level_purge_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let report = purge_top_level_files(dir.path()).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.bytes_reclaimed, 100);
        assert!(dir.path().join("nested/mid.tmp").exists());
    }

    #[test]
    fn reset_leaves_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        populate(&cache);

        reset_dir(&cache).unwrap();
        assert!(cache.is_dir());
        assert_eq!(fs::read_dir(&cache).unwrap().count(), 0);
    }

    #[test]
    fn empty_dir_removes_everything_inside() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let report = empty_dir(dir.path()).unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
