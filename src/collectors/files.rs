use std::fs;
use std::io;
use std::path::Path;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntryInfo {
    pub name:  String,
    pub bytes: u64,
}

/// List a directory with entry sizes, sorted by name. Entries whose
/// metadata cannot be read (dangling links, permission denied) are left out.
pub fn list_dir(path: &Path) -> io::Result<Vec<DirEntryInfo>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(path)? {
        let Ok(entry) = entry else { continue };
        let Ok(meta) = fs::metadata(entry.path()) else { continue };
        out.push(DirEntryInfo {
            name:  entry.file_name().to_string_lossy().into_owned(),
            bytes: meta.len(),
        });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}
