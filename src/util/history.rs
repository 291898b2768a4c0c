use crate::error::{Result, StationError};
use crate::models::usage::{HistoryEntry, UsageRecord};
use crate::util::human::format_size;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_FILE: &str = "disk_usage_history.txt";

const SEPARATOR_WIDTH: usize = 40;

/// Render one record as the block appended to the log.
pub fn render_block(record: &UsageRecord) -> String {
    let mut block = String::new();
    block.push('\n');
    block.push_str(&"-".repeat(SEPARATOR_WIDTH));
    block.push('\n');
    block.push_str(&format!("Timestamp: {}\n", record.timestamp.format("%Y-%m-%d %H:%M:%S")));
    for s in &record.snapshots {
        block.push_str(&format!(
            "{} | Total: {} | Used: {} | Free: {}\n",
            s.volume,
            format_size(s.total_bytes),
            format_size(s.used_bytes),
            format_size(s.free_bytes),
        ));
    }
    block
}

/// Append a record to the history log, creating the file on first use.
/// The whole block goes out in one write; there is a single writer.
pub fn append(record: &UsageRecord, path: &Path) -> Result<()> {
    let write_error = |source: io::Error| StationError::WriteError { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_error)?;
    file.write_all(render_block(record).as_bytes()).map_err(write_error)?;

    tracing::info!(path = %path.display(), volumes = record.snapshots.len(), "history record appended");
    Ok(())
}

/// Read every data line of the log. A missing file is simply empty history.
/// Lines that are not valid UTF-8 are skipped like any other malformed line.
pub fn parse_all(path: &Path) -> Vec<HistoryEntry> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read history");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for raw in bytes.split(|b| *b == b'\n') {
        let Ok(line) = std::str::from_utf8(raw) else {
            skipped += 1;
            continue;
        };
        if !line.contains("Total") { continue; }
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None        => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "unparsable history lines skipped");
    }
    entries
}

/// `<volume> | Total: <size> | Used: <n> GB | Free: <n> GB`
///
/// Only GB figures parse; lines written in MB/KB/Bytes yield None.
fn parse_line(line: &str) -> Option<HistoryEntry> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 4 { return None; }

    let volume = parts[0].split(':').next().unwrap_or("").trim().to_string();
    let used_gb = keyed_gb(&parts[1..], "Used")?;
    let free_gb = keyed_gb(&parts[1..], "Free")?;
    Some(HistoryEntry { volume, used_gb, free_gb })
}

/// Value of the `<key>: <n> GB` field among `fields`.
fn keyed_gb(fields: &[&str], key: &str) -> Option<f64> {
    let (_, value) = fields
        .iter()
        .filter_map(|f| f.split_once(':'))
        .find(|(k, _)| k.trim() == key)?;
    value.trim().replace(" GB", "").parse().ok()
}
