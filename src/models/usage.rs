use chrono::NaiveDateTime;

/// One volume's capacity at a single instant.
///
/// `used_bytes + free_bytes <= total_bytes`; reserved blocks may leave a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub volume:      String,
    pub total_bytes: u64,
    pub used_bytes:  u64,
    pub free_bytes:  u64,
}

impl UsageSnapshot {
    /// Build a snapshot from raw filesystem figures, clamping so the
    /// capacity invariant holds even when the OS reports odd numbers.
    pub fn new(volume: impl Into<String>, total_bytes: u64, used_bytes: u64, free_bytes: u64) -> Self {
        let used_bytes = used_bytes.min(total_bytes);
        let free_bytes = free_bytes.min(total_bytes - used_bytes);
        Self { volume: volume.into(), total_bytes, used_bytes, free_bytes }
    }

    pub fn use_pct(&self) -> f64 {
        if self.total_bytes == 0 { return 0.0; }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// A timestamped batch of snapshots, written to the history log as one block.
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub timestamp: NaiveDateTime,
    pub snapshots: Vec<UsageSnapshot>,
}

impl UsageRecord {
    pub fn now(snapshots: Vec<UsageSnapshot>) -> Self {
        Self { timestamp: chrono::Local::now().naive_local(), snapshots }
    }
}

/// One data line recovered from the history log, values in GB.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub volume:  String,
    pub used_gb: f64,
    pub free_gb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_capacity() {
        let s = UsageSnapshot::new("/", 100, 80, 50);
        assert_eq!(s.used_bytes, 80);
        assert_eq!(s.free_bytes, 20);

        let s = UsageSnapshot::new("/", 100, 150, 10);
        assert_eq!(s.used_bytes, 100);
        assert_eq!(s.free_bytes, 0);
    }

    #[test]
    fn use_pct_handles_empty_volume() {
        assert_eq!(UsageSnapshot::new("X", 0, 0, 0).use_pct(), 0.0);
        assert_eq!(UsageSnapshot::new("X", 200, 50, 150).use_pct(), 25.0);
    }
}
