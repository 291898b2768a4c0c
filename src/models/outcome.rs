/// Result of one maintenance action, shown to the operator as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub succeeded: bool,
    pub detail:    String,
}

impl Outcome {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self { succeeded: true, detail: detail.into() }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self { succeeded: false, detail: detail.into() }
    }
}

/// Tally of a best-effort file batch. Per-item failures are counted, never raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub removed:         usize,
    pub failed:          usize,
    pub bytes_reclaimed: u64,
}

impl BatchReport {
    pub fn merge(&mut self, other: BatchReport) {
        self.removed         += other.removed;
        self.failed          += other.failed;
        self.bytes_reclaimed += other.bytes_reclaimed;
    }
}
