/// Point-in-time memory figures for the whole host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUsage {
    pub total_gb: f64,
    pub used_gb:  f64,
    pub percent:  f64,
}

/// One row of the process listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid:         u32,
    pub name:        String,
    pub cpu_percent: f32,
    pub mem_percent: f64,
}

/// CPU and memory readings gathered by the bounded live-monitoring loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSamples {
    pub cpu_percent: Vec<f64>,
    pub mem_percent: Vec<f64>,
}

impl LiveSamples {
    pub fn len(&self) -> usize {
        self.cpu_percent.len().min(self.mem_percent.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
