use crate::models::process::{MemoryUsage, ProcessInfo};
use crate::util::human::bytes_to_gb;
use std::time::Duration;
use sysinfo::{ProcessesToUpdate, System};

/// Live memory / CPU / process figures. `None` means the provider cannot
/// answer on this host; callers report that and move on.
pub trait MetricsSource {
    fn memory_usage(&mut self) -> Option<MemoryUsage>;

    /// Blocks for `sampling` to measure load across it.
    fn cpu_load_percent(&mut self, sampling: Duration) -> Option<f64>;

    fn processes(&mut self) -> Box<dyn Iterator<Item = ProcessInfo> + '_>;
}

/// `sysinfo`-backed metrics.
pub struct SysinfoMetrics {
    sys: System,
}

impl SysinfoMetrics {
    /// None on platforms sysinfo does not support.
    pub fn new() -> Option<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }
        Some(Self { sys: System::new() })
    }
}

impl MetricsSource for SysinfoMetrics {
    fn memory_usage(&mut self) -> Option<MemoryUsage> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 { return None; }
        let used = self.sys.used_memory();
        Some(MemoryUsage {
            total_gb: bytes_to_gb(total),
            used_gb:  bytes_to_gb(used),
            percent:  used as f64 / total as f64 * 100.0,
        })
    }

    fn cpu_load_percent(&mut self, sampling: Duration) -> Option<f64> {
        // Usage is a delta between two refreshes; sysinfo needs a minimum gap.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sampling.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() { return None; }
        Some(self.sys.global_cpu_usage() as f64)
    }

    fn processes(&mut self) -> Box<dyn Iterator<Item = ProcessInfo> + '_> {
        self.sys.refresh_memory();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let total = self.sys.total_memory().max(1) as f64;

        let mut procs: Vec<_> = self.sys.processes().values().collect();
        procs.sort_by_key(|p| p.pid());

        Box::new(procs.into_iter().filter_map(move |p| {
            // Entries that exited mid-scan come back without a name.
            let name = p.name().to_str()?.to_string();
            if name.is_empty() { return None; }
            Some(ProcessInfo {
                pid:         p.pid().as_u32(),
                name,
                cpu_percent: p.cpu_usage(),
                mem_percent: p.memory() as f64 / total * 100.0,
            })
        }))
    }
}
