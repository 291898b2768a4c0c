use crate::error::{Result, StationError};
use crate::models::usage::UsageSnapshot;

/// Source of volume capacity figures.
pub trait DiskProbe {
    /// Volumes worth reporting on this host.
    fn list_volumes(&self) -> Vec<String>;

    /// Capacity of one volume right now.
    fn usage(&self, volume: &str) -> Result<UsageSnapshot>;
}

/// Query every listed volume. A volume failing mid-batch is reported
/// alongside the snapshots of the others.
pub fn probe_all(probe: &dyn DiskProbe) -> (Vec<UsageSnapshot>, Vec<StationError>) {
    let mut snapshots = Vec::new();
    let mut failures  = Vec::new();
    for volume in probe.list_volumes() {
        match probe.usage(&volume) {
            Ok(s)  => snapshots.push(s),
            Err(e) => {
                tracing::warn!(%volume, error = %e, "volume query failed");
                failures.push(e);
            }
        }
    }
    (snapshots, failures)
}

/// Probe backed by the host OS.
#[derive(Debug, Default)]
pub struct SystemDisks;

#[cfg(unix)]
impl DiskProbe for SystemDisks {
    fn list_volumes(&self) -> Vec<String> {
        vec!["/".to_string()]
    }

    fn usage(&self, volume: &str) -> Result<UsageSnapshot> {
        use nix::sys::statvfs::statvfs;
        let stat = statvfs(volume).map_err(|errno| StationError::VolumeUnavailable {
            volume: volume.to_string(),
            source: std::io::Error::from(errno),
        })?;

        let frsize = stat.fragment_size() as u64;
        let total_bytes = stat.blocks()           as u64 * frsize;
        let free_blocks = stat.blocks_free()      as u64 * frsize;
        let avail_bytes = stat.blocks_available() as u64 * frsize;
        let used_bytes  = total_bytes.saturating_sub(free_blocks);

        Ok(UsageSnapshot::new(volume, total_bytes, used_bytes, avail_bytes))
    }
}

#[cfg(windows)]
impl DiskProbe for SystemDisks {
    fn list_volumes(&self) -> Vec<String> {
        ('A'..='Z')
            .map(|letter| format!("{}:\\", letter))
            .filter(|root| std::path::Path::new(root).exists())
            .collect()
    }

    fn usage(&self, volume: &str) -> Result<UsageSnapshot> {
        use sysinfo::Disks;
        let unavailable = |reason: &str| StationError::VolumeUnavailable {
            volume: volume.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, reason.to_string()),
        };
        if !std::path::Path::new(volume).exists() {
            return Err(unavailable("root path no longer exists"));
        }
        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point().to_string_lossy().eq_ignore_ascii_case(volume))
            .ok_or_else(|| unavailable("volume not mounted"))?;

        let total_bytes = disk.total_space();
        let free_bytes  = disk.available_space();
        let used_bytes  = total_bytes.saturating_sub(free_bytes);
        Ok(UsageSnapshot::new(volume, total_bytes, used_bytes, free_bytes))
    }
}
