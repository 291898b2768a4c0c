use super::{Invocation, PlatformCommands, RecycleBin};
use std::path::PathBuf;

/// Linux / BSD / macOS command set. Privileged commands go through sudo.
#[derive(Debug, Clone)]
pub struct Posix {
    pub tmp:        PathBuf,
    pub data_dir:   Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

impl Posix {
    pub fn from_env() -> Self {
        let tmp = std::env::var_os("TMPDIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp"));
        Self { tmp, data_dir: dirs::data_dir(), config_dir: dirs::config_dir() }
    }
}

impl PlatformCommands for Posix {
    fn name(&self) -> &'static str { "POSIX" }

    fn reboot(&self) -> Invocation {
        Invocation::new("sudo", &["reboot"])
    }

    fn shutdown(&self) -> Invocation {
        Invocation::new("sudo", &["shutdown", "now"])
    }

    fn flush_dns(&self) -> Option<Invocation> {
        Some(Invocation::new("resolvectl", &["flush-caches"]))
    }

    fn optimize_volume(&self, volume: &str) -> Option<Invocation> {
        Some(Invocation::new("sudo", &["fstrim", "-v", volume]))
    }

    fn clear_event_logs(&self) -> Vec<Invocation> {
        vec![
            Invocation::new("sudo", &["journalctl", "--rotate"]),
            Invocation::new("sudo", &["journalctl", "--vacuum-time=1s"]),
        ]
    }

    fn recycle_bin(&self) -> Option<RecycleBin> {
        let trash = self.data_dir.as_ref()?.join("Trash");
        Some(RecycleBin::Directories(vec![trash.join("files"), trash.join("info")]))
    }

    fn temp_dirs(&self) -> Vec<PathBuf> {
        vec![self.tmp.clone()]
    }

    fn update_cache_dir(&self) -> Option<PathBuf> { None }

    fn prefetch_dir(&self) -> Option<PathBuf> { None }

    fn startup_dir(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|c| c.join("autostart"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Posix {
        Posix {
            tmp:        PathBuf::from("/var/tmp"),
            data_dir:   Some(PathBuf::from("/home/op/.local/share")),
            config_dir: Some(PathBuf::from("/home/op/.config")),
        }
    }

    #[test]
    fn privileged_commands_use_sudo() {
        let p = host();
        assert_eq!(p.reboot().to_string(), "sudo reboot");
        assert_eq!(p.shutdown().to_string(), "sudo shutdown now");
        assert_eq!(p.optimize_volume("/").unwrap().to_string(), "sudo fstrim -v /");
    }

    #[test]
    fn trash_lives_under_data_dir() {
        assert_eq!(
            host().recycle_bin(),
            Some(RecycleBin::Directories(vec![
                PathBuf::from("/home/op/.local/share/Trash/files"),
                PathBuf::from("/home/op/.local/share/Trash/info"),
            ]))
        );
    }

    #[test]
    fn windows_only_caches_are_absent() {
        let p = host();
        assert_eq!(p.update_cache_dir(), None);
        assert_eq!(p.prefetch_dir(), None);
        assert_eq!(p.temp_dirs(), vec![PathBuf::from("/var/tmp")]);
        assert_eq!(p.startup_dir(), Some(PathBuf::from("/home/op/.config/autostart")));
    }
}
