use super::{Invocation, PlatformCommands, RecycleBin};
use std::path::PathBuf;

const EVENT_LOGS: &[&str] = &["Application", "System", "Security", "Setup"];

/// Windows command set. Paths come from the usual environment variables.
#[derive(Debug, Clone, Default)]
pub struct Windows {
    pub temp:           Option<PathBuf>,
    pub windir:         Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
    pub app_data:       Option<PathBuf>,
}

impl Windows {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            temp:           var("TEMP"),
            windir:         var("WINDIR"),
            local_app_data: var("LOCALAPPDATA"),
            app_data:       var("APPDATA"),
        }
    }
}

impl PlatformCommands for Windows {
    fn name(&self) -> &'static str { "Windows" }

    fn reboot(&self) -> Invocation {
        Invocation::new("shutdown", &["/r", "/t", "5"])
    }

    fn shutdown(&self) -> Invocation {
        Invocation::new("shutdown", &["/s", "/t", "5"])
    }

    fn flush_dns(&self) -> Option<Invocation> {
        Some(Invocation::new("ipconfig", &["/flushdns"]))
    }

    fn optimize_volume(&self, volume: &str) -> Option<Invocation> {
        // "C:\" from the probe becomes "C:" for defrag.
        let drive = volume.trim_end_matches('\\');
        Some(Invocation::new("defrag", &[drive, "/U", "/V"]))
    }

    fn clear_event_logs(&self) -> Vec<Invocation> {
        EVENT_LOGS.iter().map(|log| Invocation::new("wevtutil", &["cl", log])).collect()
    }

    fn recycle_bin(&self) -> Option<RecycleBin> {
        Some(RecycleBin::Command(Invocation::new(
            "powershell",
            &["-NoProfile", "-Command", "Clear-RecycleBin -Force -ErrorAction SilentlyContinue"],
        )))
    }

    fn temp_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let candidates = [
            self.temp.clone(),
            self.windir.as_ref().map(|w| w.join("Temp")),
            self.local_app_data.as_ref().map(|l| l.join("Temp")),
        ];
        for dir in candidates.into_iter().flatten() {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    fn update_cache_dir(&self) -> Option<PathBuf> {
        self.windir.as_ref().map(|w| w.join("SoftwareDistribution").join("Download"))
    }

    fn prefetch_dir(&self) -> Option<PathBuf> {
        self.windir.as_ref().map(|w| w.join("Prefetch"))
    }

    fn startup_dir(&self) -> Option<PathBuf> {
        self.app_data.as_ref().map(|a| {
            a.join("Microsoft").join("Windows").join("Start Menu").join("Programs").join("Startup")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Windows {
        Windows {
            temp:           Some(PathBuf::from("T")),
            windir:         Some(PathBuf::from("W")),
            local_app_data: Some(PathBuf::from("L")),
            app_data:       Some(PathBuf::from("A")),
        }
    }

    #[test]
    fn defrag_targets_drive_letter() {
        let inv = host().optimize_volume("C:\\").unwrap();
        assert_eq!(inv.to_string(), "defrag C: /U /V");
    }

    #[test]
    fn clears_four_event_logs() {
        let cmds: Vec<String> = host().clear_event_logs().iter().map(|c| c.to_string()).collect();
        assert_eq!(cmds, [
            "wevtutil cl Application",
            "wevtutil cl System",
            "wevtutil cl Security",
            "wevtutil cl Setup",
        ]);
    }

    #[test]
    fn directories_derive_from_environment() {
        let w = host();
        assert_eq!(w.temp_dirs(), vec![
            PathBuf::from("T"),
            PathBuf::from("W").join("Temp"),
            PathBuf::from("L").join("Temp"),
        ]);
        assert_eq!(w.prefetch_dir(), Some(PathBuf::from("W").join("Prefetch")));
        assert!(w.update_cache_dir().unwrap().ends_with("Download"));
        assert!(w.startup_dir().unwrap().ends_with("Startup"));
    }

    #[test]
    fn missing_windir_disables_system_directories() {
        let w = Windows { temp: Some(PathBuf::from("T")), ..Windows::default() };
        assert_eq!(w.temp_dirs(), vec![PathBuf::from("T")]);
        assert_eq!(w.prefetch_dir(), None);
        assert_eq!(w.update_cache_dir(), None);
        assert_eq!(w.startup_dir(), None);
    }
}
