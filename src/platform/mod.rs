//! Host-specific commands and well-known directories.
//!
//! Dispatch code only talks to [`PlatformCommands`]; the implementation for
//! the running platform family is picked once at startup by [`detect`].

mod posix;
mod runner;
mod windows;

pub use posix::Posix;
pub use runner::{CommandRunner, ShellRunner};
pub use windows::Windows;

use std::fmt;
use std::path::PathBuf;

/// A program plus arguments, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args:    Vec<String>,
}

impl Invocation {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args:    args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a platform empties its recycle bin.
#[derive(Debug, Clone, PartialEq)]
pub enum RecycleBin {
    Command(Invocation),
    Directories(Vec<PathBuf>),
}

pub trait PlatformCommands {
    fn name(&self) -> &'static str;

    fn reboot(&self) -> Invocation;
    fn shutdown(&self) -> Invocation;

    fn flush_dns(&self) -> Option<Invocation>;
    /// Defragment / trim one volume as reported by the disk probe.
    fn optimize_volume(&self, volume: &str) -> Option<Invocation>;
    fn clear_event_logs(&self) -> Vec<Invocation>;
    fn recycle_bin(&self) -> Option<RecycleBin>;

    fn temp_dirs(&self) -> Vec<PathBuf>;
    fn update_cache_dir(&self) -> Option<PathBuf>;
    fn prefetch_dir(&self) -> Option<PathBuf>;
    fn startup_dir(&self) -> Option<PathBuf>;
}

/// The implementation matching the running host.
pub fn detect() -> Box<dyn PlatformCommands> {
    if cfg!(windows) {
        Box::new(Windows::from_env())
    } else {
        Box::new(Posix::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_displays_as_command_line() {
        let inv = Invocation::new("defrag", &["C:", "/U", "/V"]);
        assert_eq!(inv.to_string(), "defrag C: /U /V");
    }

    #[test]
    fn detect_matches_host_family() {
        let p = detect();
        if cfg!(windows) {
            assert_eq!(p.name(), "Windows");
        } else {
            assert_eq!(p.name(), "POSIX");
        }
    }
}
