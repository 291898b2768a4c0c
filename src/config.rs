use crate::util::history;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Disk usage history log; relative paths resolve against the working directory
    pub history_file: PathBuf,
    /// Sampling interval of the memory / CPU monitors in milliseconds
    pub monitor_interval_ms: u64,
    /// Number of one-second samples taken by live monitoring
    pub live_samples: usize,
    /// Log filter used when MYSTATION_LOG is unset ("info", "debug", ...)
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Color theme: default, dracula, mono
    pub theme: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_file:        PathBuf::from(history::DEFAULT_FILE),
            monitor_interval_ms: 1000,
            live_samples:        10,
            log_level:           "info".to_string(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self { theme: "default".to_string() }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(_) => {
                // Write defaults on first run (best-effort)
                let _ = try_write_defaults();
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mystation").join("mystation.toml"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.general.monitor_interval_ms.max(100))
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    Config::parse(&text)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        // Present but unparsable: leave the operator's file alone.
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# MyStation configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
