use crate::config::Config;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_FILTER: &str = "MYSTATION_LOG";

pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("mystation").join("mystation.log"))
}

/// Route tracing output to the log file so it never interleaves with the menu.
/// Without a writable log file, events are dropped.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_env(ENV_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(format!("mystation={}", config.general.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match open_log_file() {
        Some(file) => {
            let _ = registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
        }
        None => {
            let _ = registry.with(fmt::layer().with_writer(std::io::sink)).try_init();
        }
    }
}

fn open_log_file() -> Option<File> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
