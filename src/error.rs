use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to the operator. None of these end the session;
/// the menu loop prints them and carries on.
#[derive(Debug, Error)]
pub enum StationError {
    /// A volume vanished or became unreadable between enumeration and query.
    #[error("volume {volume} is unavailable: {source}")]
    VolumeUnavailable {
        volume: String,
        #[source]
        source: std::io::Error,
    },

    /// The history log could not be opened or written.
    #[error("cannot write history to {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} failed: {detail}")]
    ActionFailure { action: String, detail: String },

    /// An external collaborator (metrics provider, chart terminal) is absent.
    #[error("{0} is unavailable")]
    MissingDependency(&'static str),
}

impl StationError {
    pub fn action(action: impl Into<String>, detail: impl Into<String>) -> Self {
        StationError::ActionFailure { action: action.into(), detail: detail.into() }
    }
}

pub type Result<T> = std::result::Result<T, StationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        let err = StationError::VolumeUnavailable {
            volume: "E:\\".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "volume E:\\ is unavailable: gone");

        let err = StationError::action("Clearing DNS cache", "exit status 1");
        assert_eq!(err.to_string(), "Clearing DNS cache failed: exit status 1");

        let err = StationError::MissingDependency("system metrics provider");
        assert_eq!(err.to_string(), "system metrics provider is unavailable");
    }
}
