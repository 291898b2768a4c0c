use super::Invocation;
use crate::error::{Result, StationError};
use std::process::Command;

/// Executes platform commands. Swapped out in tests.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs the program directly, inheriting the console so prompts
/// (sudo passwords, defrag progress) reach the operator.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        tracing::debug!(command = %invocation, "running platform command");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|e| StationError::action(invocation.to_string(), e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(StationError::action(invocation.to_string(), format!("exited with {}", status)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn exit_status_decides_success() {
        assert!(ShellRunner.run(&Invocation::new("true", &[])).is_ok());
        let err = ShellRunner.run(&Invocation::new("false", &[])).unwrap_err();
        assert!(matches!(err, StationError::ActionFailure { .. }));
    }

    #[test]
    fn missing_program_is_action_failure() {
        let err = ShellRunner.run(&Invocation::new("mystation-no-such-tool", &[])).unwrap_err();
        assert!(err.to_string().starts_with("mystation-no-such-tool failed"));
    }
}
