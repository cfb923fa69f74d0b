//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::ProjectFile { .. } => crate::exitcode::DATAERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::NamespaceConflict { .. } => crate::exitcode::CANTCREAT,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_error_kinds_when_mapping_then_uses_sysexits() {
        let config: CliError = ApplicationError::config("missing folder").into();
        assert_eq!(config.exit_code(), 78);

        let data: CliError = ApplicationError::from(DomainError::EmptyTimeline).into();
        assert_eq!(data.exit_code(), 65);

        let conflict: CliError = ApplicationError::NamespaceConflict {
            path: PathBuf::from("/packs/robot"),
            found: "other".into(),
            expected: "robot".into(),
        }
        .into();
        assert_eq!(conflict.exit_code(), 73);

        let io: CliError = InfraError::io("read", std::io::Error::other("boom")).into();
        assert_eq!(io.exit_code(), 74);
    }
}
