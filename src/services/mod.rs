pub mod auth;
pub mod beneficiaries;
pub mod session;
pub mod settings;
pub mod statement;
pub mod support;

use crate::db::documents::WriteOutcome;
use crate::errors::AppError;

/// Maps a conditional write outcome to the new document version.
pub(crate) fn applied(outcome: WriteOutcome) -> Result<i64, AppError> {
    match outcome {
        WriteOutcome::Applied { version } => Ok(version),
        WriteOutcome::Conflict { current } => Err(AppError::Conflict { current }),
        WriteOutcome::Missing => Err(AppError::NotFound("user document".to_string())),
    }
}
