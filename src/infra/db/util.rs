use sqlx::error::ErrorKind;

use crate::application::repos::RepoError;

/// Postgres SQLSTATE for `canceling statement due to statement timeout`.
const QUERY_CANCELED: &str = "57014";
/// Postgres SQLSTATE for malformed literals such as a bad integer.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
/// Postgres SQLSTATE for a value longer than its `VARCHAR` column.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Classifies driver errors so callers can tell constraint failures from
/// outages.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    let db = match err {
        sqlx::Error::RowNotFound => return RepoError::NotFound,
        sqlx::Error::PoolTimedOut => return RepoError::Timeout,
        sqlx::Error::Database(db) => db,
        other => return RepoError::from_persistence(other),
    };

    let message = db.message().to_string();
    match (db.kind(), db.code().as_deref()) {
        (ErrorKind::UniqueViolation, _) => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        (ErrorKind::ForeignKeyViolation, _)
        | (_, Some(INVALID_TEXT_REPRESENTATION | STRING_DATA_RIGHT_TRUNCATION)) => {
            RepoError::InvalidInput { message }
        }
        (ErrorKind::NotNullViolation | ErrorKind::CheckViolation, _) => {
            RepoError::Integrity { message }
        }
        (_, Some(QUERY_CANCELED)) => RepoError::Timeout,
        _ => RepoError::from_persistence(message),
    }
}

pub fn convert_count(value: i64) -> Result<u64, RepoError> {
    u64::try_from(value).map_err(|_| RepoError::from_persistence("negative row count"))
}
