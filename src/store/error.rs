/// Failures of the subscription store.
///
/// `NotFound` is an expected outcome of point operations and is kept apart from the
/// infrastructure failures (`Timeout`, `Unavailable`) so callers can tell them apart.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Subscription was not found.")]
    NotFound,
    #[error("The subscription violates a constraint of the subscriptions table.")]
    ConstraintViolation(#[source] sqlx::Error),
    #[error("The subscriptions query did not finish before its deadline.")]
    Timeout,
    #[error("The subscriptions database is unavailable.")]
    Unavailable(#[source] sqlx::Error),
    #[error("Expected {expected} affected row(s) but {affected} were affected.")]
    Consistency { expected: u64, affected: u64 },
    #[error("Unexpected error while querying the subscriptions database.")]
    Unexpected(#[source] sqlx::Error),
}

// SQLSTATE class 23 groups integrity constraint violations (unique, not null, check...)
const INTEGRITY_CONSTRAINT_VIOLATION_CLASS: &str = "23";
// Raised when `statement_timeout` cancels a statement
const QUERY_CANCELED: &str = "57014";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err)
                if db_err.code().map_or(false, |code| code == QUERY_CANCELED) =>
            {
                StoreError::Timeout
            }
            sqlx::Error::Database(db_err)
                if db_err
                    .code()
                    .map_or(false, |code| code.starts_with(INTEGRITY_CONSTRAINT_VIOLATION_CLASS)) =>
            {
                StoreError::ConstraintViolation(sqlx::Error::Database(db_err))
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            err => StoreError::Unexpected(err),
        }
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
