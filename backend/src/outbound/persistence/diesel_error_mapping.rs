//! Shared Diesel error mapping for the book and category repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

/// Constraint tying `books.category_id` to `categories.id`.
pub(crate) const BOOK_CATEGORY_FK: &str = "books_category_id_fkey";

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let PoolError::Checkout { message } = error;
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a violation of the book/category foreign key.
///
/// Falls back to the message when the driver does not report a constraint
/// name. Other foreign key violations are logged and not matched.
pub(crate) fn is_book_category_violation(error: &DieselError) -> bool {
    let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = error else {
        return false;
    };
    let matched = info
        .constraint_name()
        .map(|name| name == BOOK_CATEGORY_FK)
        .unwrap_or_else(|| info.message().contains(BOOK_CATEGORY_FK));
    if !matched {
        warn!(
            message = info.message(),
            constraint_name = ?info.constraint_name(),
            "unrecognised foreign key violation"
        );
    }
    matched
}
