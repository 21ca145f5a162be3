//! Model to entity mappers
//!
//! Rows carry ids as plain text; converting them back into domain ids can
//! fail, so every mapping is a `TryFrom` that reports a corrupt row as a
//! database error.

mod favorite;
mod post;
mod profile;
mod reaction;
mod thread;

use uchimo_core::{DomainError, IdParseError};

/// Error for a column that does not hold a valid document id
pub(crate) fn corrupt_column(column: &'static str) -> impl FnOnce(IdParseError) -> DomainError {
    move |e| DomainError::DatabaseError(format!("invalid {column} in row: {e}"))
}

/// Map a batch of rows, failing on the first corrupt one
pub fn map_rows<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}
