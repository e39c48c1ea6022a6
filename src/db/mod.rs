use mongodb::error::{ErrorKind, WriteFailure};

pub mod connection;
pub mod memory;
pub mod poll_store;
pub mod refresh_store;
pub mod user_store;

/// Mongo reports unique-index violations as write error 11000.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}
