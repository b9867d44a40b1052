use thiserror::Error;

use crate::client::error::ClientError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Local validation failed; nothing was sent to the server
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A mutating request is already in flight for this view
    #[error("Another request is already in flight")]
    Busy,

    /// The new identity code could not be resolved to an owner name
    #[error("{0}")]
    OwnerLookup(String),

    /// Confirm/cancel called with no conflict pending
    #[error("No pending conflict to resolve")]
    NoPendingConflict,

    /// Recovery requested with an empty selection
    #[error("Nothing selected for recovery")]
    EmptySelection,

    /// Listing search attempted before the IC filter is canonical
    #[error("Search requires a complete IC filter")]
    IncompleteFilter,

    /// Authenticate/upload attempted without a candidate file
    #[error("No file selected")]
    NoFile,

    #[error(transparent)]
    Client(#[from] ClientError),
}
