use thiserror::Error;

use crate::model::ModelKey;

/// Errors returned by navigator operations that take caller-supplied handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NavigatorError {
    /// The key does not belong to a currently open model.
    #[error("{0} is not an open model")]
    ModelNotOpen(ModelKey),
    /// The index refers to a node that no longer exists.
    #[error("index refers to a removed node")]
    StaleIndex,
}

pub type Result<T, E = NavigatorError> = std::result::Result<T, E>;
