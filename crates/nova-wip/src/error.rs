use std::{fmt, time::Duration};

use thiserror::Error;

use crate::protocol::ObjectId;

pub type WipResult<T> = Result<T, WipError>;

/// Operations the read-only value model refuses outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedOperation {
    SetValue,
    ReloadLargeValue,
    ClassName,
    PropertyLookup,
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnsupportedOperation::SetValue => "setting a variable value",
            UnsupportedOperation::ReloadLargeValue => "reloading a truncated value",
            UnsupportedOperation::ClassName => "querying the class name",
            UnsupportedOperation::PropertyLookup => {
                "looking up a property before the properties are loaded"
            }
        })
    }
}

#[derive(Debug, Error)]
pub enum WipError {
    #[error("{0} is not supported for remote values")]
    Unsupported(UnsupportedOperation),
    #[error("failed to load properties of remote object {object_id}: {message}")]
    Fetch { object_id: ObjectId, message: String },
    #[error("loading properties of remote object {object_id} timed out after {timeout:?}")]
    Timeout { object_id: ObjectId, timeout: Duration },
}

impl WipError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, WipError::Unsupported(_))
    }
}
