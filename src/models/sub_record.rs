//! Success-or-error wrapper shared by the secondary sub-records.

use serde::Serialize;

/// In-band failure marker, serialised as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorMarker {
    pub error: String,
}

/// Either a populated value or an error marker, never both.
///
/// Serialised untagged, so callers tell the two apart by the presence of
/// an `error` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubRecord<T> {
    Ready(T),
    Failed(ErrorMarker),
}

impl<T> SubRecord<T> {
    pub fn failed(cause: impl Into<String>) -> Self {
        SubRecord::Failed(ErrorMarker {
            error: cause.into(),
        })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            SubRecord::Ready(value) => Some(value),
            SubRecord::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubRecord::Ready(_) => None,
            SubRecord::Failed(marker) => Some(&marker.error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubRecord::Failed(_))
    }
}
