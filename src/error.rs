use std::io;

use thiserror::Error;

use crate::record::RecordId;

/// Failure while deriving a permalink.
///
/// `E` is the resolver's own error type; resolution failures carry it unchanged.
#[derive(Debug, Error)]
pub enum PathError<E> {
    /// The ancestor chain came back to `id`. `chain` lists the ids visited
    /// before the repeat, starting at the target record.
    #[error("cycle detected: record {id} is its own ancestor (chain: {})", format_chain(.chain, .id))]
    CycleDetected { id: RecordId, chain: Vec<RecordId> },
    #[error("failed to resolve parent record: {0}")]
    Resolution(#[source] E),
    #[error("permalink generation cancelled")]
    Cancelled,
}

impl<E> PathError<E> {
    pub fn is_cycle(&self) -> bool {
        matches!(self, PathError::CycleDetected { .. })
    }
}

fn format_chain(chain: &[RecordId], repeated: &RecordId) -> String {
    let mut parts: Vec<String> = chain.iter().map(ToString::to_string).collect();
    parts.push(repeated.to_string());
    parts.join(" -> ")
}

/// Errors raised by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record has no usable `{field}` id")]
    MissingId { field: String },
    #[error("record {child} references missing parent {parent}")]
    MissingParent { child: RecordId, parent: RecordId },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_chain() {
        let err: PathError<StoreError> = PathError::CycleDetected {
            id: RecordId::Int(1),
            chain: vec![RecordId::Int(1), RecordId::Int(2)],
        };
        assert_eq!(
            err.to_string(),
            "cycle detected: record 1 is its own ancestor (chain: 1 -> 2 -> 1)"
        );
        assert!(err.is_cycle());
    }

    #[test]
    fn test_resolution_keeps_source() {
        let err: PathError<StoreError> = PathError::Resolution(StoreError::MissingParent {
            child: RecordId::Int(2),
            parent: RecordId::Int(9),
        });
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("record 2 references missing parent 9"));
        assert!(!err.is_cycle());
    }
}
