//! Error Types
//!
//! The document layer has a single operational failure mode: growing one of
//! the record arrays or the string pool. Malformed event sequences are programming errors and
//! panic at the offending call instead. Name tests parsed from text report
//! their own error.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure while appending records to a document under construction
#[derive(Debug, Error)]
pub enum BuildError {
    /// The allocator refused to grow a record array
    #[error("failed to grow the {array} array to {requested} records")]
    Allocation {
        /// Which array was growing ("node", "attribute" or "namespace")
        array: &'static str,
        /// Capacity that was requested
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// A record array or the string pool ran out of `u32` positions
    #[error("the {array} array exceeds {max} records", max = u32::MAX)]
    Capacity {
        /// Which array overflowed ("node", "attribute", "namespace" or "string")
        array: &'static str,
    },
}

impl BuildError {
    /// Narrow a length or offset to a `u32` position
    pub(crate) fn position(len: usize, array: &'static str) -> Result<u32, BuildError> {
        u32::try_from(len).map_err(|_| BuildError::Capacity { array })
    }
}

/// Failure while parsing a textual name test
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameTestError {
    #[error("unterminated namespace in name test {0:?}")]
    Unterminated(String),

    #[error("prefix in name test {0:?} has no namespace binding")]
    UnboundPrefix(String),

    #[error("empty name test")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = BuildError::Capacity { array: "node" };
        assert_eq!(err.to_string(), format!("the node array exceeds {} records", u32::MAX));
    }

    #[test]
    fn test_position_limit() {
        assert_eq!(BuildError::position(u32::MAX as usize, "string").unwrap(), u32::MAX);
        match BuildError::position(u32::MAX as usize + 1, "string") {
            Err(BuildError::Capacity { array }) => assert_eq!(array, "string"),
            other => panic!("expected a capacity error, got {:?}", other),
        }
    }

    #[test]
    fn test_allocation_source() {
        let source = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err = BuildError::Allocation { array: "attribute", requested: 8, source };
        assert!(err.to_string().contains("attribute array"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_name_test_messages() {
        let err = NameTestError::UnboundPrefix("p:a".to_string());
        assert_eq!(err.to_string(), "prefix in name test \"p:a\" has no namespace binding");
        assert_eq!(NameTestError::Empty.to_string(), "empty name test");
    }
}
