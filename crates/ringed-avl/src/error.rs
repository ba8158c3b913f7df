//! Construction-time errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("comparator must be set")]
    MissingComparator,
    #[error("key extractor must be set")]
    MissingKeyExtractor,
    #[error("unexpected key collision behaviour: {0}")]
    UnknownCollisionPolicy(u8),
    #[error("unexpected for-each mode: {0}")]
    UnknownForEachMode(u8),
}
