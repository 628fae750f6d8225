use thiserror::Error;

/// Errors produced by the identifier codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Malformed identifier text: wrong length, misplaced dash, or a
    /// non-hex character where a hex digit is expected.
    #[error("invalid HSDS identifier text")]
    InvalidFormat,

    /// Syntactically well-formed identifier with a type byte outside the
    /// recognized set. Carries the offending byte.
    #[error("unknown HDF5 entity type '{}'", char::from(*.0))]
    UnknownEntityType(u8),
}
