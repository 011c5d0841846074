use thiserror::Error;

/// Errors returned by skiplist operations.
///
/// Every variant is raised before the structure is touched, so a failed
/// operation leaves the list exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A key or configuration value was rejected, or the two bounds of a
    /// range query belong to different key domains.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation that needs ordering ran without a comparator.
    #[error("no comparator configured")]
    Unconfigured,

    /// The comparator could not order its operands.
    #[error("comparison failed: {0}")]
    ComparisonFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;
