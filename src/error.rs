/*!
# Errors

All fallible operations of this crate return [`Result`]. There are only two kinds of failure:
arguments outside of an operation's domain, and problems whose bookkeeping would not fit into the
integer types used internally. Degenerate inputs (empty sides, fewer than two elements) are not
errors and produce well-defined default results instead.
*/

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatchError>;

/// Main error type for `bimatch`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// An argument is outside of the domain of the operation
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// An intermediate quantity does not fit into its integer representation
    #[error("arithmetic overflow: {what}")]
    Overflow { what: &'static str },
}

impl MatchError {
    /// Create an invalid argument error
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(what: &'static str) -> Self {
        Self::Overflow { what }
    }

    /// Returns *true* if this error signals an arithmetic overflow
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

/// Shorthand for returning `Err(MatchError)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $err : expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use raise_error_unless;

/// Returns an `InvalidArgument` error unless `threshold` is a finite number
pub(crate) fn check_finite_threshold(threshold: f64) -> Result<()> {
    raise_error_unless!(
        threshold.is_finite(),
        MatchError::invalid_argument("threshold", format!("must be finite, got {threshold}"))
    );
    Ok(())
}
