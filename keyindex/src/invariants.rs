//! Structural invariant checking.
//!
//! Both engines expose a `check_invariants` method that walks the whole
//! structure and reports the first broken rule. The checks are exhaustive and
//! linear in the number of entries, so they belong in tests and debugging
//! sessions, not on the hot path.

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Additional context (node, bucket, keys involved).
    pub context: String,
}

impl InvariantViolation {
    pub(crate) fn new(description: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: context.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.description)
        } else {
            write!(f, "{} ({})", self.description, self.context)
        }
    }
}

impl std::error::Error for InvariantViolation {}
