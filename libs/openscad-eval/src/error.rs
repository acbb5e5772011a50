//! # Evaluation Errors
//!
//! Error types for AST evaluation.

use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Parse error from earlier stage.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Type mismatch in operation.
    #[error("Type error: {0}")]
    TypeError(String),

    /// Unknown module or function.
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Wrong number of arguments.
    #[error("Wrong number of arguments for {0}: expected {1}, got {2}")]
    WrongArgCount(String, usize, usize),

    /// Division by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Invalid range.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// `assert()` condition evaluated to false.
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Evaluation recursed past the configured depth limit.
    #[error("Recursion detected: max depth {0} exceeded evaluating {1}")]
    Recursion(usize, String),

    /// A `for` loop or list comprehension would iterate more than the
    /// configured element budget.
    #[error("Loop count exceeded: {0} (limit {1})")]
    LoopCnt(usize, usize),

    /// Raised by `echo()`/`assert()` message formatting, or user-triggered
    /// `assert(false, msg)` with no condition failure of its own.
    #[error("{0}")]
    UserMessage(String),

    /// A geometry kernel operation (boolean, hull, minkowski) failed.
    #[error("Geometry error: {0}")]
    GeometryError(String),

    /// A module or function called with a mix of positional and named
    /// arguments that cannot be reconciled against its parameter list.
    #[error("Argument mismatch for {0}: {1}")]
    ArgumentMismatch(String, String),

    /// A customizer parameter set file, or a single parameter value within
    /// one, did not import cleanly: malformed JSON shape, wrong arity on a
    /// vector, or an enum value matching none of the declared items.
    #[error("Customizer error: {0}")]
    CustomizerError(String),
}

impl EvalError {
    /// Whether this error kind is always fatal (aborts the whole
    /// evaluation) as opposed to recoverable-as-warning at the call site
    /// that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EvalError::AssertionFailed(_) | EvalError::Recursion(_, _) | EvalError::LoopCnt(_, _)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::TypeError("expected number".to_string());
        assert!(err.to_string().contains("Type error"));
    }
}
