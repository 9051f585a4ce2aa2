// This module defines error types for constmul using the thiserror crate for idiomatic
// Rust error handling. GenError is the main error enum covering invalid bit-width
// contexts, constants outside the representable range, the zero constant reaching the
// chain emitter, values the search left unreachable, output sink failures, and errors
// raised while reading back or evaluating an emitted netlist. GenResult<T> is the
// convenience alias used across the crate.

//! Error types for constmul.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

/// Main error type for search, emission and netlist evaluation.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid bit-width context: {reason}")]
    InvalidContext {
        reason: String,
    },

    #[error("Constant {value} is outside [{min}, {max})")]
    ConstantOutOfRange {
        value: i64,
        min: i32,
        max: i32,
    },

    #[error("The zero constant has no chain")]
    ZeroConstant,

    #[error("No decomposition found for {value}")]
    Unreachable {
        value: i32,
    },

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Netlist parse error at byte {pos}: {reason}")]
    Parse {
        pos: usize,
        reason: String,
    },

    #[error("Netlist evaluation failed: {reason}")]
    Eval {
        reason: String,
    },
}

/// Result type alias for constmul operations.
pub type GenResult<T> = Result<T, GenError>;
