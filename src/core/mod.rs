// This module serves as the hub for constmul's shared infrastructure: the validated
// bit-width context every component receives explicitly, the error type used across
// search, emission and netlist evaluation, and the statistics gathered by the search.

//! Core constmul infrastructure
//!
//! ## Bit-width context (`context`)
//! - Constant precision, operand width and the derived working width
//! - Masking between signed constants and table indices
//!
//! ## Errors (`error`)
//! - `GenError` / `GenResult` built on `thiserror`
//!
//! ## Statistics (`stats`)
//! - Per-generation sizes and entry counts of one search

pub mod context;
pub mod error;
pub mod stats;

pub use context::{BitContext, MAX_CONST_BITS, MAX_TOTAL_BITS};
pub use error::{GenError, GenResult};
pub use stats::SearchStats;
