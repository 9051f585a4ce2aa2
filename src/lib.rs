//! constmul - Multiplierless constant multiplier generation.
//!
//! For a fixed constant width, constmul finds a minimum-adder decomposition of
//! every representable constant and emits Verilog modules that multiply (or
//! multiply-accumulate) a runtime operand by that constant using only shifts,
//! additions and subtractions.
//!
//! # Primary Usage
//!
//! ```
//! use constmul::core::BitContext;
//! use constmul::emit::emit_macc;
//! use constmul::search::generate;
//!
//! // One search per constant width, then any number of emissions
//! let table = generate(BitContext::new(8, 16).unwrap());
//! let mut verilog = String::new();
//! emit_macc(&table, -7, &mut verilog).unwrap();
//! assert!(verilog.contains("module macc007_neg ("));
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Bit-width context, errors, search statistics
//! - [`search`] - Round-by-round decomposition search and the placement table
//! - [`emit`] - Chain, module and reference emitters
//! - [`netlist`] - Reader, evaluator and cross-checker for emitted modules
//! - [`batch`] - One file per constant

pub mod batch;
pub mod core;
pub mod emit;
pub mod netlist;
pub mod search;

// Re-export common types from organized modules
pub use self::core::{BitContext, GenError, GenResult, SearchStats};
pub use emit::{emit_chain, emit_macc, emit_multiplier, emit_reference, ChainSummary, ModuleKind};
pub use netlist::{CheckReport, CrossCheck, Netlist};
pub use search::{generate, Placement, PlacementTable};
