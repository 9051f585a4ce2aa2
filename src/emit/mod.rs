// This module turns placement table entries into Verilog text. The chain emitter walks
// the table recursively and writes one wire per intermediate constant; the module
// emitters wrap a chain into a plain multiplier or a multiply-accumulate module; the
// reference emitter writes a behavioral multiplier that serves as the golden model.
// Module names, port declarations and signal names are a fixed external contract.

//! Verilog emission.
//!
//! ```
//! use constmul::core::BitContext;
//! use constmul::emit::emit_multiplier;
//! use constmul::search::generate;
//!
//! let table = generate(BitContext::new(8, 16).unwrap());
//! let mut verilog = String::new();
//! emit_multiplier(&table, 3, &mut verilog).unwrap();
//! assert!(verilog.contains("module mul003_pos ("));
//! ```

pub mod chain;
pub mod module;
pub mod reference;

pub use chain::{emit_chain, signal_name, ChainSummary};
pub use module::{emit_macc, emit_multiplier};
pub use reference::emit_reference;

use crate::core::GenResult;
use crate::search::PlacementTable;
use std::fmt::{self, Write};

/// `<prefix><abs:03>_pos` or `<prefix><abs:03>_neg`.
pub fn module_name(prefix: &str, n: i32) -> String {
    let suffix = if n < 0 { "_neg" } else { "_pos" };
    format!("{}{:03}{}", prefix, n.unsigned_abs(), suffix)
}

/// The three module flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Decomposed multiplier.
    Multiplier,
    /// Decomposed multiply-accumulate.
    Macc,
    /// Behavioral reference multiplier.
    Reference,
}

impl ModuleKind {
    /// File name prefix used by the batch drivers.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ModuleKind::Multiplier => "mul",
            ModuleKind::Macc => "macc",
            ModuleKind::Reference => "spec",
        }
    }

    /// Write the module for constant `n`.
    pub fn emit<W: Write>(self, table: &PlacementTable, n: i32, out: &mut W) -> GenResult<()> {
        match self {
            ModuleKind::Multiplier => emit_multiplier(table, n, out),
            ModuleKind::Macc => emit_macc(table, n, out),
            ModuleKind::Reference => emit_reference(table.context(), n, out),
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleKind::Multiplier => "multiplier",
            ModuleKind::Macc => "multiplier-accumulator",
            ModuleKind::Reference => "reference multiplier",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_names() {
        assert_eq!(module_name("mul", 5), "mul005_pos");
        assert_eq!(module_name("mul", -5), "mul005_neg");
        assert_eq!(module_name("macc", -128), "macc128_neg");
        assert_eq!(module_name("mul", 0), "mul000_pos");
    }

    #[test]
    fn test_file_prefixes() {
        assert_eq!(ModuleKind::Multiplier.file_prefix(), "mul");
        assert_eq!(ModuleKind::Macc.file_prefix(), "macc");
        assert_eq!(ModuleKind::Reference.file_prefix(), "spec");
    }
}
