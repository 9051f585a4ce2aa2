// This module provides statistics gathered while the decomposition search runs.
// SearchStats records how many rounds were executed, how many values each generation
// contributed, how many composite and negation entries were placed, and how many
// values were left without a decomposition. The Display implementation renders a
// short summary for the command line and debug logging.

//! Search statistics.

use std::fmt;

/// Decomposition search statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchStats {
    /// Adder rounds actually executed before convergence or the bound.
    pub rounds: u32,

    /// Size of each generation, indexed by adder count.
    pub generation_sizes: Vec<usize>,

    /// Entries recorded as a sum or difference.
    pub composites: usize,

    /// Entries recorded by the negation pass.
    pub negations: usize,

    /// Masked values left without a decomposition.
    pub unreachable: usize,
}

impl SearchStats {
    /// Record one finished generation.
    pub fn record_generation(&mut self, size: usize) {
        self.generation_sizes.push(size);
    }

    /// Total number of entries found by the adder search.
    pub fn placed(&self) -> usize {
        self.composites + self.negations
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decomposition Search Statistics:")?;
        writeln!(f, "  Rounds executed: {}", self.rounds)?;
        writeln!(f, "  Composite entries: {}", self.composites)?;
        writeln!(f, "  Negation entries: {}", self.negations)?;
        writeln!(f, "  Unreachable values: {}", self.unreachable)?;

        if !self.generation_sizes.is_empty() {
            writeln!(f, "  Generation sizes:")?;
            for (round, size) in self.generation_sizes.iter().enumerate() {
                writeln!(f, "    {} adders: {}", round, size)?;
            }
        }

        Ok(())
    }
}
