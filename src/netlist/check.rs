//! Behavioral cross-check of decomposed modules against the reference.
//!
//! For every constant in range the decomposed multiplier, the decomposed
//! multiply-accumulate and the reference multiplier are emitted, read back and
//! evaluated on a deterministic sample of inputs. Mismatches are collected
//! rather than reported one at a time.

use super::eval::width_mask;
use super::Netlist;
use crate::core::{BitContext, GenResult};
use crate::emit::{emit_chain, ModuleKind};
use crate::search::PlacementTable;
use std::fmt;

/// Operand widths up to this many bits are checked exhaustively.
pub const EXHAUSTIVE_WIDTH: u32 = 10;

const STRIDE_SAMPLES: u64 = 61;

/// One disagreement found by [`CrossCheck`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub constant: i32,
    pub kind: ModuleKind,
    pub input: u64,
    pub accumulator: u64,
    pub expected: u64,
    pub actual: u64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {}: i = {:#x}, c = {:#x}: expected {:#x}, got {:#x}",
            self.kind, self.constant, self.input, self.accumulator, self.expected, self.actual
        )
    }
}

/// Outcome of a cross-check run.
#[derive(Debug, Default, Clone)]
pub struct CheckReport {
    pub constants: usize,
    pub evaluations: usize,
    /// Adders used by the widest chain seen.
    pub max_adders: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cross-check Report:")?;
        writeln!(f, "  Constants checked: {}", self.constants)?;
        writeln!(f, "  Evaluations: {}", self.evaluations)?;
        writeln!(f, "  Largest chain: {} adders", self.max_adders)?;
        writeln!(f, "  Mismatches: {}", self.mismatches.len())?;
        for mismatch in self.mismatches.iter().take(10) {
            writeln!(f, "    {}", mismatch)?;
        }
        Ok(())
    }
}

/// Runs decomposed modules against the reference multiplier.
pub struct CrossCheck<'a> {
    table: &'a PlacementTable,
    samples: Vec<u64>,
}

impl<'a> CrossCheck<'a> {
    /// Check with [`default_samples`] for the table's operand width.
    pub fn new(table: &'a PlacementTable) -> Self {
        let samples = default_samples(table.context().n_width());
        Self { table, samples }
    }

    /// Check with an explicit input sample.
    pub fn with_samples(table: &'a PlacementTable, samples: Vec<u64>) -> Self {
        Self { table, samples }
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// Check every constant in range.
    pub fn run(&self) -> GenResult<CheckReport> {
        let ctx = self.table.context();
        let mut report = CheckReport::default();
        for n in ctx.constants() {
            self.check_constant(n, &mut report)?;
        }
        log::info!(
            "Cross-checked {} constants with {} evaluations, {} mismatches",
            report.constants,
            report.evaluations,
            report.mismatches.len()
        );
        Ok(report)
    }

    /// Check one constant, adding its results to `report`.
    pub fn check_constant(&self, n: i32, report: &mut CheckReport) -> GenResult<()> {
        let ctx = self.table.context();
        let mask = width_mask(ctx.n_width());

        let multiplier = self.read(ModuleKind::Multiplier, n)?;
        let macc = self.read(ModuleKind::Macc, n)?;
        let reference = self.read(ModuleKind::Reference, n)?;

        if n != 0 {
            let mut chain = String::new();
            let summary = emit_chain(self.table, n, &mut chain)?;
            report.max_adders = report.max_adders.max(summary.adders);
        }

        for (index, &input) in self.samples.iter().enumerate() {
            let input = input & mask;
            let accumulator = self.samples[(index * 7 + 3) % self.samples.len()] & mask;

            let expected = scaled_product(ctx, input, n);
            let golden = reference.evaluate_output(&[("i", input)])?;
            let product = multiplier.evaluate_output(&[("i", input)])?;
            let sum = macc.evaluate_output(&[("i", input), ("c", accumulator)])?;
            report.evaluations += 3;

            let mut record = |kind, expected, actual| {
                if expected != actual {
                    report.mismatches.push(Mismatch {
                        constant: n,
                        kind,
                        input,
                        accumulator,
                        expected,
                        actual,
                    });
                }
            };
            record(ModuleKind::Reference, expected, golden);
            record(ModuleKind::Multiplier, golden, product);
            record(ModuleKind::Macc, golden.wrapping_add(accumulator) & mask, sum);
        }

        report.constants += 1;
        Ok(())
    }

    fn read(&self, kind: ModuleKind, n: i32) -> GenResult<Netlist> {
        let mut text = String::new();
        kind.emit(self.table, n, &mut text)?;
        Netlist::parse(&text)
    }
}

/// `(sext(input) * n) >> n_bits`, truncated to the operand width.
pub fn scaled_product(ctx: BitContext, input: u64, n: i32) -> u64 {
    let width = ctx.n_width();
    let mask = width_mask(width);
    let raw = (input & mask) as i128;
    let signed = if raw >> (width - 1) & 1 == 1 {
        raw - (1i128 << width)
    } else {
        raw
    };
    let product = (signed * n as i128) >> ctx.n_bits();
    (product as u64) & mask
}

/// Every operand value for narrow widths; otherwise boundary values plus a
/// fixed stride across the range.
pub fn default_samples(width: u32) -> Vec<u64> {
    let mask = width_mask(width);
    if width <= EXHAUSTIVE_WIDTH {
        return (0..=mask).collect();
    }

    let top = 1u64 << (width - 1);
    let mut samples = vec![0, 1, 2, 3, top - 1, top - 2, top, top + 1, mask, mask - 1];
    let step = mask / STRIDE_SAMPLES;
    for k in 0..STRIDE_SAMPLES {
        samples.push(k.wrapping_mul(step).wrapping_add(k * k) & mask);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_product() {
        let ctx = BitContext::new(8, 16).unwrap();
        assert_eq!(scaled_product(ctx, 256, 3), 3);
        assert_eq!(scaled_product(ctx, 256, -3), 0xFFFD);
        assert_eq!(scaled_product(ctx, 0xFFFF, 1), 0xFFFF);
        assert_eq!(scaled_product(ctx, 0x8000, -128), 0x4000);
    }

    #[test]
    fn test_default_samples() {
        assert_eq!(default_samples(4).len(), 16);
        let wide = default_samples(16);
        assert_eq!(wide.len(), 10 + STRIDE_SAMPLES as usize);
        assert!(wide.contains(&0x8000));
        assert!(wide.iter().all(|s| *s <= 0xFFFF));
    }

    #[test]
    fn test_small_context_passes() {
        let table = crate::search::generate(BitContext::new(4, 6).unwrap());
        let report = CrossCheck::new(&table).run().unwrap();
        assert!(report.is_ok(), "{}", report);
        assert_eq!(report.constants, 16);
        assert_eq!(report.evaluations, 16 * 64 * 3);
    }
}
