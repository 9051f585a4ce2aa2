//! Recursive chain emission.
//!
//! Walks the placement table from a constant down to the sign-extended operand
//! `n1` and writes one `wire` per intermediate value, each defined before its
//! first use. Signals are named after the constant they carry: `n13` holds
//! `13 * i`, `N13` holds `-13 * i`.

use crate::core::{GenError, GenResult};
use crate::search::{split_shift, Placement, PlacementTable};
use hashbrown::HashSet;
use std::fmt::Write;

/// Name of the signal carrying `value * i`.
pub fn signal_name(value: i32) -> String {
    let sign = if value < 0 { 'N' } else { 'n' };
    format!("{}{}", sign, value.unsigned_abs())
}

/// Operations written by one [`emit_chain`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChainSummary {
    /// Additions and subtractions.
    pub adders: usize,
    /// Left shifts.
    pub shifts: usize,
    /// Unary negations.
    pub negations: usize,
}

impl ChainSummary {
    /// Number of signals the chain defines.
    pub fn signals(&self) -> usize {
        self.adders + self.shifts + self.negations
    }
}

/// Write the signal definitions computing `n * i` into `out`.
///
/// The base operand `n1` must already be defined by the caller. The last signal
/// written is [`signal_name(n)`](signal_name), unless `n` is 1.
///
/// # Panics
///
/// Panics if `n` is outside the table's constant range.
pub fn emit_chain<W: Write>(
    table: &PlacementTable,
    n: i32,
    out: &mut W,
) -> GenResult<ChainSummary> {
    let ctx = table.context();
    assert!(
        ctx.contains(n as i64),
        "constant {} outside [{}, {})",
        n,
        -ctx.bound(),
        ctx.bound()
    );
    if n == 0 {
        return Err(GenError::ZeroConstant);
    }

    let mut writer = ChainWriter {
        table,
        out,
        msb: ctx.n_total() - 1,
        summary: ChainSummary::default(),
    };
    let mut emitted = HashSet::new();
    emitted.insert(1);
    writer.emit_value(n, &mut emitted)?;
    Ok(writer.summary)
}

struct ChainWriter<'a, W> {
    table: &'a PlacementTable,
    out: &'a mut W,
    msb: u32,
    summary: ChainSummary,
}

impl<W: Write> ChainWriter<'_, W> {
    /// Define `value`, then record it in `emitted` so later parents reuse it.
    fn emit_value(&mut self, value: i32, emitted: &mut HashSet<i32>) -> GenResult<()> {
        if emitted.contains(&value) {
            return Ok(());
        }

        match self.table.get(value) {
            Placement::Trivial => {
                let (core, shift) = split_shift(value);
                if core == -1 {
                    self.emit_negated_base(emitted)?;
                }
                if core.abs() != 1 {
                    self.emit_value(core, emitted)?;
                }
                if shift > 0 {
                    self.define(value, &format!("{} << {}", signal_name(core), shift))?;
                    self.summary.shifts += 1;
                }
            }
            Placement::Sum { a, b } => {
                self.emit_value(a, emitted)?;
                self.emit_value(b, emitted)?;
                self.define(value, &format!("{} + {}", signal_name(a), signal_name(b)))?;
                self.summary.adders += 1;
            }
            Placement::Diff { a, b } => {
                self.emit_value(a, emitted)?;
                self.emit_value(b, emitted)?;
                self.define(value, &format!("{} - {}", signal_name(a), signal_name(b)))?;
                self.summary.adders += 1;
            }
            Placement::Negate { a } => {
                self.emit_value(a, emitted)?;
                self.define(value, &format!("-{}", signal_name(a)))?;
                self.summary.negations += 1;
            }
            Placement::Unreachable => return Err(GenError::Unreachable { value }),
        }

        emitted.insert(value);
        Ok(())
    }

    fn emit_negated_base(&mut self, emitted: &mut HashSet<i32>) -> GenResult<()> {
        if emitted.insert(-1) {
            self.define(-1, "-n1")?;
            self.summary.negations += 1;
        }
        Ok(())
    }

    fn define(&mut self, value: i32, expr: &str) -> GenResult<()> {
        let name = signal_name(value);
        log::trace!("{} = {}", name, expr);
        writeln!(self.out, "    wire [{}:0] {} = {};", self.msb, name, expr)?;
        Ok(())
    }
}
