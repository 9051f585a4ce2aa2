//! Behavioral reference multiplier.
//!
//! Same module name and ports as [`emit_multiplier`](super::emit_multiplier),
//! but the product is a single `*` on the sign-extended operand. Used as the
//! golden model when cross-checking decomposed chains.

use super::module_name;
use crate::core::{BitContext, GenResult};
use std::fmt::Write;

/// Write the reference module for `n`.
///
/// # Panics
///
/// Panics if `n` is outside the constant range of `ctx`.
pub fn emit_reference<W: Write>(ctx: BitContext, n: i32, out: &mut W) -> GenResult<()> {
    assert!(
        ctx.contains(n as i64),
        "constant {} outside [{}, {})",
        n,
        -ctx.bound(),
        ctx.bound()
    );
    let msb = ctx.n_total() - 1;
    let sign = if n < 0 { '-' } else { ' ' };

    writeln!(
        out,
        "// {}-bit multiplier by {}-bit constant {}",
        ctx.n_width(),
        ctx.n_bits(),
        n
    )?;
    writeln!(out, "module {} (", module_name("mul", n))?;
    writeln!(out, "    input  [{}:0] i,", ctx.n_width() - 1)?;
    writeln!(out, "    output [{}:0] o", ctx.n_width() - 1)?;
    writeln!(out, ");")?;
    writeln!(
        out,
        "    wire [{}:0] c = {}'h{:x};",
        ctx.n_bits() - 1,
        ctx.n_bits(),
        n.unsigned_abs()
    )?;
    writeln!(
        out,
        "    wire [{}:0] I = {{{{{}{{i[{}]}}}}, i}};",
        msb,
        ctx.n_bits(),
        ctx.n_width() - 1
    )?;
    writeln!(out, "    wire [{}:0] m = I * c;", msb)?;
    writeln!(out, "    wire [{}:0] t = {}m;", msb, sign)?;
    writeln!(out, "    assign o = t[{}:{}];", msb, ctx.n_bits())?;
    writeln!(out, "endmodule")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_negative() {
        let mut out = String::new();
        emit_reference(BitContext::new(8, 16).unwrap(), -128, &mut out).unwrap();
        let expected = "\
// 16-bit multiplier by 8-bit constant -128
module mul128_neg (
    input  [15:0] i,
    output [15:0] o
);
    wire [7:0] c = 8'h80;
    wire [23:0] I = {{8{i[15]}}, i};
    wire [23:0] m = I * c;
    wire [23:0] t = -m;
    assign o = t[23:8];
endmodule

";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_reference_positive_keeps_space() {
        let mut out = String::new();
        emit_reference(BitContext::new(8, 16).unwrap(), 45, &mut out).unwrap();
        assert!(out.contains("module mul045_pos ("));
        assert!(out.contains("    wire [7:0] c = 8'h2d;\n"));
        assert!(out.contains("    wire [23:0] t =  m;\n"));
    }
}
