//! Module wrappers around an emitted chain.

use super::chain::{emit_chain, signal_name};
use super::module_name;
use crate::core::{BitContext, GenResult};
use crate::search::PlacementTable;
use std::fmt::Write;

/// Write a `mulNNN_pos`/`mulNNN_neg` module computing `(i * n) >> n_bits`.
///
/// # Panics
///
/// Panics if `n` is outside the table's constant range.
pub fn emit_multiplier<W: Write>(table: &PlacementTable, n: i32, out: &mut W) -> GenResult<()> {
    let ctx = table.context();
    check_range(ctx, n);

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
    if n == 0 {
        writeln!(out, "    assign o = {}'h0;", ctx.n_width())?;
    } else {
        write_operand(ctx, out)?;
        emit_chain(table, n, out)?;
        writeln!(out, "    assign o = {}{};", signal_name(n), result_slice(ctx))?;
    }
    writeln!(out, "endmodule")?;
    writeln!(out)?;
    Ok(())
}

/// Write a `maccNNN_pos`/`maccNNN_neg` module computing `((i * n) >> n_bits) + c`.
///
/// # Panics
///
/// Panics if `n` is outside the table's constant range.
pub fn emit_macc<W: Write>(table: &PlacementTable, n: i32, out: &mut W) -> GenResult<()> {
    let ctx = table.context();
    check_range(ctx, n);

    writeln!(
        out,
        "// {}-bit multiplier-accumulator by {}-bit constant {}",
        ctx.n_width(),
        ctx.n_bits(),
        n
    )?;
    writeln!(out, "module {} (", module_name("macc", n))?;
    writeln!(out, "    input  [{}:0] i,", ctx.n_width() - 1)?;
    writeln!(out, "    input  [{}:0] c,", ctx.n_width() - 1)?;
    writeln!(out, "    output [{}:0] o", ctx.n_width() - 1)?;
    writeln!(out, ");")?;
    if n == 0 {
        writeln!(out, "    assign o = c;")?;
    } else {
        write_operand(ctx, out)?;
        emit_chain(table, n, out)?;
        writeln!(
            out,
            "    wire [{}:0] s = {}{};",
            ctx.n_width() - 1,
            signal_name(n),
            result_slice(ctx)
        )?;
        writeln!(out, "    assign o = s + c;")?;
    }
    writeln!(out, "endmodule")?;
    writeln!(out)?;
    Ok(())
}

fn check_range(ctx: BitContext, n: i32) {
    assert!(
        ctx.contains(n as i64),
        "constant {} outside [{}, {})",
        n,
        -ctx.bound(),
        ctx.bound()
    );
}

/// `n1`: the input sign-extended to the working width.
fn write_operand<W: Write>(ctx: BitContext, out: &mut W) -> GenResult<()> {
    writeln!(
        out,
        "    wire [{}:0] n1 = {{{{{}{{i[{}]}}}}, i}};",
        ctx.n_total() - 1,
        ctx.n_bits(),
        ctx.n_width() - 1
    )?;
    Ok(())
}

/// Arithmetic shift right by `n_bits`, as a part select.
fn result_slice(ctx: BitContext) -> String {
    format!("[{}:{}]", ctx.n_total() - 1, ctx.n_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::generate;

    fn table() -> PlacementTable {
        generate(BitContext::new(8, 16).unwrap())
    }

    #[test]
    fn test_multiplier_by_three() {
        let mut out = String::new();
        emit_multiplier(&table(), 3, &mut out).unwrap();
        let expected = "\
// 16-bit multiplier by 8-bit constant 3
module mul003_pos (
    input  [15:0] i,
    output [15:0] o
);
    wire [23:0] n1 = {{8{i[15]}}, i};
    wire [23:0] n2 = n1 << 1;
    wire [23:0] n3 = n1 + n2;
    assign o = n3[23:8];
endmodule

";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_multiplier_by_zero() {
        let mut out = String::new();
        emit_multiplier(&table(), 0, &mut out).unwrap();
        assert!(out.contains("module mul000_pos ("));
        assert!(out.contains("    assign o = 16'h0;\n"));
        assert!(!out.contains("wire"));
    }

    #[test]
    fn test_macc_by_minus_seven() {
        let mut out = String::new();
        emit_macc(&table(), -7, &mut out).unwrap();
        let expected = "\
// 16-bit multiplier-accumulator by 8-bit constant -7
module macc007_neg (
    input  [15:0] i,
    input  [15:0] c,
    output [15:0] o
);
    wire [23:0] n1 = {{8{i[15]}}, i};
    wire [23:0] n8 = n1 << 3;
    wire [23:0] N7 = n1 - n8;
    wire [15:0] s = N7[23:8];
    assign o = s + c;
endmodule

";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_macc_by_zero() {
        let mut out = String::new();
        emit_macc(&table(), 0, &mut out).unwrap();
        assert!(out.contains("    assign o = c;\n"));
        assert!(!out.contains("n1"));
    }

    #[test]
    fn test_multiplier_by_one_has_no_chain() {
        let mut out = String::new();
        emit_multiplier(&table(), 1, &mut out).unwrap();
        assert!(out.contains("    assign o = n1[23:8];\n"));
        assert_eq!(out.matches("wire").count(), 1);
    }
}
