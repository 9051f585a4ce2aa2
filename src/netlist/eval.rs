//! Two-state evaluation of a parsed netlist.
//!
//! All signals are unsigned. Arithmetic is carried out modulo 2^64 and
//! truncated to the declared width on assignment, which matches Verilog's
//! context-determined sizing as long as no operand is wider than its target.

use super::{BinOp, Expr, Netlist};
use crate::core::{GenError, GenResult};
use hashbrown::HashMap;

/// Low `width` bits set.
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A value together with its self-determined width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Value {
    bits: u64,
    width: u32,
}

impl Netlist {
    /// Evaluate every signal for the given input values and return the outputs.
    ///
    /// Inputs are truncated to their port width; a missing input is an error.
    pub fn evaluate(&self, inputs: &[(&str, u64)]) -> GenResult<HashMap<String, u64>> {
        let mut env: HashMap<&str, Value> = HashMap::new();

        for port in self.inputs() {
            let bits = inputs
                .iter()
                .find(|(name, _)| *name == port.name)
                .map(|(_, bits)| *bits)
                .ok_or_else(|| GenError::Eval {
                    reason: format!("Missing value for input '{}'", port.name),
                })?;
            env.insert(
                &port.name,
                Value {
                    bits: bits & width_mask(port.width),
                    width: port.width,
                },
            );
        }

        for signal in &self.signals {
            let value = eval_expr(&signal.expr, &env)?;
            env.insert(
                &signal.name,
                Value {
                    bits: value.bits & width_mask(signal.width),
                    width: signal.width,
                },
            );
        }

        let mut outputs = HashMap::new();
        for port in self.outputs() {
            let value = env.get(port.name.as_str()).ok_or_else(|| GenError::Eval {
                reason: format!("Output '{}' has no value", port.name),
            })?;
            outputs.insert(port.name.clone(), value.bits);
        }
        Ok(outputs)
    }

    /// Evaluate and return the single output `o`.
    pub fn evaluate_output(&self, inputs: &[(&str, u64)]) -> GenResult<u64> {
        let outputs = self.evaluate(inputs)?;
        outputs.get("o").copied().ok_or_else(|| GenError::Eval {
            reason: format!("Module '{}' has no output 'o'", self.name),
        })
    }
}

fn eval_expr(expr: &Expr, env: &HashMap<&str, Value>) -> GenResult<Value> {
    match expr {
        Expr::Ref(name) => lookup(name, env),
        Expr::Select { name, msb, lsb } => {
            let value = lookup(name, env)?;
            let width = msb - lsb + 1;
            Ok(Value {
                bits: (value.bits >> lsb) & width_mask(width),
                width,
            })
        }
        Expr::Literal { width, value } => {
            // Unsized literals are 32 bits wide.
            let width = width.unwrap_or(32);
            Ok(Value {
                bits: value & width_mask(width),
                width,
            })
        }
        Expr::Concat(items) => concat(items, 1, env),
        Expr::Replicate { count, items } => concat(items, *count, env),
        Expr::Neg(inner) => {
            let value = eval_expr(inner, env)?;
            Ok(Value {
                bits: value.bits.wrapping_neg(),
                width: value.width,
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, env)?;
            let rhs = eval_expr(rhs, env)?;
            let bits = match op {
                BinOp::Add => lhs.bits.wrapping_add(rhs.bits),
                BinOp::Sub => lhs.bits.wrapping_sub(rhs.bits),
                BinOp::Mul => lhs.bits.wrapping_mul(rhs.bits),
                BinOp::Shl => {
                    if rhs.bits >= 64 {
                        0
                    } else {
                        lhs.bits << rhs.bits
                    }
                }
            };
            let width = match op {
                BinOp::Shl => lhs.width,
                _ => lhs.width.max(rhs.width),
            };
            Ok(Value { bits, width })
        }
    }
}

fn lookup(name: &str, env: &HashMap<&str, Value>) -> GenResult<Value> {
    env.get(name).copied().ok_or_else(|| GenError::Eval {
        reason: format!("Signal '{}' has no value", name),
    })
}

/// Concatenate `items` (most significant first), `count` times.
fn concat(items: &[Expr], count: u32, env: &HashMap<&str, Value>) -> GenResult<Value> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(eval_expr(item, env)?);
    }

    let mut bits = 0u64;
    let mut width = 0u32;
    for _ in 0..count {
        for part in &parts {
            width += part.width;
            if width > 64 {
                return Err(GenError::Eval {
                    reason: "Concatenation wider than 64 bits".to_string(),
                });
            }
            let shifted = if part.width >= 64 { 0 } else { bits << part.width };
            bits = shifted | (part.bits & width_mask(part.width));
        }
    }
    Ok(Value { bits, width })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(body: &str) -> Netlist {
        let text = format!(
            "module m (\n    input  [15:0] i,\n    output [15:0] o\n);\n{}endmodule\n",
            body
        );
        Netlist::parse(&text).unwrap()
    }

    #[test]
    fn test_sign_extension() {
        let netlist = module("    wire [23:0] n1 = {{8{i[15]}}, i};\n    assign o = n1[23:8];\n");
        assert_eq!(netlist.evaluate_output(&[("i", 0x8000)]).unwrap(), 0xFF80);
        assert_eq!(netlist.evaluate_output(&[("i", 0x7FFF)]).unwrap(), 0x007F);
    }

    #[test]
    fn test_negation_wraps_to_width() {
        let netlist = module(
            "    wire [23:0] n1 = {{8{i[15]}}, i};\n    wire [23:0] N1 = -n1;\n    assign o = N1[15:0];\n",
        );
        assert_eq!(netlist.evaluate_output(&[("i", 1)]).unwrap(), 0xFFFF);
        assert_eq!(netlist.evaluate_output(&[("i", 0)]).unwrap(), 0);
    }

    #[test]
    fn test_shift_and_add() {
        let netlist = module(
            "    wire [23:0] n1 = {{8{i[15]}}, i};\n    wire [23:0] n2 = n1 << 1;\n    wire [23:0] n3 = n1 + n2;\n    assign o = n3[15:0];\n",
        );
        assert_eq!(netlist.evaluate_output(&[("i", 7)]).unwrap(), 21);
        assert_eq!(netlist.evaluate_output(&[("i", 0xFFFF)]).unwrap(), 0xFFFD);
    }

    #[test]
    fn test_missing_input() {
        let netlist = module("    assign o = i;\n");
        assert!(matches!(
            netlist.evaluate(&[]),
            Err(GenError::Eval { .. })
        ));
    }

    #[test]
    fn test_width_mask() {
        assert_eq!(width_mask(8), 0xFF);
        assert_eq!(width_mask(64), u64::MAX);
    }
}
