//! Reader and evaluator for emitted netlists.
//!
//! This module reads back the Verilog subset constmul writes, so generated
//! modules can be checked without an external simulator. The format is:
//!
//! ```text
//! // comments start with two slashes
//! module mul003_pos (
//!     input  [15:0] i,
//!     output [15:0] o
//! );
//!     wire [23:0] n1 = {{8{i[15]}}, i};
//!     wire [23:0] n2 = n1 << 1;
//!     wire [23:0] n3 = n1 + n2;
//!     assign o = n3[23:8];
//! endmodule
//! ```
//!
//! Parsing enforces that every signal is defined before it is referenced and
//! defined only once, which is exactly the ordering guarantee of the chain
//! emitter.

use std::fmt;

pub mod check;
pub mod eval;
pub mod parser;

pub use check::{CheckReport, CrossCheck, Mismatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Netlist {
    pub name: String,
    pub ports: Vec<Port>,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A `wire` declaration or an `assign` to an output port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
    pub width: u32,
    pub kind: SignalKind,
    pub expr: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Wire,
    Assign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ref(String),
    /// `name[msb:lsb]`, or `name[bit]` when both are equal.
    Select { name: String, msb: u32, lsb: u32 },
    /// Sized (`8'h2d`) or unsized decimal literal.
    Literal { width: Option<u32>, value: u64 },
    Concat(Vec<Expr>),
    Replicate { count: u32, items: Vec<Expr> },
    Neg(Box<Expr>),
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Shl,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Shl => "<<",
        }
    }
}

impl Netlist {
    pub fn parse(text: &str) -> crate::core::GenResult<Self> {
        parser::parse_netlist(text)
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|port| port.direction == Direction::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|port| port.direction == Direction::Output)
    }

    /// Wires declared in the module body, excluding output assignments.
    pub fn wires(&self) -> impl Iterator<Item = &Signal> {
        self.signals
            .iter()
            .filter(|signal| signal.kind == SignalKind::Wire)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ref(name) => write!(f, "{}", name),
            Expr::Select { name, msb, lsb } if msb == lsb => write!(f, "{}[{}]", name, msb),
            Expr::Select { name, msb, lsb } => write!(f, "{}[{}:{}]", name, msb, lsb),
            Expr::Literal { width: Some(width), value } => write!(f, "{}'h{:x}", width, value),
            Expr::Literal { width: None, value } => write!(f, "{}", value),
            Expr::Concat(items) => {
                write!(f, "{{")?;
                write_list(f, items)?;
                write!(f, "}}")
            }
            Expr::Replicate { count, items } => {
                write!(f, "{{{}{{", count)?;
                write_list(f, items)?;
                write!(f, "}}}}")
            }
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {} (", self.name)?;
        for (index, port) in self.ports.iter().enumerate() {
            let direction = match port.direction {
                Direction::Input => "input ",
                Direction::Output => "output",
            };
            let separator = if index + 1 < self.ports.len() { "," } else { "" };
            writeln!(
                f,
                "    {} [{}:0] {}{}",
                direction,
                port.width - 1,
                port.name,
                separator
            )?;
        }
        writeln!(f, ");")?;
        for signal in &self.signals {
            match signal.kind {
                SignalKind::Wire => writeln!(
                    f,
                    "    wire [{}:0] {} = {};",
                    signal.width - 1,
                    signal.name,
                    signal.expr
                )?,
                SignalKind::Assign => writeln!(f, "    assign {} = {};", signal.name, signal.expr)?,
            }
        }
        writeln!(f, "endmodule")
    }
}
