//! Minimum-adder decomposition search.
//!
//! The search builds a [`PlacementTable`] for one constant width: every masked
//! value maps to a [`Placement`] describing how it is realized from smaller
//! constants and powers of two. Values are discovered generation by generation,
//! where generation `n` holds the positive values first reachable with exactly
//! `n` adders.
//!
//! ```
//! use constmul::core::BitContext;
//! use constmul::search::{generate, Placement};
//!
//! let table = generate(BitContext::new(8, 16).unwrap());
//! assert_eq!(table.get(3), Placement::Sum { a: 1, b: 2 });
//! assert_eq!(table.reconstruct(3), Some(3));
//! ```

pub mod generate;

pub use generate::generate;

use crate::core::{BitContext, SearchStats};
use std::fmt;

/// How one masked value is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// No decomposition was found within the round bound.
    Unreachable,
    /// 0, 1, -1 or an even value: a shift of an odd core, no adder needed.
    Trivial,
    /// `a + b`
    Sum { a: i32, b: i32 },
    /// `a - b`
    Diff { a: i32, b: i32 },
    /// `-a`
    Negate { a: i32 },
}

impl Placement {
    pub fn is_composite(&self) -> bool {
        matches!(self, Placement::Sum { .. } | Placement::Diff { .. } | Placement::Negate { .. })
    }

    /// Value computed from the stored operands, if the entry has any.
    pub fn evaluate(&self) -> Option<i32> {
        match *self {
            Placement::Sum { a, b } => Some(a + b),
            Placement::Diff { a, b } => Some(a - b),
            Placement::Negate { a } => Some(-a),
            Placement::Unreachable | Placement::Trivial => None,
        }
    }
}

/// One entry placed by the adder search, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discovery {
    pub value: i32,
    pub round: u32,
    pub placement: Placement,
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_placement(f, self.value, self.placement)
    }
}

fn write_placement(f: &mut impl fmt::Write, value: i32, placement: Placement) -> fmt::Result {
    match placement {
        Placement::Sum { a, b } => write!(f, "{} = {} + {}", value, a, b),
        Placement::Diff { a, b } => write!(f, "{} = {} - {}", value, a, b),
        Placement::Negate { a } => write!(f, "{} = -({})", value, a),
        Placement::Trivial => {
            let (core, shift) = split_shift(value);
            write!(f, "{} = {} << {}", value, core, shift)
        }
        Placement::Unreachable => write!(f, "{} = ?", value),
    }
}

/// Split a non-zero value into its odd core and trailing-zero count.
pub fn split_shift(value: i32) -> (i32, u32) {
    if value == 0 {
        return (0, 0);
    }
    let shift = value.trailing_zeros();
    (value >> shift, shift)
}

/// Decomposition of every masked value for one constant width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTable {
    ctx: BitContext,
    entries: Vec<Placement>,
    discoveries: Vec<Discovery>,
    stats: SearchStats,
}

impl PlacementTable {
    pub(crate) fn from_parts(
        ctx: BitContext,
        entries: Vec<Placement>,
        discoveries: Vec<Discovery>,
        stats: SearchStats,
    ) -> Self {
        Self {
            ctx,
            entries,
            discoveries,
            stats,
        }
    }

    pub fn context(&self) -> BitContext {
        self.ctx
    }

    /// Entry for a signed value.
    pub fn get(&self, value: i32) -> Placement {
        self.entries[self.ctx.masked(value)]
    }

    /// Entry at a table index.
    pub fn entry(&self, index: usize) -> Placement {
        self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries as `(signed value, placement)`, in table index order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Placement)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(index, placement)| (self.ctx.signed(index), *placement))
    }

    /// Entries placed by the adder search, in the order they were found.
    pub fn discoveries(&self) -> &[Discovery] {
        &self.discoveries
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Signed values the search could not decompose.
    pub fn unreachable(&self) -> Vec<i32> {
        self.iter()
            .filter(|(_, placement)| *placement == Placement::Unreachable)
            .map(|(value, _)| value)
            .collect()
    }

    /// Rebuild a value from its entry.
    ///
    /// Composite entries are evaluated from their operands and trivial entries
    /// from their odd core and shift. Returns `None` for unreachable values.
    pub fn reconstruct(&self, value: i32) -> Option<i32> {
        match self.get(value) {
            Placement::Unreachable => None,
            Placement::Trivial => {
                let (core, shift) = split_shift(value);
                Some(core << shift)
            }
            placement => placement.evaluate(),
        }
    }

    /// Human-readable line for a value, e.g. `13 = 15 - 2`.
    pub fn describe(&self, value: i32) -> String {
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = write_placement(&mut line, value, self.get(value));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_shift() {
        assert_eq!(split_shift(12), (3, 2));
        assert_eq!(split_shift(-128), (-1, 7));
        assert_eq!(split_shift(7), (7, 0));
        assert_eq!(split_shift(0), (0, 0));
    }

    #[test]
    fn test_placement_evaluate() {
        assert_eq!(Placement::Sum { a: 1, b: 2 }.evaluate(), Some(3));
        assert_eq!(Placement::Diff { a: 1, b: 4 }.evaluate(), Some(-3));
        assert_eq!(Placement::Negate { a: 85 }.evaluate(), Some(-85));
        assert_eq!(Placement::Trivial.evaluate(), None);
        assert!(!Placement::Unreachable.is_composite());
    }

    #[test]
    fn test_describe_lines() {
        let table = generate(BitContext::new(8, 16).unwrap());
        assert_eq!(table.describe(13), "13 = 15 - 2");
        assert_eq!(table.describe(-85), "-85 = -(85)");
        assert_eq!(table.describe(100), "100 = 25 << 2");
    }
}
