//! Bit-width context shared by the search and every emitter.

use super::error::{GenError, GenResult};

/// Largest supported constant width; the placement table has `2^n_bits` entries.
pub const MAX_CONST_BITS: u32 = 16;

/// Largest working width the netlist evaluator can represent.
pub const MAX_TOTAL_BITS: u32 = 64;

/// Constant precision and runtime operand width for one search/emission session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitContext {
    n_bits: u32,
    n_width: u32,
}

impl BitContext {
    /// Create a validated context.
    pub fn new(n_bits: u32, n_width: u32) -> GenResult<Self> {
        if !(2..=MAX_CONST_BITS).contains(&n_bits) {
            return Err(GenError::InvalidContext {
                reason: format!("constant width {} not in 2..={}", n_bits, MAX_CONST_BITS),
            });
        }
        if n_width == 0 {
            return Err(GenError::InvalidContext {
                reason: "operand width must be at least 1".to_string(),
            });
        }
        if n_bits + n_width > MAX_TOTAL_BITS {
            return Err(GenError::InvalidContext {
                reason: format!(
                    "working width {} exceeds {} bits",
                    n_bits + n_width,
                    MAX_TOTAL_BITS
                ),
            });
        }
        Ok(Self { n_bits, n_width })
    }

    pub fn n_bits(&self) -> u32 {
        self.n_bits
    }

    pub fn n_width(&self) -> u32 {
        self.n_width
    }

    /// Working precision after sign extension.
    pub fn n_total(&self) -> u32 {
        self.n_width + self.n_bits
    }

    /// `2^(n_bits-1)`; constants live in `[-bound, bound)`.
    pub fn bound(&self) -> i32 {
        1 << (self.n_bits - 1)
    }

    pub fn mask(&self) -> u32 {
        (1u32 << self.n_bits) - 1
    }

    /// Number of placement table entries.
    pub fn table_len(&self) -> usize {
        1usize << self.n_bits
    }

    /// Table index of a signed value.
    pub fn masked(&self, value: i32) -> usize {
        (value as u32 & self.mask()) as usize
    }

    /// Signed constant stored at a table index.
    pub fn signed(&self, index: usize) -> i32 {
        let value = (index as u32 & self.mask()) as i32;
        if value >= self.bound() {
            value - (self.bound() << 1)
        } else {
            value
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        let bound = self.bound() as i64;
        -bound <= value && value < bound
    }

    /// Reject constants outside the representable range.
    pub fn check_constant(&self, value: i64) -> GenResult<i32> {
        if self.contains(value) {
            Ok(value as i32)
        } else {
            Err(GenError::ConstantOutOfRange {
                value,
                min: -self.bound(),
                max: self.bound(),
            })
        }
    }

    /// Every constant in range, ascending.
    pub fn constants(&self) -> impl Iterator<Item = i32> {
        let bound = self.bound();
        -bound..bound
    }
}

impl Default for BitContext {
    fn default() -> Self {
        Self { n_bits: 8, n_width: 16 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = BitContext::default();
        assert_eq!(ctx.n_total(), 24);
        assert_eq!(ctx.bound(), 128);
        assert_eq!(ctx.mask(), 0xFF);
        assert_eq!(ctx.table_len(), 256);
    }

    #[test]
    fn test_masking_negative_values() {
        let ctx = BitContext::new(8, 16).unwrap();
        assert_eq!(ctx.masked(-1), 255);
        assert_eq!(ctx.masked(-128), 128);
        assert_eq!(ctx.masked(127), 127);
        assert_eq!(ctx.signed(255), -1);
        assert_eq!(ctx.signed(128), -128);
        assert_eq!(ctx.signed(127), 127);
    }

    #[test]
    fn test_constant_range() {
        let ctx = BitContext::new(4, 8).unwrap();
        assert_eq!(ctx.constants().collect::<Vec<_>>().len(), 16);
        assert_eq!(ctx.check_constant(-8).unwrap(), -8);
        assert!(ctx.check_constant(8).is_err());
        assert!(ctx.check_constant(-9).is_err());
    }

    #[test]
    fn test_rejects_bad_widths() {
        assert!(BitContext::new(1, 16).is_err());
        assert!(BitContext::new(17, 16).is_err());
        assert!(BitContext::new(8, 0).is_err());
        assert!(BitContext::new(16, 49).is_err());
        assert!(BitContext::new(16, 48).is_ok());
    }
}
