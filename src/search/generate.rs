//! Round-by-round generation of the placement table.

use super::{Discovery, Placement, PlacementTable};
use crate::core::{BitContext, SearchStats};

/// Build the placement table for `ctx.n_bits()`.
///
/// Round `n` combines every member of generation `a` with every member of
/// generation `b` where `a + b == n - 1`, trying `one + two`, `one - two` and
/// `two - one` in that order. The first discovery of a value wins, so the table
/// depends only on the constant width.
pub fn generate(ctx: BitContext) -> PlacementTable {
    let mut search = Search::new(ctx);
    search.run();
    search.finish()
}

struct Search {
    ctx: BitContext,
    entries: Vec<Placement>,
    discoveries: Vec<Discovery>,
    stats: SearchStats,
}

impl Search {
    fn new(ctx: BitContext) -> Self {
        let mut entries = vec![Placement::Unreachable; ctx.table_len()];

        // 0, 1 and -1 need no chain; even values reduce to an odd core by shifting.
        entries[0] = Placement::Trivial;
        entries[1] = Placement::Trivial;
        entries[ctx.masked(-1)] = Placement::Trivial;
        for entry in entries.iter_mut().skip(2).step_by(2) {
            *entry = Placement::Trivial;
        }

        Self {
            ctx,
            entries,
            discoveries: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn run(&mut self) {
        let n_bits = self.ctx.n_bits();
        let powers: Vec<i32> = (0..n_bits).map(|shift| 1 << shift).collect();
        log::debug!("Generation 0: {} powers of two", powers.len());
        self.stats.record_generation(powers.len());

        let mut generations = vec![powers];

        for round in 1..n_bits {
            if self.converged() {
                log::debug!("All values placed before round {}", round);
                break;
            }
            self.stats.rounds = round;

            let mut next = Vec::new();
            for a in 0..round as usize {
                let b = round as usize - 1 - a;
                for &one in &generations[a] {
                    for &two in &generations[b] {
                        let candidates = [
                            (one + two, Placement::Sum { a: one, b: two }),
                            (one - two, Placement::Diff { a: one, b: two }),
                            (two - one, Placement::Diff { a: two, b: one }),
                        ];
                        for (value, placement) in candidates {
                            if self.place(value, placement, round) && value > 0 {
                                next.push(value);
                            }
                        }
                    }
                }
            }

            // Negations are recorded but never join a generation.
            for &one in &next {
                self.place(-one, Placement::Negate { a: one }, round);
            }

            log::debug!("Generation {}: {} values", round, next.len());
            self.stats.record_generation(next.len());
            generations.push(next);
        }
    }

    /// Record `placement` for `value` unless it is out of range or already known.
    fn place(&mut self, value: i32, placement: Placement, round: u32) -> bool {
        if !self.ctx.contains(value as i64) {
            return false;
        }
        let index = self.ctx.masked(value);
        if self.entries[index] != Placement::Unreachable {
            return false;
        }

        self.entries[index] = placement;
        match placement {
            Placement::Negate { .. } => self.stats.negations += 1,
            _ => self.stats.composites += 1,
        }

        let discovery = Discovery {
            value,
            round,
            placement,
        };
        log::trace!("{}", discovery);
        self.discoveries.push(discovery);
        true
    }

    fn converged(&self) -> bool {
        self.entries[1..]
            .iter()
            .all(|entry| *entry != Placement::Unreachable)
    }

    fn finish(mut self) -> PlacementTable {
        self.stats.unreachable = self.entries[1..]
            .iter()
            .filter(|entry| **entry == Placement::Unreachable)
            .count();

        if self.stats.unreachable > 0 {
            log::warn!(
                "{} values have no decomposition within {} rounds",
                self.stats.unreachable,
                self.ctx.n_bits() - 1
            );
        }
        log::info!(
            "Placed {} values for {}-bit constants in {} rounds",
            self.stats.placed(),
            self.ctx.n_bits(),
            self.stats.rounds
        );

        PlacementTable::from_parts(self.ctx, self.entries, self.discoveries, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n_bits: u32) -> PlacementTable {
        generate(BitContext::new(n_bits, 16).unwrap())
    }

    #[test]
    fn test_trivial_entries() {
        let table = table(8);
        assert_eq!(table.get(0), Placement::Trivial);
        assert_eq!(table.get(1), Placement::Trivial);
        assert_eq!(table.get(-1), Placement::Trivial);
        assert_eq!(table.get(-128), Placement::Trivial);
        assert_eq!(table.get(100), Placement::Trivial);
    }

    #[test]
    fn test_first_round_entries() {
        let table = table(8);
        assert_eq!(table.get(3), Placement::Sum { a: 1, b: 2 });
        assert_eq!(table.get(-3), Placement::Diff { a: 1, b: 4 });
        assert_eq!(table.get(7), Placement::Diff { a: 8, b: 1 });
        assert_eq!(table.get(127), Placement::Diff { a: 128, b: 1 });
        assert_eq!(table.get(-127), Placement::Diff { a: 1, b: 128 });
    }

    #[test]
    fn test_later_round_entries() {
        let table = table(8);
        assert_eq!(table.get(11), Placement::Sum { a: 2, b: 9 });
        assert_eq!(table.get(45), Placement::Diff { a: 47, b: 2 });
        assert_eq!(table.get(85), Placement::Sum { a: 4, b: 81 });
        assert_eq!(table.get(-85), Placement::Negate { a: 85 });
    }

    #[test]
    fn test_generation_sizes() {
        let table = table(8);
        let stats = table.stats();
        assert_eq!(stats.rounds, 3);
        assert_eq!(stats.generation_sizes, vec![8, 11, 32, 20]);
        assert_eq!(stats.unreachable, 0);
    }

    #[test]
    fn test_discoveries_are_ordered_by_round() {
        let table = table(8);
        let rounds: Vec<u32> = table.discoveries().iter().map(|d| d.round).collect();
        assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(table.discoveries()[0].to_string(), "3 = 1 + 2");
        assert_eq!(table.discoveries().len(), table.stats().placed());
    }

    #[test]
    fn test_small_width_converges_in_one_round() {
        let table = table(4);
        assert_eq!(table.stats().rounds, 1);
        assert!(table.unreachable().is_empty());
    }
}
