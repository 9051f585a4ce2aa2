//! Integration tests for the decomposition search.

use constmul::core::BitContext;
use constmul::search::{generate, Placement, PlacementTable};

fn search(n_bits: u32) -> PlacementTable {
    let _ = env_logger::builder().is_test(true).try_init();
    generate(BitContext::new(n_bits, 16).unwrap())
}

#[test]
fn test_every_odd_value_is_placed() {
    for n_bits in 4..=10 {
        let table = search(n_bits);
        let ctx = table.context();

        assert!(
            table.unreachable().is_empty(),
            "{}-bit search left {:?} unreachable",
            n_bits,
            table.unreachable()
        );
        assert!(table.stats().rounds < n_bits);

        for value in ctx.constants() {
            if value % 2 == 0 || value.abs() == 1 {
                continue;
            }
            assert!(
                table.get(value).is_composite(),
                "{}-bit: {} has no decomposition",
                n_bits,
                value
            );
        }
    }
}

#[test]
fn test_entries_reconstruct_their_value() {
    for n_bits in [4, 8, 10] {
        let table = search(n_bits);
        let ctx = table.context();
        for (value, placement) in table.iter() {
            if placement == Placement::Unreachable {
                continue;
            }
            let rebuilt = table
                .reconstruct(value)
                .unwrap_or_else(|| panic!("{} has no reconstruction", value));
            assert_eq!(ctx.masked(rebuilt), ctx.masked(value), "{}", table.describe(value));
        }
    }
}

#[test]
fn test_composite_operands_are_positive_and_in_range() {
    let table = search(8);
    let ctx = table.context();
    for discovery in table.discoveries() {
        let operands = match discovery.placement {
            Placement::Sum { a, b } | Placement::Diff { a, b } => vec![a, b],
            Placement::Negate { a } => vec![a],
            other => panic!("unexpected discovery {:?}", other),
        };
        for operand in operands {
            assert!(operand > 0, "{}", discovery);
            assert!(operand <= ctx.bound(), "{}", discovery);
        }
    }
}

#[test]
fn test_search_is_deterministic() {
    for n_bits in [6, 9] {
        let first = search(n_bits);
        let second = search(n_bits);
        assert_eq!(first, second);
        assert_eq!(first.discoveries(), second.discoveries());
    }
}

#[test]
fn test_range_extremes() {
    let table = search(8);
    assert_eq!(table.get(-128), Placement::Trivial);
    assert_eq!(table.reconstruct(-128), Some(-128));
    assert_eq!(table.get(127), Placement::Diff { a: 128, b: 1 });
    assert_eq!(table.get(-127), Placement::Diff { a: 1, b: 128 });
}

#[test]
fn test_negations_only_follow_their_operand() {
    let table = search(10);
    for discovery in table.discoveries() {
        if let Placement::Negate { a } = discovery.placement {
            let operand = table
                .discoveries()
                .iter()
                .find(|d| d.value == a)
                .unwrap_or_else(|| panic!("operand {} of {} never discovered", a, discovery));
            assert_eq!(operand.round, discovery.round);
        }
    }
}

#[test]
fn test_stats_match_discoveries() {
    let table = search(8);
    let stats = table.stats();
    assert_eq!(stats.placed(), table.discoveries().len());
    assert_eq!(stats.generation_sizes.len(), stats.rounds as usize + 1);
    let output = stats.to_string();
    assert!(output.contains("Rounds executed: 3"));
    assert!(output.contains("Unreachable values: 0"));
}
