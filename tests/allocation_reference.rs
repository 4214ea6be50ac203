//! Joint-allocator reference tests.
//!
//! Fixtures with analytically derived optima: the N = 1 closed form, the
//! zero-edge degenerate case, and the symmetric two-bet problem whose
//! first-order condition solves in closed form.

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};

use kellyopt::allocation::{AllocatorOptions, MAX_BETS, allocate, allocate_with};
use kellyopt::core::{BetSpec, EngineError};
use kellyopt::growth::{growth_rate, kelly_fraction};

#[derive(Debug, Clone)]
struct AllocationCase {
    name: &'static str,
    bets: Vec<(f64, f64)>,
    expected_fractions: Vec<f64>,
    expected_growth: f64,
    tolerance: f64,
}

fn build(bets: &[(f64, f64)]) -> Vec<BetSpec> {
    bets.iter()
        .map(|&(p, b)| BetSpec::new(p, b).unwrap())
        .collect()
}

fn reference_cases() -> Vec<AllocationCase> {
    vec![
        // p = 0.6 at even net odds: f* = (0.6 - 0.4) / 1 = 0.2,
        // g = 0.6*ln(1.2) + 0.4*ln(0.8).
        AllocationCase {
            name: "single favorable even-odds bet",
            bets: vec![(0.6, 1.0)],
            expected_fractions: vec![0.2],
            expected_growth: 0.0201355135,
            tolerance: 1e-7,
        },
        // Zero edge: stake nothing, grow nothing.
        AllocationCase {
            name: "two zero-edge coin flips",
            bets: vec![(0.5, 1.0), (0.5, 1.0)],
            expected_fractions: vec![0.0, 0.0],
            expected_growth: 0.0,
            tolerance: 1e-8,
        },
        // Symmetric pair, each p = 0.6, b = 1: first-order condition
        // 0.72/(1+2f) = 0.32/(1-2f) gives f = 5/26 per bet.
        AllocationCase {
            name: "symmetric favorable pair",
            bets: vec![(0.6, 1.0), (0.6, 1.0)],
            expected_fractions: vec![5.0 / 26.0, 5.0 / 26.0],
            expected_growth: 0.0394708135,
            tolerance: 1e-6,
        },
        // A zero-edge bet pooled with a favorable one changes nothing: the
        // boundary gradient factorizes as E[r]*E[1/w] = 0.
        AllocationCase {
            name: "favorable bet plus zero-edge bet",
            bets: vec![(0.6, 1.0), (0.5, 1.0)],
            expected_fractions: vec![0.2, 0.0],
            expected_growth: 0.0201355135,
            tolerance: 1e-7,
        },
        // Negative edge pooled with a strong favorite: the joint optimum
        // still pins the bad bet at zero and keeps the favorite at its
        // isolated fraction.
        AllocationCase {
            name: "favorite pooled with negative-edge bet",
            bets: vec![(0.7, 1.0), (0.4, 1.0)],
            expected_fractions: vec![0.4, 0.0],
            expected_growth: 0.0822828785,
            tolerance: 1e-7,
        },
    ]
}

#[test]
fn matches_analytic_reference_cases() {
    for case in reference_cases() {
        let bets = build(&case.bets);
        let result = allocate(&bets).unwrap();

        assert_eq!(
            result.fractions.len(),
            case.bets.len(),
            "case '{}': output arity",
            case.name
        );
        for (i, (&got, &expected)) in result
            .fractions
            .iter()
            .zip(case.expected_fractions.iter())
            .enumerate()
        {
            assert!(
                (got - expected).abs() <= case.tolerance,
                "case '{}': fraction {i} = {got}, expected {expected}",
                case.name
            );
        }
        assert!(
            (result.expected_growth - case.expected_growth).abs() <= case.tolerance,
            "case '{}': growth = {}, expected {}",
            case.name,
            result.expected_growth,
            case.expected_growth
        );
    }
}

#[test]
fn single_bet_reduces_to_clamped_closed_form() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(101);
    for _ in 0..200 {
        let p = rng.random_range(0.05..0.95);
        let b = rng.random_range(0.1..8.0);

        let result = allocate(&[BetSpec::new(p, b).unwrap()]).unwrap();
        let clamped = kelly_fraction(b, p).unwrap().max(0.0);
        assert_relative_eq!(result.fractions[0], clamped, epsilon = 1e-7);

        if clamped > 0.0 {
            let g = growth_rate(b, p).unwrap();
            assert_relative_eq!(result.expected_growth, g, epsilon = 1e-7);
        } else {
            assert!(result.expected_growth.abs() < 1e-12);
        }
    }
}

#[test]
fn permuting_bets_permutes_fractions_and_preserves_growth() {
    let original = build(&[(0.6, 1.0), (0.3, 4.0), (0.55, 0.8)]);
    let permuted = build(&[(0.55, 0.8), (0.6, 1.0), (0.3, 4.0)]);

    let a = allocate(&original).unwrap();
    let b = allocate(&permuted).unwrap();

    assert_relative_eq!(a.fractions[0], b.fractions[1], epsilon = 1e-7);
    assert_relative_eq!(a.fractions[1], b.fractions[2], epsilon = 1e-7);
    assert_relative_eq!(a.fractions[2], b.fractions[0], epsilon = 1e-7);
    assert_relative_eq!(a.expected_growth, b.expected_growth, epsilon = 1e-10);
}

#[test]
fn fractions_are_non_negative_over_random_bet_sets() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(211);
    for _ in 0..60 {
        let n = rng.random_range(2..=4);
        let bets: Vec<BetSpec> = (0..n)
            .map(|_| {
                BetSpec::new(rng.random_range(0.1..0.9), rng.random_range(0.2..4.0)).unwrap()
            })
            .collect();

        let result = allocate(&bets).unwrap();
        for (i, f) in result.fractions.iter().enumerate() {
            assert!(*f >= 0.0, "bet {i} got negative fraction {f}");
        }
        let total: f64 = result.fractions.iter().sum();
        assert!(total < 1.0, "total exposure {total} reached the all-lose bound");
    }
}

#[test]
fn ten_bet_round_converges() {
    // 2^10 outcomes per evaluation; exercises the grid well past the toy
    // sizes while staying cheap enough for CI.
    let mut rng = rand::rngs::StdRng::seed_from_u64(307);
    let bets: Vec<BetSpec> = (0..10)
        .map(|_| BetSpec::new(rng.random_range(0.35..0.65), rng.random_range(0.8..1.6)).unwrap())
        .collect();

    let result = allocate(&bets).unwrap();
    assert!(result.convergence.gradient_norm <= 1e-8);
    assert!(result.fractions.iter().all(|f| *f >= 0.0));
    assert!(result.fractions.iter().sum::<f64>() < 1.0);
}

#[test]
fn growth_never_decreases_when_a_favorable_bet_joins_the_pool() {
    let solo = allocate(&build(&[(0.6, 1.0)])).unwrap();
    let pooled = allocate(&build(&[(0.6, 1.0), (0.55, 1.2)])).unwrap();
    assert!(pooled.expected_growth > solo.expected_growth);
}

#[test]
fn starved_iteration_budget_reports_non_convergence() {
    let options = AllocatorOptions {
        max_iterations: 1,
        ..AllocatorOptions::default()
    };
    let bets = build(&[(0.6, 1.0), (0.6, 1.0)]);
    let err = allocate_with(&bets, &options).unwrap_err();
    match err {
        EngineError::NonConvergence {
            iterations,
            residual,
        } => {
            assert_eq!(iterations, 1);
            assert!(residual > 1e-8);
        }
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}

#[test]
fn oversized_bet_set_is_rejected_before_any_numerical_work() {
    let bets = vec![BetSpec::new(0.55, 1.0).unwrap(); MAX_BETS + 1];
    match allocate(&bets).unwrap_err() {
        EngineError::TooManyBets { count, max } => {
            assert_eq!(count, MAX_BETS + 1);
            assert_eq!(max, MAX_BETS);
        }
        other => panic!("expected TooManyBets, got {other:?}"),
    }
}
