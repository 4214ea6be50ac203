//! Joint growth-optimal allocation over simultaneous independent bets.
//!
//! Maximizes `E[ln(1 + sum_i f_i * r_i)]` over fraction vectors `f >= 0`
//! subject to wealth staying strictly positive under every joint outcome.
//! The additive-return form is what makes the problem genuinely joint: the
//! objective does not decompose into per-bet problems except at N = 1.
//!
//! The region is convex and the objective strictly concave on it, so the
//! maximizer is unique. The solver is a damped projected-Newton ascent:
//! bound variables sitting at zero with non-positive gradient are frozen
//! each iteration, the free block takes a Levenberg-damped Newton step, and
//! an Armijo backtracking line search rejects any candidate that leaves the
//! feasible region.
//!
//! References:
//! - Thorp (1997), "The Kelly criterion in blackjack, sports betting, and
//!   the stock market", §7 (simultaneous independent wagers).
//! - Nocedal and Wright, *Numerical Optimization* (2nd ed.), Ch. 16
//!   (gradient projection with second-order subspace steps).

mod outcomes;

use nalgebra::{DMatrix, DVector};

use crate::core::{AllocationResult, BetSpec, ConvergenceInfo, EngineError};
use crate::growth::kelly_fraction;
use outcomes::OutcomeGrid;

/// Exhaustive-enumeration bound: 2^N outcomes per objective evaluation.
/// Larger bet sets need sampling or a closed-form reduction and are
/// rejected.
pub const MAX_BETS: usize = 20;

/// Total initial exposure the starting point is rescaled to when the
/// clamped single-bet fractions would jointly bankrupt the all-lose
/// outcome.
const INITIAL_EXPOSURE: f64 = 0.95;

/// Joint-solver controls.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorOptions {
    /// Newton iteration cap; exhausting it is a
    /// [`EngineError::NonConvergence`].
    pub max_iterations: usize,
    /// Convergence threshold on the projected-gradient (KKT) norm.
    pub gradient_tolerance: f64,
    /// Initial Levenberg damping on the Newton system.
    pub initial_damping: f64,
    /// Damping multiplier after a rejected step.
    pub damping_up: f64,
    /// Damping multiplier after an accepted step.
    pub damping_down: f64,
    /// Armijo sufficient-increase slope factor.
    pub armijo_slope: f64,
    /// Halvings attempted in the backtracking line search.
    pub max_backtracks: usize,
    /// Consecutive rejected iterations tolerated before giving up.
    pub max_stagnation: usize,
}

impl Default for AllocatorOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            gradient_tolerance: 1e-8,
            initial_damping: 1e-3,
            damping_up: 3.0,
            damping_down: 0.35,
            armijo_slope: 1e-4,
            max_backtracks: 40,
            max_stagnation: 10,
        }
    }
}

impl AllocatorOptions {
    fn validate(&self) -> Result<(), EngineError> {
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidInput("max_iterations must be > 0"));
        }
        if !self.gradient_tolerance.is_finite() || self.gradient_tolerance <= 0.0 {
            return Err(EngineError::InvalidInput("gradient_tolerance must be > 0"));
        }
        if !self.initial_damping.is_finite() || self.initial_damping <= 0.0 {
            return Err(EngineError::InvalidInput("initial_damping must be > 0"));
        }
        if self.damping_up <= 1.0 || self.damping_down <= 0.0 || self.damping_down >= 1.0 {
            return Err(EngineError::InvalidInput(
                "damping multipliers must satisfy up > 1 and 0 < down < 1",
            ));
        }
        if self.max_backtracks == 0 || self.max_stagnation == 0 {
            return Err(EngineError::InvalidInput(
                "max_backtracks and max_stagnation must be > 0",
            ));
        }
        Ok(())
    }
}

/// Allocates with default options.
///
/// # Examples
/// ```
/// use kellyopt::allocation::allocate;
/// use kellyopt::core::BetSpec;
///
/// let bets = [BetSpec::new(0.6, 1.0).unwrap()];
/// let result = allocate(&bets).unwrap();
/// assert!((result.fractions[0] - 0.2).abs() < 1e-8);
/// assert!((result.expected_growth - 0.0201355).abs() < 1e-6);
/// ```
pub fn allocate(bets: &[BetSpec]) -> Result<AllocationResult, EngineError> {
    allocate_with(bets, &AllocatorOptions::default())
}

/// Finds the fraction vector maximizing expected log-growth.
///
/// Fractions come back in input order; permuting the bets permutes the
/// fractions identically. Non-positive-edge bets enter the solver like any
/// other — they are never pre-clamped to zero — and end wherever the joint
/// optimum puts them.
///
/// # Errors
/// Validation errors ([`EngineError::EmptyBetSet`],
/// [`EngineError::TooManyBets`], [`EngineError::InvalidInput`]) reject the
/// whole call before any numerical work. [`EngineError::NonConvergence`] is
/// returned when the iteration cap or stagnation limit is hit with the KKT
/// norm still above tolerance — never a silently-degraded interior point.
pub fn allocate_with(
    bets: &[BetSpec],
    options: &AllocatorOptions,
) -> Result<AllocationResult, EngineError> {
    let n = bets.len();
    if n == 0 {
        return Err(EngineError::EmptyBetSet);
    }
    if n > MAX_BETS {
        return Err(EngineError::TooManyBets {
            count: n,
            max: MAX_BETS,
        });
    }
    options.validate()?;

    let grid = OutcomeGrid::new(bets);
    let mut fractions = starting_point(bets)?;

    let mut gradient = vec![0.0; n];
    let mut candidate = vec![0.0; n];
    let mut hessian = DMatrix::zeros(n, n);
    let mut free = Vec::with_capacity(n);

    let mut evaluations = 1usize;
    let mut objective = grid
        .log_growth_with_gradient(bets, &fractions, &mut gradient)
        .ok_or(EngineError::InfeasibleRegion)?;

    let mut damping = options.initial_damping;
    let mut stagnation = 0usize;
    let mut kkt_norm = f64::INFINITY;

    for iteration in 0..=options.max_iterations {
        // Freeze bound variables that the optimum pins at zero; the KKT
        // residual is the gradient norm over the remaining free block.
        free.clear();
        for i in 0..n {
            if fractions[i] > 0.0 || gradient[i] > 0.0 {
                free.push(i);
            }
        }
        kkt_norm = free
            .iter()
            .map(|&i| gradient[i] * gradient[i])
            .sum::<f64>()
            .sqrt();

        if kkt_norm <= options.gradient_tolerance {
            return Ok(AllocationResult {
                fractions,
                expected_growth: objective,
                convergence: ConvergenceInfo {
                    iterations: iteration,
                    objective_evaluations: evaluations,
                    gradient_norm: kkt_norm,
                },
            });
        }
        if iteration == options.max_iterations {
            break;
        }

        // Damped Newton system on the free block: (-H + lambda*D) delta = g.
        grid.hessian(bets, &fractions, &mut hessian);
        let m = free.len();
        let mut system = DMatrix::zeros(m, m);
        for (row, &i) in free.iter().enumerate() {
            for (col, &j) in free.iter().enumerate() {
                system[(row, col)] = -hessian[(i, j)];
            }
        }
        for row in 0..m {
            system[(row, row)] += damping * (system[(row, row)].abs() + 1.0);
        }
        let reduced_gradient = DVector::from_iterator(m, free.iter().map(|&i| gradient[i]));

        let Some(delta) = system.lu().solve(&reduced_gradient) else {
            damping = (damping * options.damping_up).min(1e12);
            stagnation += 1;
            if stagnation >= options.max_stagnation {
                return Err(EngineError::NonConvergence {
                    iterations: iteration + 1,
                    residual: kkt_norm,
                });
            }
            continue;
        };

        // Ascent rate along delta; strictly positive since the damped
        // system is positive definite.
        let slope = delta.dot(&reduced_gradient);

        let mut step = 1.0;
        let mut accepted = false;
        for _ in 0..options.max_backtracks {
            candidate.copy_from_slice(&fractions);
            for (row, &i) in free.iter().enumerate() {
                candidate[i] = (fractions[i] + step * delta[row]).max(0.0);
            }

            evaluations += 1;
            if let Some(value) = grid.log_growth(bets, &candidate) {
                if value >= objective + options.armijo_slope * step * slope {
                    fractions.copy_from_slice(&candidate);
                    accepted = true;
                    break;
                }
            }
            step *= 0.5;
        }

        if accepted {
            damping = (damping * options.damping_down).max(1e-12);
            stagnation = 0;
            evaluations += 1;
            objective = grid
                .log_growth_with_gradient(bets, &fractions, &mut gradient)
                .ok_or(EngineError::InfeasibleRegion)?;
        } else {
            damping = (damping * options.damping_up).min(1e12);
            stagnation += 1;
            if stagnation >= options.max_stagnation {
                return Err(EngineError::NonConvergence {
                    iterations: iteration + 1,
                    residual: kkt_norm,
                });
            }
        }
    }

    Err(EngineError::NonConvergence {
        iterations: options.max_iterations,
        residual: kkt_norm,
    })
}

/// Single-bet optima clamped at zero, rescaled when the all-lose outcome
/// would be bankrupting.
fn starting_point(bets: &[BetSpec]) -> Result<Vec<f64>, EngineError> {
    let mut fractions = Vec::with_capacity(bets.len());
    for bet in bets {
        let f = kelly_fraction(bet.net_odds(), bet.probability())?;
        fractions.push(f.max(0.0));
    }

    let total: f64 = fractions.iter().sum();
    if total >= 1.0 {
        let scale = INITIAL_EXPOSURE / total;
        for f in &mut fractions {
            *f *= scale;
        }
    }
    Ok(fractions)
}
