//! Net-odds calibration by bisection on the single-bet growth function.
//!
//! Given a win probability and a target expected log-growth, finds the net
//! odds whose optimal-fraction growth hits the target. Used to construct
//! test scenarios with a known growth rate; the joint allocator never calls
//! into this module.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::growth::growth_rate;

/// Bisection controls. Defaults reproduce the product behavior: bracket
/// `[1e-6, 1e6]`, growth tolerance `1e-6`, 100 iterations.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationOptions {
    /// Lower edge of the net-odds bracket.
    pub lower_odds: f64,
    /// Upper edge of the net-odds bracket.
    pub upper_odds: f64,
    /// Absolute tolerance on `|growth - target|`.
    pub tolerance: f64,
    /// Iteration cap; exhausting it is a [`EngineError::NonConvergence`].
    pub max_iterations: usize,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            lower_odds: 1e-6,
            upper_odds: 1e6,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl CalibrationOptions {
    fn validate(&self) -> Result<(), EngineError> {
        if !self.lower_odds.is_finite() || self.lower_odds <= 0.0 {
            return Err(EngineError::InvalidInput("lower_odds must be > 0"));
        }
        if !self.upper_odds.is_finite() || self.upper_odds <= self.lower_odds {
            return Err(EngineError::InvalidInput(
                "upper_odds must be finite and > lower_odds",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(EngineError::InvalidInput("tolerance must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidInput("max_iterations must be > 0"));
        }
        Ok(())
    }
}

/// Calibrated net odds and the growth actually achieved there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetOddsCalibration {
    /// Net odds whose optimal-fraction growth meets the target.
    pub net_odds: f64,
    /// Growth at `net_odds`; within tolerance of the target.
    pub achieved_growth: f64,
    /// Bisection steps spent.
    pub iterations: usize,
}

/// Finds net odds producing `target_growth` for a bet with the given win
/// probability.
///
/// Bisection assumes the growth function is monotonically non-decreasing in
/// the odds over the bracket; the algorithm does not verify this, but a
/// violated precondition or an unreachable target surfaces as
/// [`EngineError::NonConvergence`] instead of an unvalidated estimate.
///
/// # Errors
/// [`EngineError::InvalidProbability`] for a probability outside (0, 1),
/// [`EngineError::InvalidInput`] for malformed options, and
/// [`EngineError::NonConvergence`] when the iteration cap is exhausted
/// before the tolerance is met.
///
/// # Examples
/// ```
/// use kellyopt::calibration::{CalibrationOptions, calibrate_net_odds};
/// use kellyopt::growth::growth_rate;
///
/// let cal = calibrate_net_odds(0.4, 0.01, &CalibrationOptions::default()).unwrap();
/// let g = growth_rate(cal.net_odds, 0.4).unwrap();
/// assert!((g - 0.01).abs() < 1e-5);
/// ```
pub fn calibrate_net_odds(
    probability: f64,
    target_growth: f64,
    options: &CalibrationOptions,
) -> Result<NetOddsCalibration, EngineError> {
    if !probability.is_finite() || probability <= 0.0 || probability >= 1.0 {
        return Err(EngineError::InvalidProbability(probability));
    }
    options.validate()?;

    let mut lower = options.lower_odds;
    let mut upper = options.upper_odds;
    let mut residual = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        let mid = 0.5 * (lower + upper);
        let growth = growth_rate(mid, probability)?;
        residual = (growth - target_growth).abs();

        if residual <= options.tolerance {
            return Ok(NetOddsCalibration {
                net_odds: mid,
                achieved_growth: growth,
                iterations: iteration,
            });
        }

        if growth < target_growth {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    Err(EngineError::NonConvergence {
        iterations: options.max_iterations,
        residual,
    })
}
