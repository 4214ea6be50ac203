use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// A single risky bet: win probability and net odds.
///
/// `net_odds` is the profit multiple per unit staked on a win (a 2x payout
/// corresponds to net odds of 1). A loss forfeits the stake. Fields are
/// validated at construction and immutable thereafter; violations are
/// rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetSpec {
    probability: f64,
    net_odds: f64,
}

impl BetSpec {
    /// Validates and constructs a bet.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidProbability`] unless
    /// `0 < probability < 1`, and [`EngineError::InvalidOdds`] unless
    /// `net_odds > 0`. Non-finite values are rejected.
    ///
    /// # Examples
    /// ```
    /// use kellyopt::core::BetSpec;
    ///
    /// let bet = BetSpec::new(0.6, 1.0).unwrap();
    /// assert_eq!(bet.probability(), 0.6);
    ///
    /// assert!(BetSpec::new(1.0, 1.0).is_err());
    /// assert!(BetSpec::new(0.6, 0.0).is_err());
    /// ```
    pub fn new(probability: f64, net_odds: f64) -> Result<Self, EngineError> {
        if !probability.is_finite() || probability <= 0.0 || probability >= 1.0 {
            return Err(EngineError::InvalidProbability(probability));
        }
        if !net_odds.is_finite() || net_odds <= 0.0 {
            return Err(EngineError::InvalidOdds(net_odds));
        }
        Ok(Self {
            probability,
            net_odds,
        })
    }

    /// Win probability, strictly inside (0, 1).
    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Net odds (payout multiple minus one), strictly positive.
    #[inline]
    pub fn net_odds(&self) -> f64 {
        self.net_odds
    }

    /// Probability of losing, `1 - probability`.
    #[inline]
    pub fn loss_probability(&self) -> f64 {
        1.0 - self.probability
    }

    /// Edge over the break-even (implied) probability, `p - 1/(1+b)`.
    ///
    /// Positive edge means the bet has positive expected return per unit
    /// staked; the sign of the edge is the sign of the single-bet Kelly
    /// fraction.
    #[inline]
    pub fn edge(&self) -> f64 {
        self.probability - 1.0 / (1.0 + self.net_odds)
    }
}

/// Iteration metadata attached to every iterative-solver success.
///
/// Non-convergence is an error, not a flag: a result carrying this payload
/// always met its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Optimizer steps taken before the tolerance was met.
    pub iterations: usize,
    /// Total objective/gradient evaluations, line search included.
    pub objective_evaluations: usize,
    /// Projected-gradient norm at the accepted point.
    pub gradient_norm: f64,
}

/// Output of the joint allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Bankroll fraction per bet, in input order. All entries are >= 0.
    pub fractions: Vec<f64>,
    /// Expected per-round log-growth of wealth at the returned fractions.
    pub expected_growth: f64,
    /// Solver iteration metadata.
    pub convergence: ConvergenceInfo,
}
