//! Single-bet Kelly closed forms.
//!
//! References:
//! - Kelly (1956), "A New Interpretation of Information Rate".
//! - Thorp (2006), "The Kelly Criterion in Blackjack, Sports Betting, and
//!   the Stock Market", Handbook of Asset and Liability Management.
//!
//! Argument order is `(net_odds, probability)` throughout, matching the
//! classical `f* = (bp - q) / b` notation.

use crate::core::EngineError;

/// Unconstrained single-bet Kelly fraction `f* = (b*p - q) / b`.
///
/// The result may be negative when the edge is negative; callers staking
/// real money clamp at zero. The joint allocator uses the raw value as its
/// starting point, so no clamping happens here.
///
/// # Errors
/// `net_odds == 0` is a domain error (division by zero) and is reported as
/// [`EngineError::InvalidOdds`] rather than producing a NaN or infinity.
/// Non-finite inputs are rejected the same way.
///
/// # Examples
/// ```
/// use kellyopt::growth::kelly_fraction;
///
/// let f = kelly_fraction(1.0, 0.6).unwrap();
/// assert!((f - 0.2).abs() < 1e-12);
///
/// // Negative edge yields a negative unconstrained optimum.
/// assert!(kelly_fraction(1.0, 0.4).unwrap() < 0.0);
///
/// assert!(kelly_fraction(0.0, 0.6).is_err());
/// ```
pub fn kelly_fraction(net_odds: f64, probability: f64) -> Result<f64, EngineError> {
    if !net_odds.is_finite() || net_odds == 0.0 {
        return Err(EngineError::InvalidOdds(net_odds));
    }
    if !probability.is_finite() {
        return Err(EngineError::InvalidProbability(probability));
    }

    let q = 1.0 - probability;
    Ok((net_odds * probability - q) / net_odds)
}

/// Expected per-round log-growth at the optimal Kelly fraction,
/// `g = p*ln(1 + f*b) + q*ln(1 - f)` with `f = kelly_fraction(b, p)`.
///
/// # Errors
/// When a log argument is not strictly positive (only reachable for
/// pathological inputs such as negative odds driving `f >= 1`), the
/// computation is undefined and reported as
/// [`EngineError::UndefinedGrowth`] carrying the offending argument. An
/// infinite sentinel is never returned: an unbounded number would be
/// indistinguishable from an extremely good (but valid) growth figure.
///
/// # Examples
/// ```
/// use kellyopt::growth::growth_rate;
///
/// let g = growth_rate(1.0, 0.6).unwrap();
/// assert!((g - 0.020135).abs() < 1e-5);
/// ```
pub fn growth_rate(net_odds: f64, probability: f64) -> Result<f64, EngineError> {
    let q = 1.0 - probability;
    let f = kelly_fraction(net_odds, probability)?;

    let win_argument = 1.0 + f * net_odds;
    if win_argument <= 0.0 {
        return Err(EngineError::UndefinedGrowth {
            log_argument: win_argument,
        });
    }
    let loss_argument = 1.0 - f;
    if loss_argument <= 0.0 {
        return Err(EngineError::UndefinedGrowth {
            log_argument: loss_argument,
        });
    }

    Ok(probability * win_argument.ln() + q * loss_argument.ln())
}
