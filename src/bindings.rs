//! Flat numeric boundary for embedding layers.
//!
//! The surrounding product talks to the engine through flat `f64` slices:
//! no structs cross the boundary, and element order is part of the
//! contract. Presentation code indexes straight into the output, so the
//! flattening here must be preserved bit-for-bit.

use crate::allocation::allocate;
use crate::calibration::{CalibrationOptions, calibrate_net_odds};
use crate::core::{BetSpec, EngineError};

/// Joint allocation over an interleaved `[p_1, b_1, ..., p_N, b_N]` slice.
///
/// Returns `N + 1` elements: the optimal fractions in input order, followed
/// by the expected per-round log-growth as the final element.
///
/// # Errors
/// An odd-length slice is [`EngineError::InvalidInput`]; an empty slice is
/// [`EngineError::EmptyBetSet`]; per-pair validation and solver failures
/// propagate unchanged. No partial output is produced on any failure.
///
/// # Examples
/// ```
/// use kellyopt::bindings::allocate_flat;
///
/// let out = allocate_flat(&[0.6, 1.0]).unwrap();
/// assert_eq!(out.len(), 2);
/// assert!((out[0] - 0.2).abs() < 1e-8);     // fraction
/// assert!((out[1] - 0.020136).abs() < 1e-5); // growth, appended last
/// ```
pub fn allocate_flat(pairs: &[f64]) -> Result<Vec<f64>, EngineError> {
    if pairs.is_empty() {
        return Err(EngineError::EmptyBetSet);
    }
    if pairs.len() % 2 != 0 {
        return Err(EngineError::InvalidInput(
            "flat allocation input must interleave (probability, net_odds) pairs",
        ));
    }

    let mut bets = Vec::with_capacity(pairs.len() / 2);
    for pair in pairs.chunks_exact(2) {
        bets.push(BetSpec::new(pair[0], pair[1])?);
    }

    let result = allocate(&bets)?;
    let mut flat = result.fractions;
    flat.push(result.expected_growth);
    Ok(flat)
}

/// Scalar calibration entry point: net odds hitting `target_growth` at the
/// given win probability, under default bisection controls.
///
/// Convergence failure surfaces as the error; a caller never receives a
/// plausible-looking but unvalidated odds value.
pub fn calibrate_flat(probability: f64, target_growth: f64) -> Result<f64, EngineError> {
    let calibration =
        calibrate_net_odds(probability, target_growth, &CalibrationOptions::default())?;
    Ok(calibration.net_odds)
}
