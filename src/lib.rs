//! Kellyopt is a growth-optimal stake-sizing library: given a set of
//! simultaneous, statistically independent risky bets, it computes the
//! bankroll fraction to stake on each so as to maximize the expected
//! long-run logarithmic growth of wealth.
//!
//! The crate combines the single-bet Kelly closed forms, a bisection
//! calibrator that finds the net odds producing a target growth rate, and a
//! joint allocator that maximizes expected log-growth over all 2^N joint
//! outcomes of an N-bet round resolved simultaneously from one bankroll.
//!
//! References used across modules:
//! - Kelly (1956), "A New Interpretation of Information Rate".
//! - Breiman (1961), "Optimal Gambling Systems for Favorable Games".
//! - Thorp (1997), "The Kelly criterion in blackjack, sports betting, and
//!   the stock market" (simultaneous independent wagers).
//! - Nocedal and Wright, *Numerical Optimization* (2nd ed.), Ch. 16.
//!
//! Numerical considerations:
//! - The joint objective is evaluated by exhaustive 2^N outcome
//!   enumeration; the allocator rejects bet sets past
//!   [`allocation::MAX_BETS`] rather than silently degrading.
//! - Iterative routines report non-convergence in their return type; an
//!   iteration cap never produces a silently-degraded estimate.
//! - Log-domain violations surface as a tagged error, never as an infinite
//!   sentinel.
//!
//! Every call is pure, synchronous, and self-contained: no global state, no
//! I/O, safe to invoke from any number of threads concurrently. Heavy
//! N-bet calls should run off the UI thread; the iteration caps bound
//! worst-case latency.
//!
//! # Feature Flags
//! - `parallel`: enables a Rayon-powered reduction over the outcome grid
//!   for large bet sets. Throughput only; results are identical up to
//!   floating-point summation order.
//!
//! # Quick Start
//! Single-bet sizing:
//! ```rust
//! use kellyopt::growth::{growth_rate, kelly_fraction};
//!
//! let f = kelly_fraction(1.0, 0.6).unwrap();
//! assert!((f - 0.2).abs() < 1e-12);
//!
//! let g = growth_rate(1.0, 0.6).unwrap();
//! assert!(g > 0.02 && g < 0.021);
//! ```
//!
//! Joint allocation across simultaneous bets:
//! ```rust
//! use kellyopt::allocation::allocate;
//! use kellyopt::core::BetSpec;
//!
//! let bets = [
//!     BetSpec::new(0.6, 1.0).unwrap(),
//!     BetSpec::new(0.6, 1.0).unwrap(),
//! ];
//! let result = allocate(&bets).unwrap();
//! // Pooled bets shrink below the isolated Kelly fraction of 0.2.
//! assert!(result.fractions.iter().all(|f| *f < 0.2 && *f > 0.15));
//! ```
//!
//! Calibrating odds to a target growth rate:
//! ```rust
//! use kellyopt::calibration::{CalibrationOptions, calibrate_net_odds};
//!
//! let cal = calibrate_net_odds(0.4, 0.01, &CalibrationOptions::default()).unwrap();
//! assert!((cal.achieved_growth - 0.01).abs() < 1e-5);
//! ```

pub mod allocation;
pub mod bindings;
pub mod calibration;
pub mod core;
pub mod growth;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::allocation::{AllocatorOptions, allocate, allocate_with};
    pub use crate::calibration::{CalibrationOptions, NetOddsCalibration, calibrate_net_odds};
    pub use crate::core::{AllocationResult, BetSpec, ConvergenceInfo, EngineError};
    pub use crate::growth::{growth_rate, kelly_fraction};
}
