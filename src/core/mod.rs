//! Core domain types and the library-wide error enum.

pub mod types;

pub use types::*;

/// Errors surfaced by the engine API.
///
/// Validation errors are detected before any numerical work begins; iterative
/// routines report non-convergence here instead of returning an unvalidated
/// estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Win probability outside the open interval (0, 1), or non-finite.
    InvalidProbability(f64),
    /// Net odds non-positive or non-finite.
    InvalidOdds(f64),
    /// Structural input error (malformed flat payload, bad options).
    InvalidInput(&'static str),
    /// The allocator was called with no bets.
    EmptyBetSet,
    /// Bet count above the exhaustive-enumeration bound.
    TooManyBets { count: usize, max: usize },
    /// No allocation keeps wealth positive under every joint outcome.
    InfeasibleRegion,
    /// Iteration cap reached without meeting the convergence tolerance.
    NonConvergence { iterations: usize, residual: f64 },
    /// A log-growth evaluation left its valid domain.
    UndefinedGrowth { log_argument: f64 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProbability(p) => {
                write!(f, "invalid probability: {p} is not in (0, 1)")
            }
            Self::InvalidOdds(b) => write!(f, "invalid net odds: {b} is not > 0"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::EmptyBetSet => write!(f, "empty bet set: at least one bet is required"),
            Self::TooManyBets { count, max } => {
                write!(
                    f,
                    "too many bets: {count} exceeds the enumeration bound {max}"
                )
            }
            Self::InfeasibleRegion => {
                write!(f, "infeasible region: no allocation keeps wealth positive")
            }
            Self::NonConvergence {
                iterations,
                residual,
            } => write!(
                f,
                "non-convergence after {iterations} iterations (residual {residual:.3e})"
            ),
            Self::UndefinedGrowth { log_argument } => write!(
                f,
                "undefined growth: log argument {log_argument} is not positive"
            ),
        }
    }
}

impl std::error::Error for EngineError {}
