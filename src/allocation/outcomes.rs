//! Joint-outcome enumeration for simultaneous independent bets.
//!
//! Outcome `k` is the bit-pattern selecting win/loss per bet: bit `i` set
//! means bet `i` wins and returns its net odds per unit staked, clear means
//! it loses the stake. The 2^N joint probabilities depend only on the bet
//! set, never on the fraction vector, so they are computed once per
//! allocation call; objective, gradient, and Hessian evaluations then run
//! over caller-owned buffers with no allocation in the outcome loop.

use nalgebra::DMatrix;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::BetSpec;

/// Outcome count above which the rayon path takes over, when enabled.
#[cfg(feature = "parallel")]
const PARALLEL_CUTOFF: usize = 1 << 12;

/// Precomputed joint-outcome probabilities for one bet set.
pub(crate) struct OutcomeGrid {
    probabilities: Vec<f64>,
    bet_count: usize,
}

impl OutcomeGrid {
    pub fn new(bets: &[BetSpec]) -> Self {
        let n = bets.len();
        let mut probabilities = vec![0.0; 1usize << n];
        for (k, slot) in probabilities.iter_mut().enumerate() {
            let mut p = 1.0;
            for (i, bet) in bets.iter().enumerate() {
                p *= if (k >> i) & 1 == 1 {
                    bet.probability()
                } else {
                    bet.loss_probability()
                };
            }
            *slot = p;
        }
        Self {
            probabilities,
            bet_count: n,
        }
    }

    /// Wealth factor `1 + sum_i f_i * r_i(k)` for outcome `k`.
    #[inline]
    fn wealth_factor(bets: &[BetSpec], fractions: &[f64], k: usize) -> f64 {
        let mut w = 1.0;
        for (i, bet) in bets.iter().enumerate() {
            let r = if (k >> i) & 1 == 1 { bet.net_odds() } else { -1.0 };
            w += fractions[i] * r;
        }
        w
    }

    /// Expected log-growth at `fractions`, or `None` if any outcome drives
    /// the wealth factor non-positive (the point is outside the feasible
    /// region).
    pub fn log_growth(&self, bets: &[BetSpec], fractions: &[f64]) -> Option<f64> {
        #[cfg(feature = "parallel")]
        if self.probabilities.len() >= PARALLEL_CUTOFF {
            return self.log_growth_parallel(bets, fractions);
        }
        self.log_growth_sequential(bets, fractions)
    }

    fn log_growth_sequential(&self, bets: &[BetSpec], fractions: &[f64]) -> Option<f64> {
        let mut growth = 0.0;
        for (k, &pk) in self.probabilities.iter().enumerate() {
            let w = Self::wealth_factor(bets, fractions, k);
            if w <= 0.0 {
                return None;
            }
            growth += pk * w.ln();
        }
        Some(growth)
    }

    #[cfg(feature = "parallel")]
    fn log_growth_parallel(&self, bets: &[BetSpec], fractions: &[f64]) -> Option<f64> {
        self.probabilities
            .par_iter()
            .enumerate()
            .try_fold(
                || 0.0_f64,
                |acc, (k, &pk)| {
                    let w = Self::wealth_factor(bets, fractions, k);
                    if w <= 0.0 {
                        return None;
                    }
                    Some(acc + pk * w.ln())
                },
            )
            .try_reduce(|| 0.0_f64, |a, b| Some(a + b))
    }

    /// Expected log-growth and its gradient in one pass. Writes the gradient
    /// into `gradient` (zeroed here) and returns the objective, or `None`
    /// outside the feasible region.
    pub fn log_growth_with_gradient(
        &self,
        bets: &[BetSpec],
        fractions: &[f64],
        gradient: &mut [f64],
    ) -> Option<f64> {
        #[cfg(feature = "parallel")]
        if self.probabilities.len() >= PARALLEL_CUTOFF {
            return self.log_growth_with_gradient_parallel(bets, fractions, gradient);
        }
        self.log_growth_with_gradient_sequential(bets, fractions, gradient)
    }

    fn log_growth_with_gradient_sequential(
        &self,
        bets: &[BetSpec],
        fractions: &[f64],
        gradient: &mut [f64],
    ) -> Option<f64> {
        gradient.fill(0.0);
        let mut growth = 0.0;
        for (k, &pk) in self.probabilities.iter().enumerate() {
            let w = Self::wealth_factor(bets, fractions, k);
            if w <= 0.0 {
                return None;
            }
            growth += pk * w.ln();
            let scale = pk / w;
            for (i, bet) in bets.iter().enumerate() {
                let r = if (k >> i) & 1 == 1 { bet.net_odds() } else { -1.0 };
                gradient[i] += scale * r;
            }
        }
        Some(growth)
    }

    #[cfg(feature = "parallel")]
    fn log_growth_with_gradient_parallel(
        &self,
        bets: &[BetSpec],
        fractions: &[f64],
        gradient: &mut [f64],
    ) -> Option<f64> {
        let n = self.bet_count;
        let folded = self
            .probabilities
            .par_iter()
            .enumerate()
            .try_fold(
                || (0.0_f64, vec![0.0_f64; n]),
                |(mut growth, mut grad), (k, &pk)| {
                    let w = Self::wealth_factor(bets, fractions, k);
                    if w <= 0.0 {
                        return None;
                    }
                    growth += pk * w.ln();
                    let scale = pk / w;
                    for (i, bet) in bets.iter().enumerate() {
                        let r = if (k >> i) & 1 == 1 { bet.net_odds() } else { -1.0 };
                        grad[i] += scale * r;
                    }
                    Some((growth, grad))
                },
            )
            .try_reduce(
                || (0.0_f64, vec![0.0_f64; n]),
                |(ga, mut va), (gb, vb)| {
                    for (a, b) in va.iter_mut().zip(vb.iter()) {
                        *a += b;
                    }
                    Some((ga + gb, va))
                },
            )?;

        gradient.copy_from_slice(&folded.1);
        Some(folded.0)
    }

    /// Hessian of the expected log-growth at a feasible point, written into
    /// `hessian`. `H[i][j] = -sum_k P_k * r_i(k) * r_j(k) / w_k^2`; negative
    /// definite everywhere on the feasible region, which is what makes the
    /// damped Newton system solvable.
    ///
    /// Called once per optimizer iteration, against 2^N objective
    /// evaluations in the line search, so a sequential pass is fine.
    pub fn hessian(&self, bets: &[BetSpec], fractions: &[f64], hessian: &mut DMatrix<f64>) {
        let n = self.bet_count;
        debug_assert_eq!(hessian.nrows(), n);
        debug_assert_eq!(hessian.ncols(), n);

        hessian.fill(0.0);
        for (k, &pk) in self.probabilities.iter().enumerate() {
            let w = Self::wealth_factor(bets, fractions, k);
            let scale = pk / (w * w);
            for i in 0..n {
                let ri = if (k >> i) & 1 == 1 { bets[i].net_odds() } else { -1.0 };
                for j in 0..=i {
                    let rj = if (k >> j) & 1 == 1 { bets[j].net_odds() } else { -1.0 };
                    hessian[(i, j)] -= scale * ri * rj;
                }
            }
        }
        // Mirror the strictly-lower triangle.
        for i in 0..n {
            for j in (i + 1)..n {
                hessian[(i, j)] = hessian[(j, i)];
            }
        }
    }

}
