//! Compensated summation and probability-vector checks.
//!
//! Every closed-form moment of the Poisson-Binomial distribution is a sum
//! over the trial probabilities, and every cumulative query is a sum over
//! the PMF. Both go through the compensated accumulator in this module so
//! that rounding error stays O(ε) regardless of the number of trials.
//!
//! # Algorithms
//!
//! - **Summation**: Neumaier's improved Kahan summation.
//!   Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
//!   zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.

/// Absolute tolerance used when checking that a PMF is a probability vector.
///
/// Applies both to the distance of the total mass from 1 and to how far
/// below zero an entry may fall through rounding.
pub const PROBVEC_TOLERANCE: f64 = 1e-8;

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use u_poisson_binomial::stats::kahan_sum;
/// let v = [1e16, 1.0, -1e16];
/// assert_eq!(kahan_sum(&v), 1.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    data.iter().copied().collect::<KahanAccumulator>().sum()
}

/// Streaming form of [`kahan_sum`].
///
/// Useful when the addends are produced by a map over another slice
/// (e.g. `p·(1−p)` per trial) and materializing them would be wasteful.
///
/// # Algorithm
/// Maintains a running compensation `c`. At each step the branch captures
/// the low-order bits of whichever operand is smaller in magnitude.
///
/// # Examples
/// ```
/// use u_poisson_binomial::stats::KahanAccumulator;
/// let mut acc = KahanAccumulator::new();
/// for &p in &[0.1, 0.2, 0.3] {
///     acc.add(p * (1.0 - p));
/// }
/// assert!((acc.sum() - 0.46).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanAccumulator {
    sum: f64,
    c: f64,
}

impl KahanAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one term.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.c += (self.sum - t) + x;
        } else {
            self.c += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Returns the compensated total.
    pub fn sum(&self) -> f64 {
        self.sum + self.c
    }
}

impl FromIterator<f64> for KahanAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.add(x);
        }
        acc
    }
}

/// Returns `true` if `v` is a probability vector within `tol`.
///
/// Requires every entry to be finite and `>= -tol`, and the compensated
/// total to lie within `tol` of 1. An empty slice is never a probability
/// vector.
///
/// # Examples
/// ```
/// use u_poisson_binomial::stats::is_probability_vector;
/// assert!(is_probability_vector(&[0.25, 0.5, 0.25], 1e-12));
/// assert!(!is_probability_vector(&[0.5, 0.6], 1e-12));
/// assert!(!is_probability_vector(&[-0.5, 1.5], 1e-12));
/// ```
pub fn is_probability_vector(v: &[f64], tol: f64) -> bool {
    if v.is_empty() {
        return false;
    }
    if !v.iter().all(|x| x.is_finite() && *x >= -tol) {
        return false;
    }
    (kahan_sum(v) - 1.0).abs() <= tol
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
