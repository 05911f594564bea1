//! Poisson-Binomial distribution.
//!
//! The number of successes among `n` independent Bernoulli trials, where
//! trial `i` succeeds with its own probability `pᵢ`.
//!
//! # Mathematical Definition
//! - Support: {0, 1, …, n}
//! - PMF: no closed form; computed exactly by incremental convolution
//! - Mean: Σ pᵢ
//! - Variance: Σ pᵢ(1−pᵢ)
//! - MGF: Π (1 − pᵢ + pᵢ·eᵗ)
//!
//! # PMF Algorithm
//!
//! The PMF is built by folding the trials in one at a time. After `j`
//! trials, `S[k]` holds P(exactly k successes among the first j). Folding
//! trial `j+1` with probability `p` updates, for `k` descending from `j+1`
//! to 1,
//!
//! ```text
//! S[k] = (1 − p)·S[k] + p·S[k−1]
//! ```
//!
//! and finally `S[0] *= 1 − p`. The descending order is what makes the
//! update safe in place: `S[k−1]` is read before it is overwritten.
//!
//! Reference: Chen & Liu (1997), "Statistical applications of the
//! Poisson-binomial and conditional Bernoulli distributions",
//! *Statistica Sinica* 7(4), pp. 875–892.
//!
//! # Numerical Limitations
//!
//! The recursion runs in the linear probability domain with no
//! renormalization. Tail probabilities of very long or very extreme
//! trial sequences can underflow to zero.
//!
//! # Complexity
//! Construction: O(n²) time, O(n) space. Moments and generating functions:
//! O(n) per call. PMF queries: O(1); CDF and quantile: O(n).

use std::ops::RangeInclusive;

use num_complex::Complex64;
use rand::distr::Distribution;
use rand::Rng;
use tracing::debug;

use crate::categorical::Categorical;
use crate::error::DistributionError;
use crate::random::WeightedSampler;
use crate::stats::{is_probability_vector, KahanAccumulator, PROBVEC_TOLERANCE};

/// Computes the full PMF of the Poisson-Binomial distribution.
///
/// Returns a vector of length `p.len() + 1` whose entry `k` is the
/// probability of exactly `k` successes. For an empty `p` this is the
/// point mass `[1.0]`.
///
/// No validation is performed; callers passing probabilities outside
/// `[0, 1]` get a vector that is not a probability vector.
///
/// # Complexity
/// Time: O(n²), Space: O(n)
///
/// # Examples
/// ```
/// use u_poisson_binomial::poisson_binomial_pmf;
/// let pmf = poisson_binomial_pmf(&[0.5, 0.5]);
/// assert_eq!(pmf, vec![0.25, 0.5, 0.25]);
/// ```
pub fn poisson_binomial_pmf(p: &[f64]) -> Vec<f64> {
    let mut s = vec![0.0; p.len() + 1];
    s[0] = 1.0;
    for (folded, &pi) in p.iter().enumerate() {
        fold_trial(&mut s, folded, pi);
    }
    s
}

/// Folds one more trial into `s`, which currently holds the PMF of
/// `folded` trials in `s[..=folded]`.
///
/// The first fold turns the point mass `[1, 0, …]` into `[1−p, p, 0, …]`.
#[inline]
fn fold_trial(s: &mut [f64], folded: usize, pi: f64) {
    let qi = 1.0 - pi;
    for row in (1..=folded + 1).rev() {
        s[row] = qi * s[row] + pi * s[row - 1];
    }
    s[0] *= qi;
}

/// Poisson-Binomial distribution over `{0, …, n}`.
///
/// Immutable once constructed: the PMF is computed eagerly and never
/// recomputed.
///
/// # Examples
/// ```
/// use u_poisson_binomial::PoissonBinomial;
/// let d = PoissonBinomial::new(vec![0.2, 0.5, 0.7]).unwrap();
/// assert_eq!(d.ntrials(), 3);
/// assert!((d.mean() - 1.4).abs() < 1e-12);
/// assert!((d.pdf(0.0) - 0.12).abs() < 1e-12);
/// assert_eq!(d.mode(), 1);
/// assert_eq!(d.quantile(0.9), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonBinomial {
    p: Vec<f64>,
    pmf: Categorical,
    sampler: WeightedSampler,
}

impl PoissonBinomial {
    /// Creates a distribution from per-trial success probabilities.
    ///
    /// # Errors
    /// Returns `Err` if any `p[i]` lies outside `[0, 1]` or is NaN.
    ///
    /// # Panics
    /// If the computed PMF is not a probability vector, which indicates a
    /// numerical defect rather than bad input.
    pub fn new(p: Vec<f64>) -> Result<Self, DistributionError> {
        if let Some((i, &pi)) = p
            .iter()
            .enumerate()
            .find(|(_, pi)| !(0.0..=1.0).contains(*pi))
        {
            debug!(index = i, value = pi, "rejected trial probability");
            return Err(DistributionError::InvalidParameters(format!(
                "PoissonBinomial requires 0 ≤ p[i] ≤ 1, got p[{i}]={pi}"
            )));
        }
        Ok(Self::new_unchecked(p))
    }

    /// Creates a distribution without checking that each `p[i]` lies in
    /// `[0, 1]`.
    ///
    /// Intended for probabilities that are valid by construction. The PMF
    /// invariant is still asserted.
    ///
    /// # Panics
    /// If the computed PMF is not a probability vector (within
    /// [`PROBVEC_TOLERANCE`]).
    pub fn new_unchecked(p: Vec<f64>) -> Self {
        let pmf = poisson_binomial_pmf(&p);
        assert!(
            is_probability_vector(&pmf, PROBVEC_TOLERANCE),
            "poisson-binomial pmf is not a probability vector (ntrials = {})",
            p.len()
        );
        debug!(ntrials = p.len(), "computed poisson-binomial pmf");
        let pmf = Categorical::from_checked_pmf(pmf);
        let sampler = pmf.sampler();
        Self { p, pmf, sampler }
    }

    /// Creates a distribution, validating `p` only when `validate` is set.
    ///
    /// # Errors
    /// Returns `Err` if `validate` is `true` and any `p[i]` lies outside
    /// `[0, 1]`.
    pub fn with_validation(p: Vec<f64>, validate: bool) -> Result<Self, DistributionError> {
        if validate {
            Self::new(p)
        } else {
            Ok(Self::new_unchecked(p))
        }
    }

    /// Number of trials `n`.
    pub fn ntrials(&self) -> usize {
        self.p.len()
    }

    /// Per-trial success probabilities, in trial order.
    pub fn succprob(&self) -> &[f64] {
        &self.p
    }

    /// Per-trial failure probabilities `1 − pᵢ`, in trial order.
    pub fn failprob(&self) -> Vec<f64> {
        self.p.iter().map(|&pi| 1.0 - pi).collect()
    }

    /// The distribution's parameters: the success probabilities.
    pub fn params(&self) -> &[f64] {
        &self.p
    }

    /// The full PMF; entry `k` is P(X = k), for `k` in `0..=n`.
    pub fn pmf(&self) -> &[f64] {
        self.pmf.probs()
    }

    pub fn minimum(&self) -> usize {
        0
    }

    pub fn maximum(&self) -> usize {
        self.ntrials()
    }

    pub fn support(&self) -> RangeInclusive<usize> {
        self.minimum()..=self.maximum()
    }

    /// Returns `true` if `k` is an integer in `[0, n]`.
    pub fn insupport(&self, k: f64) -> bool {
        k.fract() == 0.0 && k >= 0.0 && k <= self.ntrials() as f64
    }

    // --- moments ---

    /// Mean = Σ pᵢ.
    pub fn mean(&self) -> f64 {
        self.sum_over(|pi| pi)
    }

    /// Variance = Σ pᵢ(1−pᵢ).
    pub fn variance(&self) -> f64 {
        self.sum_over(|pi| pi * (1.0 - pi))
    }

    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Skewness = Σ pᵢ(1−pᵢ)(1−2pᵢ) / V^{3/2}.
    ///
    /// NaN when the variance is zero.
    pub fn skewness(&self) -> f64 {
        let v = self.variance();
        let s = self.sum_over(|pi| pi * (1.0 - pi) * (1.0 - 2.0 * pi));
        s / v.sqrt() / v
    }

    /// Excess kurtosis = Σ pᵢ(1−pᵢ)(1 − 6pᵢ(1−pᵢ)) / V².
    ///
    /// NaN when the variance is zero.
    pub fn kurtosis(&self) -> f64 {
        let v = self.variance();
        let s = self.sum_over(|pi| {
            let pq = pi * (1.0 - pi);
            pq * (1.0 - 6.0 * pq)
        });
        s / (v * v)
    }

    fn sum_over(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.p.iter().map(|&pi| f(pi)).collect::<KahanAccumulator>().sum()
    }

    // --- PMF-derived statistics ---

    /// Shannon entropy of the PMF, in nats.
    pub fn entropy(&self) -> f64 {
        self.pmf.entropy()
    }

    /// Smallest `k` with P(X ≤ k) ≥ 0.5.
    pub fn median(&self) -> usize {
        self.pmf.median()
    }

    /// Most likely success count; the smallest one on ties.
    pub fn mode(&self) -> usize {
        self.pmf.mode()
    }

    /// Every success count attaining the maximum probability.
    pub fn modes(&self) -> Vec<usize> {
        self.pmf.modes()
    }

    /// Smallest `k` with P(X ≤ k) ≥ `x`.
    ///
    /// Returns `None` if `x` is outside `[0, 1]`.
    pub fn quantile(&self, x: f64) -> Option<usize> {
        self.pmf.quantile(x)
    }

    // --- PMF / CDF queries ---

    /// P(X = k); 0 if `k` is not an integer in `[0, n]`.
    pub fn pdf(&self, k: f64) -> f64 {
        if self.insupport(k) {
            self.pmf.pdf(k as usize)
        } else {
            0.0
        }
    }

    /// ln P(X = k); `-∞` outside the support or where the mass is zero.
    pub fn logpdf(&self, k: f64) -> f64 {
        self.pdf(k).ln()
    }

    /// P(X ≤ k) for real `k`.
    pub fn cdf(&self, k: f64) -> f64 {
        if k.is_nan() {
            return f64::NAN;
        }
        if k < 0.0 {
            return 0.0;
        }
        if k >= self.ntrials() as f64 {
            return 1.0;
        }
        self.pmf.cdf(k.floor() as usize)
    }

    /// P(X > k) for real `k`, summed over the upper tail.
    pub fn ccdf(&self, k: f64) -> f64 {
        if k.is_nan() {
            return f64::NAN;
        }
        if k < 0.0 {
            return 1.0;
        }
        if k >= self.ntrials() as f64 {
            return 0.0;
        }
        let from = k.floor() as usize + 1;
        let acc: KahanAccumulator = self.pmf()[from..].iter().copied().collect();
        acc.sum().clamp(0.0, 1.0)
    }

    /// ln P(X ≤ k).
    pub fn logcdf(&self, k: f64) -> f64 {
        self.cdf(k).ln()
    }

    // --- generating functions ---

    /// Moment generating function M(t) = Π (1 − pᵢ + pᵢ·eᵗ).
    pub fn mgf(&self, t: f64) -> f64 {
        let et = t.exp();
        self.p.iter().map(|&pi| 1.0 - pi + pi * et).product()
    }

    /// Characteristic function φ(t) = Π (1 − pᵢ + pᵢ·e^{it}).
    pub fn cf(&self, t: f64) -> Complex64 {
        let eit = Complex64::from_polar(1.0, t);
        self.p
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &pi| {
                acc * (eit * pi + (1.0 - pi))
            })
    }

    // --- sampling ---

    /// Returns a reusable O(log n) sampler over success counts.
    ///
    /// # Examples
    /// ```
    /// use u_poisson_binomial::PoissonBinomial;
    /// use u_poisson_binomial::random::create_rng;
    /// let d = PoissonBinomial::new(vec![1.0, 0.0, 1.0]).unwrap();
    /// let sampler = d.sampler();
    /// let mut rng = create_rng(42);
    /// assert_eq!(sampler.sample(&mut rng), 2);
    /// ```
    pub fn sampler(&self) -> WeightedSampler {
        self.sampler.clone()
    }

    /// Draws one success count.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }

    /// Draws `count` independent success counts.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<usize> {
        (0..count).map(|_| self.sampler.sample(rng)).collect()
    }

    // --- gradient ---

    /// Partial derivatives of the PMF with respect to each trial probability.
    ///
    /// Row `j` holds ∂P(X = k)/∂pⱼ for `k` in `0..=n`. Since
    /// P(X = k) = pⱼ·P₋ⱼ(k−1) + (1−pⱼ)·P₋ⱼ(k), where P₋ⱼ is the PMF with
    /// trial `j` removed, each row is P₋ⱼ(k−1) − P₋ⱼ(k). Every row sums to 0.
    ///
    /// # Complexity
    /// Time: O(n³), Space: O(n²)
    pub fn pmf_gradient(&self) -> Vec<Vec<f64>> {
        let n = self.ntrials();
        (0..n)
            .map(|j| {
                let mut without = vec![0.0; n];
                without[0] = 1.0;
                let others = self
                    .p
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != j)
                    .map(|(_, &pi)| pi);
                for (folded, pi) in others.enumerate() {
                    fold_trial(&mut without, folded, pi);
                }
                (0..=n)
                    .map(|k| {
                        let below = if k > 0 { without[k - 1] } else { 0.0 };
                        let at = without.get(k).copied().unwrap_or(0.0);
                        below - at
                    })
                    .collect()
            })
            .collect()
    }
}

impl Distribution<usize> for PoissonBinomial {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }
}

impl TryFrom<Vec<f64>> for PoissonBinomial {
    type Error = DistributionError;

    fn try_from(p: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl TryFrom<&[f64]> for PoissonBinomial {
    type Error = DistributionError;

    fn try_from(p: &[f64]) -> Result<Self, Self::Error> {
        Self::new(p.to_vec())
    }
}

// ============================================================================
// Tests
// ============================================================================
