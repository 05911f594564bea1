//! Finite categorical distribution.
//!
//! A discrete distribution over the outcomes `0..K` with arbitrary
//! probabilities. [`PoissonBinomial`](crate::PoissonBinomial) stores its PMF
//! as a `Categorical` over the success counts `0..=n` and delegates entropy,
//! median, mode, quantile and sampling to it. Outcomes are 0-based, so a
//! category index is directly a success count.
//!
//! # Conventions
//!
//! - **Quantile**: smallest `k` whose cumulative mass reaches `x`.
//! - **Median**: `quantile(0.5)`.
//! - **Mode**: first index attaining the maximum probability.
//! - **Entropy**: natural log (nats), with `0·ln 0 = 0`.

use crate::error::DistributionError;
use crate::random::WeightedSampler;
use crate::stats::{is_probability_vector, KahanAccumulator, PROBVEC_TOLERANCE};

/// Categorical distribution over `0..K`.
///
/// # Examples
/// ```
/// use u_poisson_binomial::Categorical;
/// let c = Categorical::new(vec![0.2, 0.5, 0.3]).unwrap();
/// assert_eq!(c.ncategories(), 3);
/// assert_eq!(c.mode(), 1);
/// assert_eq!(c.median(), 1);
/// assert_eq!(c.quantile(0.1), Some(0));
/// assert_eq!(c.quantile(0.95), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    probs: Vec<f64>,
}

impl Categorical {
    /// Creates a categorical distribution from a probability vector.
    ///
    /// # Errors
    /// Returns `Err` if `probs` is empty, has a negative or non-finite entry,
    /// or does not sum to 1 within [`PROBVEC_TOLERANCE`]. The tolerance
    /// applies to the sum only; every entry must be `>= 0`.
    pub fn new(probs: Vec<f64>) -> Result<Self, DistributionError> {
        let has_negative = probs.iter().any(|&p| p < 0.0);
        if has_negative || !is_probability_vector(&probs, PROBVEC_TOLERANCE) {
            return Err(DistributionError::InvalidParameters(format!(
                "Categorical requires a non-empty probability vector summing to 1, got {probs:?}"
            )));
        }
        Ok(Self { probs })
    }

    /// Wraps a PMF the caller has already checked.
    pub(crate) fn from_checked_pmf(probs: Vec<f64>) -> Self {
        debug_assert!(is_probability_vector(&probs, PROBVEC_TOLERANCE));
        Self { probs }
    }

    /// Number of categories `K`.
    pub fn ncategories(&self) -> usize {
        self.probs.len()
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// P(X = k); 0 for `k >= K`.
    pub fn pdf(&self, k: usize) -> f64 {
        self.probs.get(k).copied().unwrap_or(0.0)
    }

    /// ln P(X = k); `-∞` for `k >= K` or zero mass.
    pub fn logpdf(&self, k: usize) -> f64 {
        self.pdf(k).ln()
    }

    /// P(X ≤ k), clamped to `[0, 1]`.
    pub fn cdf(&self, k: usize) -> f64 {
        if k >= self.probs.len() - 1 {
            return 1.0;
        }
        let acc: KahanAccumulator = self.probs[..=k].iter().copied().collect();
        acc.sum().clamp(0.0, 1.0)
    }

    /// Shannon entropy H = −Σ pₖ ln pₖ in nats.
    pub fn entropy(&self) -> f64 {
        let acc: KahanAccumulator = self
            .probs
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| -p * p.ln())
            .collect();
        acc.sum()
    }

    /// First index attaining the maximum probability.
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (k, &p) in self.probs.iter().enumerate().skip(1) {
            if p > self.probs[best] {
                best = k;
            }
        }
        best
    }

    /// All indices attaining the maximum probability, in increasing order.
    pub fn modes(&self) -> Vec<usize> {
        let max = self.probs[self.mode()];
        self.probs
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == max)
            .map(|(k, _)| k)
            .collect()
    }

    /// Smallest `k` with P(X ≤ k) ≥ 0.5.
    pub fn median(&self) -> usize {
        self.search_cumulative(0.5)
    }

    /// Inverse CDF: smallest `k` with P(X ≤ k) ≥ `x`.
    ///
    /// Returns `None` if `x` is outside `[0, 1]` (or NaN).
    pub fn quantile(&self, x: f64) -> Option<usize> {
        if !(0.0..=1.0).contains(&x) {
            return None;
        }
        Some(self.search_cumulative(x))
    }

    /// Builds a reusable O(log K) sampler over the categories.
    pub fn sampler(&self) -> WeightedSampler {
        WeightedSampler::new(&self.probs)
            .expect("probability vector carries positive mass")
    }

    fn search_cumulative(&self, x: f64) -> usize {
        let last = self.probs.len() - 1;
        let mut acc = KahanAccumulator::new();
        acc.add(self.probs[0]);
        let mut k = 0;
        while acc.sum() < x && k < last {
            k += 1;
            acc.add(self.probs[k]);
        }
        k
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_new_valid() {
        let c = Categorical::new(vec![0.1, 0.9]).unwrap();
        assert_eq!(c.ncategories(), 2);
        assert_eq!(c.probs(), &[0.1, 0.9]);
    }

    #[test]
    fn test_new_invalid() {
        assert!(Categorical::new(vec![]).is_err());
        assert!(Categorical::new(vec![0.5, 0.4]).is_err());
        assert!(Categorical::new(vec![-0.5, 1.5]).is_err());
        assert!(Categorical::new(vec![f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_new_rejects_tiny_negative() {
        // Within the sum tolerance, but still a negative mass.
        assert!(Categorical::new(vec![-1e-9, 1.0 + 1e-9]).is_err());
    }

    #[test]
    fn test_pdf_out_of_range() {
        let c = Categorical::new(vec![0.5, 0.5]).unwrap();
        assert_eq!(c.pdf(1), 0.5);
        assert_eq!(c.pdf(2), 0.0);
        assert_eq!(c.logpdf(2), f64::NEG_INFINITY);
    }

    #[test]
    fn test_cdf() {
        let c = Categorical::new(vec![0.25, 0.5, 0.25]).unwrap();
        assert!((c.cdf(0) - 0.25).abs() < 1e-15);
        assert!((c.cdf(1) - 0.75).abs() < 1e-15);
        assert_eq!(c.cdf(2), 1.0);
        assert_eq!(c.cdf(99), 1.0);
        assert_eq!(c.cdf(usize::MAX), 1.0);
    }

    #[test]
    fn test_cdf_single_category() {
        let c = Categorical::new(vec![1.0]).unwrap();
        assert_eq!(c.cdf(0), 1.0);
        assert_eq!(c.cdf(usize::MAX), 1.0);
    }

    #[test]
    fn test_entropy_uniform() {
        let c = Categorical::new(vec![0.25; 4]).unwrap();
        assert!((c.entropy() - 4.0_f64.ln()).abs() < 1e-14);
    }

    #[test]
    fn test_entropy_point_mass() {
        let c = Categorical::new(vec![0.0, 1.0, 0.0]).unwrap();
        assert_eq!(c.entropy(), 0.0);
    }

    #[test]
    fn test_mode_first_maximum() {
        let c = Categorical::new(vec![0.1, 0.4, 0.1, 0.4]).unwrap();
        assert_eq!(c.mode(), 1);
        assert_eq!(c.modes(), vec![1, 3]);
    }

    #[test]
    fn test_quantile_bounds() {
        let c = Categorical::new(vec![0.0, 0.5, 0.5, 0.0]).unwrap();
        assert_eq!(c.quantile(0.0), Some(0));
        assert_eq!(c.quantile(0.5), Some(1));
        assert_eq!(c.quantile(0.51), Some(2));
        assert_eq!(c.quantile(1.0), Some(2));
        assert_eq!(c.quantile(-0.1), None);
        assert_eq!(c.quantile(1.1), None);
        assert_eq!(c.quantile(f64::NAN), None);
    }

    #[test]
    fn test_median_matches_quantile() {
        let c = Categorical::new(vec![0.3, 0.1, 0.6]).unwrap();
        assert_eq!(c.median(), 2);
        assert_eq!(Some(c.median()), c.quantile(0.5));
    }

    #[test]
    fn test_sampler_point_mass() {
        let c = Categorical::new(vec![0.0, 0.0, 1.0]).unwrap();
        let sampler = c.sampler();
        let mut rng = create_rng(1);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&mut rng), 2);
        }
    }
}
