//! # u-poisson-binomial
//!
//! The Poisson-Binomial distribution for the U-Engine ecosystem.
//!
//! Models the number of successes among independent Bernoulli trials that
//! each carry their own success probability. The exact PMF is computed once
//! at construction; every other statistic is either a closed-form sum over
//! the trial probabilities or a query against that PMF.
//!
//! ## Modules
//!
//! - [`poisson_binomial`] — PMF recursion and the [`PoissonBinomial`] type
//! - [`categorical`] — Finite categorical distribution backing entropy,
//!   median, mode, quantile and sampling
//! - [`random`] — Seeded RNG construction and weighted index sampling
//! - [`stats`] — Compensated summation and probability-vector checks
//! - [`error`] — [`DistributionError`]
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Neumaier summation for every moment
//!   and cumulative query
//! - **Immutable distributions**: the PMF is computed eagerly and never
//!   recomputed, so instances are freely shareable across threads
//! - **Property-based testing**: Mathematical invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_poisson_binomial::PoissonBinomial;
//! use u_poisson_binomial::random::create_rng;
//!
//! let d = PoissonBinomial::new(vec![0.5, 0.5]).unwrap();
//! assert_eq!(d.pmf(), &[0.25, 0.5, 0.25]);
//! assert_eq!(d.mean(), 1.0);
//! assert_eq!(d.median(), 1);
//!
//! let mut rng = create_rng(42);
//! assert!(d.sample(&mut rng) <= 2);
//! ```

pub mod categorical;
pub mod error;
pub mod poisson_binomial;
pub mod random;
pub mod stats;

pub use categorical::Categorical;
pub use error::DistributionError;
pub use poisson_binomial::{poisson_binomial_pmf, PoissonBinomial};
