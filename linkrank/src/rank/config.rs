/*
 * SPDX-FileCopyrightText: 2026 The linkrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parameters shared by the ranking algorithms.

use thiserror::Error;

/// Errors in the parameters of a ranking run.
///
/// They are always detected before any computation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The damping factor must be in (0 . . 1], got {0}")]
    InvalidDamping(f64),
    #[error("The number of samples must be positive, got {0}")]
    InvalidSampleCount(usize),
    #[error("The tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("The maximum number of iterations must be positive")]
    InvalidMaxIter,
    /// The initial distribution does not have one entry per node.
    #[error("The initial distribution has {got} entries, but the graph has {expected} nodes")]
    InitialLength { expected: usize, got: usize },
}

/// The parameters of a ranking run.
///
/// The same configuration drives both the
/// [sampling](crate::rank::sampling::SampledRank) and the
/// [iterative](crate::rank::iterative::IterativeRank) estimator; each of them
/// reads only the fields it needs, but the damping factor is always
/// checked.
///
/// # Examples
///
/// ```
/// use linkrank::rank::config::RankConfig;
///
/// let config = RankConfig::default().damping_factor(0.9).max_iter(Some(100));
/// assert!(config.validate().is_ok());
/// assert!(RankConfig::default().damping_factor(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    /// The probability of following a link rather than jumping to a
    /// uniformly chosen node. Must be in (0 . . 1].
    pub damping_factor: f64,
    /// The number of steps of the random walk.
    pub sample_count: usize,
    /// The maximum absolute change of any node between two rounds of the
    /// iterative estimator at which the estimator stops.
    pub tolerance: f64,
    /// An optional bound on the number of rounds of the iterative
    /// estimator.
    pub max_iter: Option<usize>,
}

impl RankConfig {
    pub const DEFAULT_DAMPING: f64 = 0.85;
    pub const DEFAULT_SAMPLES: usize = 10_000;
    pub const DEFAULT_TOLERANCE: f64 = 0.001;

    /// Sets the damping factor.
    pub fn damping_factor(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Sets the number of samples.
    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets the tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bound on the number of rounds (`None` for no bound).
    pub fn max_iter(mut self, max_iter: Option<usize>) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Checks all parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_damping(self.damping_factor)?;
        if self.sample_count == 0 {
            return Err(ConfigError::InvalidSampleCount(self.sample_count));
        }
        // NaN fails the comparison
        if !(self.tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.max_iter == Some(0) {
            return Err(ConfigError::InvalidMaxIter);
        }
        Ok(())
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping_factor: Self::DEFAULT_DAMPING,
            sample_count: Self::DEFAULT_SAMPLES,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iter: None,
        }
    }
}

/// Checks that a damping factor is in (0 . . 1].
pub(crate) fn check_damping(damping_factor: f64) -> Result<(), ConfigError> {
    // Note that the range excludes NaN
    if damping_factor > 0.0 && damping_factor <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDamping(damping_factor))
    }
}
