//! Builder utilities for configuring a level.
//!
//! Exposes the tunables of a level and the validation that runs before a
//! [`crate::Level`] is constructed.

use std::time::Duration;

use crate::{
    error::ConfigError,
    interference::{DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL},
    minigame::{DEFAULT_SPEED, DEFAULT_TOLERANCE},
    random::{DEFAULT_SEED, SeededRandom},
};

/// Default number of anchors in a level.
pub const DEFAULT_ANCHOR_COUNT: usize = 4;
/// Default number of beacons the network must span.
pub const DEFAULT_REQUIRED_COUNT: usize = 4;
/// Default countdown length.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(20);
/// Largest accepted tolerance; wider zones would overlap both ends of the
/// target range.
pub const MAX_TOLERANCE: f64 = 0.1;

/// A validated level configuration.
///
/// Produced by [`LevelBuilder::build`]; every field already satisfies the
/// builder's checks.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    anchor_count: usize,
    required_count: usize,
    time_limit: Duration,
    interference_min: Duration,
    interference_max: Duration,
    tolerance: f64,
    speed: f64,
    seed: u64,
}

impl LevelConfig {
    /// Number of anchors built for the level.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchor_count
    }

    /// Number of beacons the network must span.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    /// Countdown length.
    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Bounds of the interference wait.
    #[must_use]
    pub fn interference_interval(&self) -> (Duration, Duration) {
        (self.interference_min, self.interference_max)
    }

    /// Half-width of the minigame's target zone.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Minigame sweep speed in units per second.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Seed for [`Self::seeded_random`].
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a random source seeded from this configuration.
    #[must_use]
    pub fn seeded_random(&self) -> SeededRandom {
        SeededRandom::new(self.seed)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        let builder = LevelBuilder::default();
        Self {
            anchor_count: builder.anchor_count,
            required_count: builder.required_count,
            time_limit: builder.time_limit,
            interference_min: builder.interference_min,
            interference_max: builder.interference_max,
            tolerance: builder.tolerance,
            speed: builder.speed,
            seed: builder.seed,
        }
    }
}

/// Configures and validates [`LevelConfig`] values.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use beaconet_core::LevelBuilder;
///
/// let config = LevelBuilder::new()
///     .with_anchor_count(6)
///     .with_required_count(5)
///     .with_time_limit(Duration::from_secs(45))
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(config.anchor_count(), 6);
/// assert_eq!(config.required_count(), 5);
/// assert_eq!(config.time_limit(), Duration::from_secs(45));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LevelBuilder {
    anchor_count: usize,
    required_count: usize,
    time_limit: Duration,
    interference_min: Duration,
    interference_max: Duration,
    tolerance: f64,
    speed: f64,
    seed: u64,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self {
            anchor_count: DEFAULT_ANCHOR_COUNT,
            required_count: DEFAULT_REQUIRED_COUNT,
            time_limit: DEFAULT_TIME_LIMIT,
            interference_min: DEFAULT_MIN_INTERVAL,
            interference_max: DEFAULT_MAX_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
            speed: DEFAULT_SPEED,
            seed: DEFAULT_SEED,
        }
    }
}

impl LevelBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use beaconet_core::LevelBuilder;
    ///
    /// let builder = LevelBuilder::new();
    /// assert_eq!(builder.anchor_count(), 4);
    /// assert_eq!(builder.required_count(), 4);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of anchors.
    #[must_use]
    pub fn with_anchor_count(mut self, count: usize) -> Self {
        self.anchor_count = count;
        self
    }

    /// Returns the configured anchor count.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchor_count
    }

    /// Overrides the number of beacons the network must span.
    #[must_use]
    pub fn with_required_count(mut self, count: usize) -> Self {
        self.required_count = count;
        self
    }

    /// Returns the configured required count.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    /// Overrides the countdown length.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Overrides the bounds of the interference wait.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use beaconet_core::{ConfigError, LevelBuilder};
    ///
    /// let err = LevelBuilder::new()
    ///     .with_interference_interval(Duration::from_secs(9), Duration::from_secs(3))
    ///     .build()
    ///     .expect_err("inverted interval is rejected");
    /// assert!(matches!(err, ConfigError::InvalidInterferenceInterval { .. }));
    /// ```
    #[must_use]
    pub fn with_interference_interval(mut self, min: Duration, max: Duration) -> Self {
        self.interference_min = min;
        self.interference_max = max;
        self
    }

    /// Overrides the minigame tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Overrides the minigame sweep speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Overrides the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] naming the first field that is out of range.
    ///
    /// # Examples
    /// ```
    /// use beaconet_core::{ConfigError, LevelBuilder};
    ///
    /// let err = LevelBuilder::new()
    ///     .with_required_count(5)
    ///     .build()
    ///     .expect_err("more beacons than anchors");
    /// assert_eq!(err, ConfigError::InvalidRequiredCount { got: 5, anchor_count: 4 });
    /// ```
    pub fn build(self) -> Result<LevelConfig, ConfigError> {
        if self.anchor_count == 0 {
            return Err(ConfigError::InvalidAnchorCount {
                got: self.anchor_count,
            });
        }
        if self.required_count == 0 || self.required_count > self.anchor_count {
            return Err(ConfigError::InvalidRequiredCount {
                got: self.required_count,
                anchor_count: self.anchor_count,
            });
        }
        if self.time_limit.is_zero() {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.interference_min.is_zero() || self.interference_min > self.interference_max {
            return Err(ConfigError::InvalidInterferenceInterval {
                min: self.interference_min,
                max: self.interference_max,
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance <= MAX_TOLERANCE)
        {
            return Err(ConfigError::InvalidTolerance {
                got: self.tolerance,
            });
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::InvalidSpeed { got: self.speed });
        }

        Ok(LevelConfig {
            anchor_count: self.anchor_count,
            required_count: self.required_count,
            time_limit: self.time_limit,
            interference_min: self.interference_min,
            interference_max: self.interference_max,
            tolerance: self.tolerance,
            speed: self.speed,
            seed: self.seed,
        })
    }
}
