//! Filter run configuration.
//!
//! A filtering run is a pure function of (track, config): the
//! [`FilterConfig`] is built once, validated, and passed by reference
//! into [`crate::select::select`]. There is no shared mutable session
//! state between runs.

use crate::methods::FilterMethod;
use crate::rolling::AggregationMethod;
use thiserror::Error;

/// Configuration errors, all detected before any segment is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window size must be at least 1 bin")]
    ZeroWindow,

    #[error("bin size must be positive")]
    ZeroBinSize,

    #[error("percentile must be in (0, 1], got {0}")]
    PercentileOutOfRange(f64),

    #[error("max elements must be at least 1 when set")]
    ZeroMaxElements,

    #[error("unknown filter method: {0}")]
    UnknownMethod(String),

    #[error("unknown aggregation method: {0}")]
    UnknownAggregation(String),
}

/// Immutable configuration for one filtering run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Selection strategy.
    pub method: FilterMethod,
    /// Window length in bins (default: 125).
    pub window_bins: usize,
    /// Physical bin size in nt. None = take the segment's own geometry
    /// (1 for raw vectors, inferred from row spacing for bedgraph).
    /// Consumed when the track is read; segments carry the resolved value.
    pub bin_size: Option<u64>,
    /// Extra nt of separation enforced between selections, beyond the
    /// window itself (default: 24800).
    pub exclusion_size: u64,
    /// Statistic reported as each selection's score (default: max).
    pub aggregation: AggregationMethod,
    /// Fractional rank for the percentile statistic (default: 0.95).
    pub percentile: f64,
    /// Cap on the number of reported selections. None = unbounded.
    pub max_elements: Option<usize>,
    /// Attach the nine diagnostic columns to each selection.
    pub preserve_cols: bool,
}

impl FilterConfig {
    pub fn new(method: FilterMethod) -> Self {
        Self {
            method,
            window_bins: 125,
            bin_size: None,
            exclusion_size: 24800,
            aggregation: AggregationMethod::Max,
            percentile: 0.95,
            max_elements: None,
            preserve_cols: false,
        }
    }

    /// Set the window length in bins.
    pub fn with_window_bins(mut self, window_bins: usize) -> Self {
        self.window_bins = window_bins;
        self
    }

    /// Force a physical bin size instead of inferring it from the input.
    pub fn with_bin_size(mut self, bin_size: u64) -> Self {
        self.bin_size = Some(bin_size);
        self
    }

    /// Set the exclusion size in nt.
    pub fn with_exclusion_size(mut self, exclusion_size: u64) -> Self {
        self.exclusion_size = exclusion_size;
        self
    }

    /// Set the reported-score statistic.
    pub fn with_aggregation(mut self, aggregation: AggregationMethod) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set the percentile rank (only meaningful with percentile aggregation).
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Cap the number of reported selections.
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = Some(max_elements);
        self
    }

    /// Attach diagnostic columns to each selection.
    pub fn with_preserve_cols(mut self, preserve_cols: bool) -> Self {
        self.preserve_cols = preserve_cols;
        self
    }

    /// Validate the configuration. Fatal-only conditions live here;
    /// per-segment conditions (window longer than a segment) are skips.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_bins == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.bin_size == Some(0) {
            return Err(ConfigError::ZeroBinSize);
        }
        if !(self.percentile > 0.0 && self.percentile <= 1.0) {
            return Err(ConfigError::PercentileOutOfRange(self.percentile));
        }
        if self.max_elements == Some(0) {
            return Err(ConfigError::ZeroMaxElements);
        }
        Ok(())
    }

    /// Minimum nt distance between the starts of two accepted windows:
    /// the window's own nt span plus the exclusion size. Start distances
    /// exactly equal to this are allowed.
    #[inline]
    pub fn exclusion_total(&self, bin_size: u64) -> u64 {
        self.window_bins as u64 * bin_size + self.exclusion_size
    }
}
