// Clippy allows for the whole crate
#![allow(clippy::too_many_arguments)]

//! REEF: Region Exclusion and Extraction Filter
//!
//! This library selects a sparse set of high-scoring, mutually
//! non-overlapping regions from dense per-position score tracks,
//! enforcing a minimum physical spacing between selections.
//!
//! # Features
//!
//! - **Three strategies**: greedy priority-queue sweep, a max-mean
//!   variant, and exact weighted interval scheduling
//! - **Parallel processing**: chromosome segments fan out over Rayon
//! - **Rolling statistics**: min/max/mean/sum/median/variance/percentile
//!   per window in a single sweep
//!
//! # Example
//!
//! ```rust
//! use reef_regions::{select, FilterConfig, FilterMethod, ScoreTrack};
//!
//! let track = ScoreTrack::from_scores(vec![1.0, 5.0, 1.0, 1.0, 9.0, 1.0]);
//! let config = FilterConfig::new(FilterMethod::MaxMean)
//!     .with_window_bins(2)
//!     .with_exclusion_size(0);
//!
//! let result = select(&track, &config).unwrap();
//! assert_eq!(result.regions.len(), 2);
//! ```

pub mod candidate;
pub mod config;
pub mod generate;
pub mod methods;
pub mod output;
pub mod rolling;
pub mod select;
pub mod signal;
pub mod track;

// Re-export commonly used types
pub use config::{ConfigError, FilterConfig};
pub use methods::FilterMethod;
pub use rolling::AggregationMethod;
pub use select::{select, FilterError, FilterResult, Region, RegionSet};
pub use signal::{ScoreTrack, Segment};
pub use track::{read_bedgraph, read_vector, TrackError, TrackFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ConfigError, FilterConfig};
    pub use crate::methods::FilterMethod;
    pub use crate::rolling::AggregationMethod;
    pub use crate::select::{select, FilterError, FilterResult, Region, RegionSet};
    pub use crate::signal::{ScoreTrack, Segment};
    pub use crate::track::{parse_bedgraph, parse_vector, read_bedgraph, read_vector};
}
