//! Selection strategies.

pub mod sweep;
pub mod wis;

pub use sweep::sweep_select;
pub use wis::{wis_select, WisInterval, WisPick};

use std::fmt;

/// Strategy used to pick the non-overlapping subset of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMethod {
    /// Greedy priority-queue sweep ranked by the window's center value.
    Pq,
    /// Exact maximum-weight interval scheduling (dynamic programming).
    Wis,
    /// Greedy sweep ranked by (window max, window mean).
    MaxMean,
}

impl FilterMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pq" => Some(FilterMethod::Pq),
            "wis" => Some(FilterMethod::Wis),
            "maxmean" => Some(FilterMethod::MaxMean),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterMethod::Pq => "pq",
            FilterMethod::Wis => "wis",
            FilterMethod::MaxMean => "maxmean",
        }
    }
}

impl fmt::Display for FilterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(FilterMethod::parse("pq"), Some(FilterMethod::Pq));
        assert_eq!(FilterMethod::parse("WIS"), Some(FilterMethod::Wis));
        assert_eq!(FilterMethod::parse("maxmean"), Some(FilterMethod::MaxMean));
        assert_eq!(FilterMethod::parse("greedy"), None);
    }
}
