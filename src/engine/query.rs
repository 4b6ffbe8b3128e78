use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};

/// Default number of alternatives returned
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Alternatives must cost less than half the reference value by default
pub const DEFAULT_PRICE_RATIO_CEILING: f64 = 0.5;

/// Ranking key for alternatives
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QualityMetric {
    /// Overall rating
    #[default]
    Overall,
    /// One feature-space attribute, by name
    Attribute(String),
}

impl std::fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overall => write!(f, "overall"),
            Self::Attribute(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for QualityMetric {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("overall") {
            Ok(Self::Overall)
        } else {
            Ok(Self::Attribute(s.to_string()))
        }
    }
}

impl From<String> for QualityMetric {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(metric) => metric,
            Err(never) => match never {},
        }
    }
}

impl From<QualityMetric> for String {
    fn from(metric: QualityMetric) -> Self {
        metric.to_string()
    }
}

/// Parameters of an alternatives search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesQuery {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Candidates must be worth less than `reference value * ratio`
    #[serde(default = "default_price_ratio_ceiling")]
    pub price_ratio_ceiling: f64,

    #[serde(default)]
    pub rank_by: QualityMetric,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_price_ratio_ceiling() -> f64 {
    DEFAULT_PRICE_RATIO_CEILING
}

impl Default for AlternativesQuery {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            price_ratio_ceiling: DEFAULT_PRICE_RATIO_CEILING,
            rank_by: QualityMetric::Overall,
        }
    }
}

impl AlternativesQuery {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_price_ratio_ceiling(mut self, ratio: f64) -> Self {
        self.price_ratio_ceiling = ratio;
        self
    }

    pub fn with_rank_by(mut self, rank_by: QualityMetric) -> Self {
        self.rank_by = rank_by;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.price_ratio_ceiling.is_finite() && self.price_ratio_ceiling > 0.0) {
            return Err(ScoutError::InvalidInput(format!(
                "price ratio ceiling must be a positive number, got {}",
                self.price_ratio_ceiling
            )));
        }
        Ok(())
    }
}
