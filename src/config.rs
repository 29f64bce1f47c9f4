//! Search budgets and harness settings.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{errors::GraphIsoError, generator::GraphSpec};

/// Optional caps on a single isomorphism search.
///
/// Both limits are checked once per search-loop iteration. Exceeding either
/// ends the search with `IsoOutcome::BudgetExhausted`.
///
/// ```rust
/// use std::time::Duration;
/// use graphiso::SearchConfig;
///
/// let cfg = SearchConfig::bounded(10_000).with_deadline(Duration::from_millis(50));
/// assert_eq!(cfg.max_steps, Some(10_000));
/// assert!(cfg.is_bounded());
/// assert!(!SearchConfig::default().is_bounded());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of search-loop iterations.
    pub max_steps: Option<u64>,
    /// Wall-clock limit measured from the start of the search.
    pub deadline: Option<Duration>,
}

impl SearchConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_steps.is_some() || self.deadline.is_some()
    }
}

/// Which neighbor-set implementation the driver builds graphs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyKind {
    Sorted,
    #[default]
    Hashed,
}

impl FromStr for AdjacencyKind {
    type Err = GraphIsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorted" => Ok(AdjacencyKind::Sorted),
            "hashed" => Ok(AdjacencyKind::Hashed),
            other => Err(GraphIsoError::invalid_input(format!(
                "unknown adjacency kind {other}"
            ))),
        }
    }
}

impl fmt::Display for AdjacencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjacencyKind::Sorted => write!(f, "sorted"),
            AdjacencyKind::Hashed => write!(f, "hashed"),
        }
    }
}

/// Settings for a batch of generate/permute/solve/verify trials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub spec: GraphSpec,
    pub trials: usize,
    pub seed: u64,
    pub search: SearchConfig,
    pub adjacency: AdjacencyKind,
}

impl HarnessConfig {
    pub fn new(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            spec: GraphSpec::new(vertex_count, edge_count),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GraphIsoError> {
        self.spec.validate()
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            spec: GraphSpec::new(16, 32),
            trials: 10,
            seed: 0x5EED,
            search: SearchConfig::default(),
            adjacency: AdjacencyKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_default_is_unbounded() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg, SearchConfig::unbounded());
        assert!(cfg.max_steps.is_none());
        assert!(cfg.deadline.is_none());
    }

    #[test]
    fn test_adjacency_kind_parse() {
        assert_eq!("sorted".parse::<AdjacencyKind>().unwrap(), AdjacencyKind::Sorted);
        assert_eq!("hashed".parse::<AdjacencyKind>().unwrap(), AdjacencyKind::Hashed);
        assert!("bitset".parse::<AdjacencyKind>().is_err());
        assert_eq!(AdjacencyKind::Sorted.to_string(), "sorted");
    }

    #[test]
    fn test_harness_config_validates_spec() {
        assert!(HarnessConfig::default().validate().is_ok());
        assert!(HarnessConfig::new(6, 2).validate().is_err());
        assert!(HarnessConfig::new(6, 16).validate().is_err());
    }

    #[test]
    fn test_harness_config_serde_roundtrip() {
        let cfg = HarnessConfig {
            search: SearchConfig::bounded(500),
            ..HarnessConfig::new(8, 10)
        };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: HarnessConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
