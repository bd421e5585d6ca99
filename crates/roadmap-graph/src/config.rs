//! Flattening and layout configuration

use serde::{Deserialize, Serialize};

/// Axis along which ranks advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankDirection {
    /// Ranks stack downwards, nodes of a rank spread horizontally
    #[default]
    #[serde(rename = "tb", alias = "TB")]
    TopToBottom,
    /// Ranks advance rightwards, nodes of a rank spread vertically
    #[serde(rename = "lr", alias = "LR")]
    LeftToRight,
}

/// Rank direction name that is neither `tb` nor `lr`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rank direction: '{0}'")]
pub struct UnknownDirection(pub String);

impl std::str::FromStr for RankDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(Self::TopToBottom),
            "lr" | "left-to-right" => Ok(Self::LeftToRight),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// Tree flattener configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Maximum nesting levels, roots counting as level one
    pub max_depth: usize,
}

impl FlattenConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Layout engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes of one rank
    pub node_separation: f64,
    /// Gap between consecutive ranks
    pub rank_separation: f64,
    /// Footprint for nodes without a size override
    pub node_width: f64,
    /// Footprint height for nodes without a size override
    pub node_height: f64,
    /// Median sweeps, alternating down and up
    pub ordering_passes: usize,
    /// Axis along which ranks advance
    pub direction: RankDirection,
}

impl LayoutConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rank direction
    #[inline]
    #[must_use]
    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set node and rank gaps
    #[inline]
    #[must_use]
    pub fn with_separation(mut self, node_separation: f64, rank_separation: f64) -> Self {
        self.node_separation = node_separation;
        self.rank_separation = rank_separation;
        self
    }

    /// Set default footprint
    #[inline]
    #[must_use]
    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Set number of median sweeps
    #[inline]
    #[must_use]
    pub fn with_ordering_passes(mut self, passes: usize) -> Self {
        self.ordering_passes = passes;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_separation: 100.0,
            rank_separation: 100.0,
            node_width: 180.0,
            node_height: 70.0,
            ordering_passes: 4,
            direction: RankDirection::TopToBottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_names_parse() {
        assert_eq!("LR".parse(), Ok(RankDirection::LeftToRight));
        assert_eq!("top-to-bottom".parse(), Ok(RankDirection::TopToBottom));

        let err = "bt".parse::<RankDirection>().unwrap_err();
        assert_eq!(err, UnknownDirection("bt".into()));
        assert_eq!(err.to_string(), "unknown rank direction: 'bt'");
    }

    #[test]
    fn defaults_match_roadmap_view() {
        let config = LayoutConfig::default();
        assert_eq!(config.node_separation, 100.0);
        assert_eq!(config.rank_separation, 100.0);
        assert_eq!((config.node_width, config.node_height), (180.0, 70.0));
        assert_eq!(config.ordering_passes, 4);
        assert_eq!(FlattenConfig::default().max_depth, 1000);
    }

    #[test]
    fn direction_parses_short_and_long_names() {
        assert_eq!("TB".parse::<RankDirection>().unwrap(), RankDirection::TopToBottom);
        assert_eq!("left-to-right".parse::<RankDirection>().unwrap(), RankDirection::LeftToRight);
        assert!("diagonal".parse::<RankDirection>().is_err());
    }
}
