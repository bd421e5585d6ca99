//! Roadmap data model
//!
//! Input side ([`RoadmapSnapshot`], [`RoadmapNode`]) is what the API layer
//! delivers. Output side ([`GraphNode`], [`GraphEdge`]) is what the layout
//! engine hands to a renderer.

use serde::{Deserialize, Deserializer, Serialize};

/// Default difficulty when the snapshot omits one
pub const DEFAULT_DIFFICULTY: &str = "Normal";

/// Default language when the snapshot omits one
pub const DEFAULT_LANGUAGE: &str = "English";

/// Upper bound of a mastery score
pub const MAX_MASTERY: u8 = 100;

/// Learner mastery status of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Not yet mastered
    #[default]
    #[serde(alias = "novice")]
    Default,
    /// Working knowledge
    Competent,
    /// Fully mastered
    Expert,
}

impl NodeStatus {
    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Competent => "competent",
            Self::Expert => "expert",
        }
    }
}

/// Explicit node footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl NodeSize {
    /// Create a footprint
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One topic of a learning roadmap, with its subtopics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapNode {
    /// Unique within a roadmap
    pub id: String,
    /// Display text, also used as a cache-key component
    pub label: String,
    /// Free text shown with the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Missing, null and legacy values read as `Default`
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: NodeStatus,
    /// 0..=100, clamped on ingest
    #[serde(
        default,
        alias = "masteryScore",
        deserialize_with = "deserialize_mastery"
    )]
    pub mastery_score: u8,
    /// Overrides the configured node footprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NodeSize>,
    /// Subtopics in display order; null reads as empty
    #[serde(default, deserialize_with = "deserialize_children")]
    pub children: Vec<RoadmapNode>,
}

impl RoadmapNode {
    /// Create a leaf node with default status and zero mastery
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            status: NodeStatus::Default,
            mastery_score: 0,
            size: None,
            children: Vec::new(),
        }
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: RoadmapNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children, in order
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = RoadmapNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set proficiency status
    #[must_use]
    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    /// Set mastery score, clamped to 100
    #[must_use]
    pub fn with_mastery(mut self, score: u8) -> Self {
        self.mastery_score = score.min(MAX_MASTERY);
        self
    }

    /// Override the configured footprint
    #[must_use]
    pub fn with_size(mut self, size: NodeSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A roadmap as supplied once per view load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapSnapshot {
    /// Subject of the roadmap
    pub topic: String,
    /// Empty or missing reads as `Normal`
    #[serde(default = "default_difficulty", deserialize_with = "deserialize_or_difficulty")]
    pub difficulty: String,
    /// Empty or missing reads as `English`
    #[serde(default = "default_language", deserialize_with = "deserialize_or_language")]
    pub language: String,
    /// Forest of top-level topics
    pub roadmap: Vec<RoadmapNode>,
}

impl RoadmapSnapshot {
    /// Create snapshot with default difficulty and language
    #[must_use]
    pub fn new(topic: impl Into<String>, roadmap: Vec<RoadmapNode>) -> Self {
        Self {
            topic: topic.into(),
            difficulty: default_difficulty(),
            language: default_language(),
            roadmap,
        }
    }

    /// Parse the JSON shape served by the roadmap API
    ///
    /// Nesting depth is not limited here; the flattener's `max_depth` is the
    /// bound. The parser grows its stack on the heap as it descends.
    ///
    /// # Errors
    /// Returns the serde error if the document does not match the shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let snapshot = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(snapshot)
    }

    /// Set difficulty
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    /// Set content language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn deserialize_or_difficulty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_difficulty))
}

fn deserialize_or_language<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_language))
}

fn deserialize_status<'de, D: Deserializer<'de>>(d: D) -> Result<NodeStatus, D::Error> {
    Ok(Option::<NodeStatus>::deserialize(d)?.unwrap_or_default())
}

fn deserialize_mastery<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = Option::<i64>::deserialize(d)?.unwrap_or(0);
    Ok(u8::try_from(raw.clamp(0, i64::from(MAX_MASTERY))).unwrap_or(MAX_MASTERY))
}

fn deserialize_children<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RoadmapNode>, D::Error> {
    Ok(Option::<Vec<RoadmapNode>>::deserialize(d)?.unwrap_or_default())
}

/// Flattened node, ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSeed {
    /// Node id
    pub id: String,
    /// Display text
    pub label: String,
    /// Proficiency status
    pub status: NodeStatus,
    /// 0..=100
    pub mastery_score: u8,
    /// Footprint override
    pub size: Option<NodeSize>,
}

impl NodeSeed {
    /// Seed labelled with its own id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            status: NodeStatus::Default,
            mastery_score: 0,
            size: None,
        }
    }

    /// Override the configured footprint
    #[must_use]
    pub fn with_size(mut self, size: NodeSize) -> Self {
        self.size = Some(size);
        self
    }
}

impl From<&RoadmapNode> for NodeSeed {
    fn from(node: &RoadmapNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            status: node.status,
            mastery_score: node.mastery_score,
            size: node.size,
        }
    }
}

/// Where an edge attaches to a node box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Top edge midpoint
    Top,
    /// Bottom edge midpoint
    Bottom,
    /// Left edge midpoint
    Left,
    /// Right edge midpoint
    Right,
}

/// Edge drawing style hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Orthogonal segments with rounded corners
    #[default]
    SmoothStep,
    /// Single segment
    Straight,
}

/// Routing hints attached by the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRoute {
    /// Drawing style
    pub style: EdgeStyle,
    /// Attachment on the parent
    pub source_anchor: Anchor,
    /// Attachment on the child
    pub target_anchor: Anchor,
}

/// Directed parent → child edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `e{source}-{target}`
    pub id: String,
    /// Parent id
    pub source: String,
    /// Child id
    pub target: String,
    /// Set once laid out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<EdgeRoute>,
}

impl GraphEdge {
    /// Create an unrouted edge
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e{source}-{target}"),
            source,
            target,
            route: None,
        }
    }
}

/// Positioned node
///
/// `x`/`y` are the top-left corner of the node box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id
    pub id: String,
    /// Display text
    pub label: String,
    /// Proficiency status
    pub status: NodeStatus,
    /// 0..=100
    pub mastery_score: u8,
    /// Layer index, roots at zero
    pub rank: usize,
    /// Position within the rank
    pub order: usize,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl GraphNode {
    /// Bounding box of the node
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl Bounds {
    /// Right edge
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors overlap; touching edges do not count
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Smallest rectangle containing both
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_parses_api_shape() {
        let json = r#"{
            "topic": "Rust",
            "roadmap": [{
                "id": "1",
                "label": "Basics",
                "description": "start here",
                "status": "novice",
                "mastery_score": 140,
                "children": [
                    {"id": "1.1", "label": "Ownership", "masteryScore": 40, "status": "expert"}
                ]
            }]
        }"#;

        let snapshot = RoadmapSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(snapshot.language, DEFAULT_LANGUAGE);

        let root = &snapshot.roadmap[0];
        assert_eq!(root.status, NodeStatus::Default);
        assert_eq!(root.mastery_score, 100);
        assert_eq!(root.children[0].mastery_score, 40);
        assert_eq!(root.children[0].status, NodeStatus::Expert);
        assert!(root.children[0].children.is_empty());
    }

    fn nested_json(depth: usize) -> String {
        let mut nodes = String::new();
        for i in 0..depth {
            nodes.push_str(&format!(r#"{{"id":"n{i}","label":"Level {i}","children":["#));
        }
        for _ in 0..depth {
            nodes.push_str("]}");
        }
        format!(r#"{{"topic":"Deep","roadmap":[{nodes}]}}"#)
    }

    #[test]
    fn deep_snapshot_parses_past_serde_default_limit() {
        let snapshot = RoadmapSnapshot::from_json(&nested_json(100)).unwrap();

        let mut depth = 0;
        let mut node = &snapshot.roadmap[0];
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, 99);
        assert_eq!(node.id, "n99");
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(RoadmapSnapshot::from_json(r#"{"topic":"x","roadmap":[]} extra"#).is_err());
    }

    #[test]
    fn snapshot_tolerates_nulls() {
        let json = r#"{
            "topic": "Go",
            "difficulty": null,
            "language": "German",
            "roadmap": [{"id": "a", "label": "A", "status": null, "mastery_score": null, "children": null}]
        }"#;

        let snapshot = RoadmapSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.difficulty, "Normal");
        assert_eq!(snapshot.language, "German");
        assert_eq!(snapshot.roadmap[0].mastery_score, 0);
    }

    #[test]
    fn negative_mastery_clamps_to_zero() {
        let json = r#"{"id": "a", "label": "A", "mastery_score": -5}"#;
        let node: RoadmapNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.mastery_score, 0);
    }

    #[test]
    fn edge_id_follows_parent_child() {
        let edge = GraphEdge::new("1", "1.2");
        assert_eq!(edge.id, "e1-1.2");
        assert!(edge.route.is_none());
    }

    #[test]
    fn touching_bounds_do_not_intersect() {
        let a = Bounds { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        let b = Bounds { x: 10.0, y: 0.0, width: 10.0, height: 10.0 };
        let c = Bounds { x: 5.0, y: 5.0, width: 10.0, height: 10.0 };

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(a.union(&b).width, 20.0);
    }
}
