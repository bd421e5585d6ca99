//! Testing utilities for the roadmap workspace
//!
//! Shared fixtures and a scripted content generator.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roadmap_content::{
    ContentGenerator, GenerateError, GeneratedContent, GenerationRequest, MediaSet, Mode,
    RoadmapContext,
};
use roadmap_graph::{NodeStatus, RoadmapNode, RoadmapSnapshot};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Two roots, three levels deep, eight nodes
///
/// ```text
/// 1 Foundations ─┬─ 1.1 Syntax ─┬─ 1.1.1 Variables
///                │              └─ 1.1.2 Functions
///                └─ 1.2 Ownership ── 1.2.1 Borrowing
/// 2 Async ────────── 2.1 Futures
/// ```
pub fn three_level_tree() -> Vec<RoadmapNode> {
    vec![
        RoadmapNode::new("1", "Foundations")
            .with_status(NodeStatus::Expert)
            .with_mastery(95)
            .with_children([
                RoadmapNode::new("1.1", "Syntax")
                    .with_status(NodeStatus::Competent)
                    .with_mastery(60)
                    .with_children([
                        RoadmapNode::new("1.1.1", "Variables"),
                        RoadmapNode::new("1.1.2", "Functions"),
                    ]),
                RoadmapNode::new("1.2", "Ownership")
                    .with_child(RoadmapNode::new("1.2.1", "Borrowing")),
            ]),
        RoadmapNode::new("2", "Async").with_child(RoadmapNode::new("2.1", "Futures")),
    ]
}

pub fn sample_snapshot() -> RoadmapSnapshot {
    RoadmapSnapshot::new("Rust", three_level_tree())
}

/// Snapshot in the API's JSON shape, with camelCase mastery and a legacy status
pub fn sample_snapshot_json() -> &'static str {
    r#"{
        "topic": "Rust",
        "difficulty": "Hard",
        "language": null,
        "roadmap": [
            {
                "id": "1",
                "label": "Foundations",
                "status": "expert",
                "masteryScore": 95,
                "children": [
                    { "id": "1.1", "label": "Syntax", "status": "novice", "mastery_score": 140 },
                    { "id": "1.2", "label": "Ownership", "children": null }
                ]
            },
            { "id": "2", "label": "Async" }
        ]
    }"#
}

/// Snapshot JSON holding one chain `depth` levels deep
pub fn nested_snapshot_json(depth: usize) -> String {
    let mut nodes = String::new();
    for i in 0..depth {
        nodes.push_str(&format!(r#"{{"id":"n{i}","label":"Level {i}","children":["#));
    }
    for _ in 0..depth {
        nodes.push_str("]}");
    }
    format!(r#"{{"topic":"Deep","roadmap":[{nodes}]}}"#)
}

pub fn context() -> RoadmapContext {
    RoadmapContext::new("rm-test", "Rust", "Normal", "English")
}

/// Holds generation for one label until opened
#[derive(Debug, Clone)]
pub struct Gate {
    open: Arc<watch::Sender<bool>>,
    entered: Arc<Notify>,
}

impl Gate {
    fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self {
            open: Arc::new(open),
            entered: Arc::new(Notify::new()),
        }
    }

    /// Let every held and future call through
    pub fn open(&self) {
        self.open.send_replace(true);
    }

    /// Wait until a generator call has reached the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    async fn pass(&self) {
        self.entered.notify_one();
        let mut open = self.open.subscribe();
        // The sender lives in self, so the channel cannot close while waiting.
        let _ = open.wait_for(|open| *open).await;
    }
}

#[derive(Debug, Default)]
struct Script {
    media: HashMap<String, MediaSet>,
    failures: HashMap<String, VecDeque<GenerateError>>,
    gates: HashMap<String, Gate>,
    requests: Vec<GenerationRequest>,
}

/// Deterministic generator for tests
///
/// Content is `"{label} ({mode})"`. Media comes from the hint when one is
/// attached, otherwise from the media scripted for the label.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<Script>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Media returned for a label when no hint is attached
    #[must_use]
    pub fn with_media(self, label: &str, media: MediaSet) -> Self {
        self.script.lock().media.insert(label.to_string(), media);
        self
    }

    /// Fail the next call for a label
    pub fn fail_next(&self, label: &str, error: GenerateError) {
        self.script
            .lock()
            .failures
            .entry(label.to_string())
            .or_default()
            .push_back(error);
    }

    /// Hold calls for a label until the returned gate opens
    pub fn gate(&self, label: &str) -> Gate {
        self.script
            .lock()
            .gates
            .entry(label.to_string())
            .or_insert_with(Gate::new)
            .clone()
    }

    /// Generator calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls made for a label in a mode
    pub fn calls_for(&self, label: &str, mode: Mode) -> usize {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|r| r.node_label == label && r.mode == mode)
            .count()
    }

    /// Every request received, in arrival order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.script.lock().requests.clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = {
            let mut script = self.script.lock();
            script.requests.push(request.clone());
            script.gates.get(&request.node_label).cloned()
        };

        if let Some(gate) = gate {
            gate.pass().await;
        }

        let mut script = self.script.lock();
        if let Some(err) = script
            .failures
            .get_mut(&request.node_label)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }

        let media = if request.has_media_hint() {
            MediaSet {
                images: request.images_hint.clone().unwrap_or_default(),
                videos: request.videos_hint.clone().unwrap_or_default(),
            }
        } else {
            script
                .media
                .get(&request.node_label)
                .cloned()
                .unwrap_or_default()
        };

        Ok(
            GeneratedContent::text(format!("{} ({})", request.node_label, request.mode))
                .with_images(media.images)
                .with_videos(media.videos),
        )
    }
}
