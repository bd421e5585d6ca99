//! End-to-end tests of a roadmap view session
//!
//! Run with: cargo test -p roadmap-view --test session_tests

use pretty_assertions::assert_eq;
use roadmap_content::{ContentError, FetchState, MediaSet, Mode, Resolution};
use roadmap_graph::{GraphError, NodeStatus, RankDirection, RoadmapNode, RoadmapSnapshot};
use roadmap_test_utils::{
    nested_snapshot_json, sample_snapshot, sample_snapshot_json, ScriptedGenerator,
};
use roadmap_view::{RoadmapView, ViewConfig, ViewError};
use std::io::Write;
use std::sync::Arc;

fn open(generator: &ScriptedGenerator, config: ViewConfig) -> RoadmapView {
    RoadmapView::load("rm1", sample_snapshot(), Arc::new(generator.clone()), config).unwrap()
}

#[test]
fn snapshot_json_is_normalised_on_load() {
    let view = RoadmapView::from_json(
        "rm1",
        sample_snapshot_json(),
        Arc::new(ScriptedGenerator::new()),
        ViewConfig::default(),
    )
    .unwrap();

    let snapshot = view.snapshot();
    assert_eq!(snapshot.difficulty, "Hard");
    assert_eq!(snapshot.language, "English");
    assert_eq!(snapshot.roadmap[0].mastery_score, 95);
    assert_eq!(snapshot.roadmap[0].children[0].status, NodeStatus::Default);
    assert_eq!(snapshot.roadmap[0].children[0].mastery_score, 100);

    let layout = view.layout();
    assert_eq!(layout.node_count(), 4);
    assert_eq!(layout.rank_count, 2);
    assert_eq!(view.selection().context().difficulty, "Hard");
}

#[test]
fn structural_errors_abort_the_load() {
    let snapshot = RoadmapSnapshot::new(
        "Dup",
        vec![RoadmapNode::new("1", "A").with_child(RoadmapNode::new("1", "B"))],
    );
    let err = RoadmapView::load(
        "rm1",
        snapshot,
        Arc::new(ScriptedGenerator::new()),
        ViewConfig::default(),
    )
    .unwrap_err();

    assert!(err.is_structural());
    assert!(matches!(err, ViewError::Graph(GraphError::DuplicateNode { .. })));
}

#[test]
fn invalid_json_is_a_snapshot_error() {
    let err = RoadmapView::from_json(
        "rm1",
        r#"{"topic": "x"}"#,
        Arc::new(ScriptedGenerator::new()),
        ViewConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ViewError::Snapshot(_)));
}

#[test]
fn deep_snapshot_is_bounded_by_the_depth_cap() {
    let load = |depth: usize| {
        RoadmapView::from_json(
            "rm1",
            &nested_snapshot_json(depth),
            Arc::new(ScriptedGenerator::new()),
            ViewConfig::default(),
        )
    };

    let view = load(100).unwrap();
    assert_eq!(view.layout().rank_count, 100);

    let err = load(1_200).unwrap_err();
    assert!(matches!(
        err,
        ViewError::Graph(GraphError::MalformedTree { limit: 1000, .. })
    ));
}

#[test]
fn config_file_drives_layout() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[layout]\ndirection = \"lr\"\n\n[content]\ndefault_mode = \"exam\"").unwrap();

    let config = ViewConfig::load(file.path()).unwrap();
    assert_eq!(config.layout.direction, RankDirection::LeftToRight);

    let view = open(&ScriptedGenerator::new(), config);
    let layout = view.layout();
    let root = layout.node("1").unwrap();
    let child = layout.node("1.1").unwrap();
    assert!(child.x > root.x);
    assert_eq!(view.selection().mode(), Mode::Exam);
}

#[test]
fn missing_config_file_is_io_error() {
    let err = ViewConfig::load("/nonexistent/roadmap-view.toml").unwrap_err();
    assert!(matches!(err, ViewError::Io { .. }));
}

#[tokio::test]
async fn browse_nodes_and_modes() {
    let media = MediaSet {
        images: vec!["https://img.example/ownership.png".into()],
        videos: Vec::new(),
    };
    let generator = ScriptedGenerator::new().with_media("Ownership", media.clone());
    let view = open(&generator, ViewConfig::default());

    view.select_node("1.2").await.unwrap();
    assert_eq!(view.display().content.unwrap().content, "Ownership (story)");

    view.set_mode(Mode::Deep).await.unwrap();
    let deep = view.display().content.unwrap();
    assert_eq!(deep.images, media.images);
    assert_eq!(generator.requests()[1].images_hint.as_ref(), Some(&media.images));

    view.select_node("2").await.unwrap();
    assert_eq!(view.display().content.unwrap().content, "Async (deep)");

    let back = view.select_node("1.2").await.unwrap();
    assert!(matches!(back, Resolution::Displayed { cached: true, .. }));
    assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn unknown_node_is_a_content_error() {
    let view = open(&ScriptedGenerator::new(), ViewConfig::default());
    let err = view.select_node("42").await.unwrap_err();
    assert!(matches!(err, ViewError::Content(ContentError::UnknownNode(_))));
    assert!(!err.is_structural());
}

#[tokio::test]
async fn prefetch_warms_every_node() {
    let generator = ScriptedGenerator::new();
    let view = open(&generator, ViewConfig::default());

    let results = view.prefetch(Mode::Exam).await;
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    let key = view.selection().context().key("Functions", Mode::Exam);
    assert_eq!(
        view.selection().coordinator().fetch_state(&key),
        Some(FetchState::Ready)
    );

    view.set_mode(Mode::Exam).await.unwrap();
    let shown = view.select_node("1.1.2").await.unwrap();
    assert!(matches!(shown, Resolution::Displayed { cached: true, .. }));
    assert_eq!(generator.calls(), 8);
}
