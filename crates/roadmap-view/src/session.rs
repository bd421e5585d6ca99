//! Roadmap view session
//!
//! One session per loaded roadmap. The graph is flattened and laid out once
//! on load; the content cache lives as long as the session.

use crate::config::ViewConfig;
use crate::error::ViewResult;
use roadmap_content::{
    CacheKey, ContentCoordinator, ContentGenerator, DisplayState, FetchResult, Mode, Resolution,
    RoadmapContext, SelectionController,
};
use roadmap_graph::{flatten_with, Layout, LayoutEngine, RoadmapSnapshot};
use std::sync::Arc;

/// Flatten and lay out a snapshot
///
/// # Errors
/// Any structural `GraphError`; no partial layout is returned.
pub fn layout_snapshot(snapshot: &RoadmapSnapshot, config: &ViewConfig) -> ViewResult<Layout> {
    let flat = flatten_with(&snapshot.roadmap, &config.flatten)?;
    let layout = LayoutEngine::new(config.layout).layout_flattened(&flat)?;
    Ok(layout)
}

/// A loaded roadmap with its selection and content cache
#[derive(Debug)]
pub struct RoadmapView {
    snapshot: RoadmapSnapshot,
    layout: Layout,
    selection: SelectionController,
    config: ViewConfig,
}

impl RoadmapView {
    /// Load a snapshot
    ///
    /// # Errors
    /// `ViewError::Graph` if the roadmap is malformed.
    pub fn load(
        roadmap_id: impl Into<String>,
        snapshot: RoadmapSnapshot,
        generator: Arc<dyn ContentGenerator>,
        config: ViewConfig,
    ) -> ViewResult<Self> {
        let roadmap_id = roadmap_id.into();
        let layout = layout_snapshot(&snapshot, &config)?;

        let context = RoadmapContext::new(
            roadmap_id,
            snapshot.topic.clone(),
            non_empty_or(&snapshot.difficulty, &config.content.default_difficulty),
            non_empty_or(&snapshot.language, &config.content.default_language),
        );
        let selection = SelectionController::new(
            ContentCoordinator::with_generator(generator),
            context,
            layout.nodes.iter().map(|n| (n.id.clone(), n.label.clone())),
            config.content.default_mode,
        );

        tracing::info!(
            roadmap = %selection.context().roadmap_id,
            nodes = layout.node_count(),
            ranks = layout.rank_count,
            "roadmap view loaded"
        );

        Ok(Self {
            snapshot,
            layout,
            selection,
            config,
        })
    }

    /// Load a snapshot from its JSON form
    ///
    /// # Errors
    /// `ViewError::Snapshot` if the JSON does not parse, `ViewError::Graph` if
    /// the roadmap is malformed.
    pub fn from_json(
        roadmap_id: impl Into<String>,
        json: &str,
        generator: Arc<dyn ContentGenerator>,
        config: ViewConfig,
    ) -> ViewResult<Self> {
        let snapshot = RoadmapSnapshot::from_json(json)?;
        Self::load(roadmap_id, snapshot, generator, config)
    }

    /// Positioned graph for the renderer
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Snapshot as normalised on load
    #[must_use]
    pub fn snapshot(&self) -> &RoadmapSnapshot {
        &self.snapshot
    }

    /// Configuration the view was opened with
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Selection state and content coordinator
    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// What the content panel should show
    #[must_use]
    pub fn display(&self) -> DisplayState {
        self.selection.display()
    }

    /// Select a node by id
    ///
    /// # Errors
    /// `ViewError::Content` for an unknown id or a failed fetch.
    pub async fn select_node(&self, id: &str) -> ViewResult<Resolution> {
        Ok(self.selection.select_node(id).await?)
    }

    /// Switch presentation mode
    ///
    /// # Errors
    /// `ViewError::Content` if the fetch for the selected node fails.
    pub async fn set_mode(&self, mode: Mode) -> ViewResult<Resolution> {
        Ok(self.selection.set_mode(mode).await?)
    }

    /// Retry the selected node's content
    ///
    /// # Errors
    /// `ViewError::Content` if nothing is selected or the fetch fails again.
    pub async fn retry(&self) -> ViewResult<Resolution> {
        Ok(self.selection.retry().await?)
    }

    /// Warm the cache for every node in one mode
    pub async fn prefetch(&self, mode: Mode) -> Vec<(CacheKey, FetchResult)> {
        let targets = self.layout.nodes.iter().map(|n| (n.label.clone(), mode));
        self.selection
            .coordinator()
            .prefetch(
                self.selection.context(),
                targets,
                self.config.content.prefetch_limit,
            )
            .await
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
