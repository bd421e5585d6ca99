//! Selection and mode state
//!
//! Tracks the selected node and the active presentation mode, and drives the
//! coordinator whenever either changes. Every resolution is tagged with the
//! key it was issued for; when it completes after the selection has moved on,
//! its result is dropped instead of replacing what is on display.

use crate::coordinator::ContentCoordinator;
use crate::error::{ContentError, ContentResult, FetchError};
use crate::types::{CacheEntry, CacheKey, Mode, RoadmapContext};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// The node currently selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNode {
    /// Node id
    pub id: String,
    /// Label used to key content
    pub label: String,
}

/// What the content panel should show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Content for the current selection and mode
    pub content: Option<Arc<CacheEntry>>,
    /// A fetch for the current selection is in flight
    pub loading: bool,
    /// Failure of the last fetch for the current selection
    pub error: Option<FetchError>,
}

/// Outcome of a selection change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Content for `key` is on display
    Displayed { key: CacheKey, cached: bool },
    /// The selection moved on before `key` resolved; the result was dropped
    Discarded { key: CacheKey },
    /// Mode changed with no node selected
    Idle,
}

impl Resolution {
    /// True when the result reached the display
    #[inline]
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        matches!(self, Self::Displayed { .. })
    }
}

#[derive(Debug)]
struct State {
    selected: Option<SelectedNode>,
    mode: Mode,
    display: DisplayState,
}

impl State {
    fn active_key(&self, roadmap_id: &str) -> Option<CacheKey> {
        self.selected
            .as_ref()
            .map(|node| CacheKey::new(roadmap_id, node.label.clone(), self.mode))
    }
}

/// Selection/mode state bound to one roadmap
///
/// `select_node` and `set_mode` change what is selected; `retry` only
/// re-resolves it.
#[derive(Debug)]
pub struct SelectionController {
    coordinator: ContentCoordinator,
    context: RoadmapContext,
    /// Node id → label, in roadmap order
    labels: IndexMap<String, String>,
    state: Mutex<State>,
}

impl SelectionController {
    /// Create controller for a roadmap's nodes
    pub fn new<I, A, B>(
        coordinator: ContentCoordinator,
        context: RoadmapContext,
        nodes: I,
        initial_mode: Mode,
    ) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            coordinator,
            context,
            labels: nodes
                .into_iter()
                .map(|(id, label)| (id.into(), label.into()))
                .collect(),
            state: Mutex::new(State {
                selected: None,
                mode: initial_mode,
                display: DisplayState::default(),
            }),
        }
    }

    /// Select a node and resolve its content in the active mode
    ///
    /// # Errors
    /// - `ContentError::UnknownNode` if `id` is not in the roadmap
    /// - `ContentError::Fetch` if the fetch failed and the node is still selected
    pub async fn select_node(&self, id: &str) -> ContentResult<Resolution> {
        let label = self
            .labels
            .get(id)
            .ok_or_else(|| ContentError::UnknownNode(id.to_string()))?
            .clone();

        let key = {
            let mut state = self.state.lock();
            state.selected = Some(SelectedNode {
                id: id.to_string(),
                label,
            });
            // A different node never shows the previous node's content.
            state.display.content = None;
            state
                .active_key(&self.context.roadmap_id)
                .ok_or_else(|| ContentError::UnknownNode(id.to_string()))?
        };

        self.show(key).await
    }

    /// Switch presentation mode, re-resolving the selected node
    ///
    /// # Errors
    /// `ContentError::Fetch` if the fetch failed and the selection is unchanged.
    pub async fn set_mode(&self, mode: Mode) -> ContentResult<Resolution> {
        let key = {
            let mut state = self.state.lock();
            state.mode = mode;
            state.active_key(&self.context.roadmap_id)
        };

        match key {
            Some(key) => self.show(key).await,
            None => Ok(Resolution::Idle),
        }
    }

    /// Re-resolve the active key, typically after a failed fetch
    ///
    /// # Errors
    /// - `ContentError::NoSelection` if no node is selected
    /// - `ContentError::Fetch` if the fetch failed again
    pub async fn retry(&self) -> ContentResult<Resolution> {
        let key = self.active_key().ok_or(ContentError::NoSelection)?;
        self.show(key).await
    }

    /// Resolve `key` and apply the result if it is still the active key
    async fn show(&self, key: CacheKey) -> ContentResult<Resolution> {
        if let Some(entry) = self.coordinator.cached(&key) {
            let mut state = self.state.lock();
            if state.active_key(&self.context.roadmap_id).as_ref() != Some(&key) {
                return Ok(Resolution::Discarded { key });
            }
            state.display = DisplayState {
                content: Some(entry),
                loading: false,
                error: None,
            };
            return Ok(Resolution::Displayed { key, cached: true });
        }

        {
            let mut state = self.state.lock();
            state.display.loading = true;
            state.display.error = None;
        }

        let result = self
            .coordinator
            .resolve(&self.context, &key.node_label, key.mode)
            .await;

        let mut state = self.state.lock();
        if state.active_key(&self.context.roadmap_id).as_ref() != Some(&key) {
            tracing::debug!(%key, "discarding stale content response");
            return Ok(Resolution::Discarded { key });
        }

        state.display.loading = false;
        match result {
            Ok(entry) => {
                state.display.content = Some(entry);
                Ok(Resolution::Displayed { key, cached: false })
            }
            Err(err) => {
                state.display.error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    /// Snapshot of what should be displayed
    #[must_use]
    pub fn display(&self) -> DisplayState {
        self.state.lock().display.clone()
    }

    /// Currently selected node
    #[must_use]
    pub fn selected(&self) -> Option<SelectedNode> {
        self.state.lock().selected.clone()
    }

    /// Active presentation mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.lock().mode
    }

    /// Cache key the display is bound to
    #[must_use]
    pub fn active_key(&self) -> Option<CacheKey> {
        self.state.lock().active_key(&self.context.roadmap_id)
    }

    /// Roadmap this controller serves
    #[must_use]
    pub fn context(&self) -> &RoadmapContext {
        &self.context
    }

    /// Underlying cache
    #[must_use]
    pub fn coordinator(&self) -> &ContentCoordinator {
        &self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::generator::MockContentGenerator;
    use crate::types::GeneratedContent;

    fn controller(generator: MockContentGenerator) -> SelectionController {
        SelectionController::new(
            ContentCoordinator::new(generator),
            RoadmapContext::new("rm1", "Rust", "Normal", "English"),
            [("1", "Intro"), ("2", "Ownership")],
            Mode::Story,
        )
    }

    fn echo() -> MockContentGenerator {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .returning(|req| Ok(GeneratedContent::text(format!("{}:{}", req.node_label, req.mode))));
        generator
    }

    #[tokio::test]
    async fn mode_change_without_selection_is_idle() {
        let controller = controller(MockContentGenerator::new());
        assert_eq!(controller.set_mode(Mode::Exam).await.unwrap(), Resolution::Idle);
        assert_eq!(controller.mode(), Mode::Exam);
        assert_eq!(controller.display(), DisplayState::default());
    }

    #[tokio::test]
    async fn select_then_switch_mode_then_back_hits_cache() {
        let controller = controller(echo());

        let first = controller.select_node("1").await.unwrap();
        assert_eq!(
            first,
            Resolution::Displayed {
                key: CacheKey::new("rm1", "Intro", Mode::Story),
                cached: false
            }
        );

        controller.set_mode(Mode::Deep).await.unwrap();
        assert_eq!(controller.display().content.unwrap().content, "Intro:deep");

        let back = controller.set_mode(Mode::Story).await.unwrap();
        assert!(matches!(back, Resolution::Displayed { cached: true, .. }));
        assert_eq!(controller.display().content.unwrap().content, "Intro:story");
        let stats = controller.coordinator().stats();
        assert_eq!((stats.fetches, stats.hits), (2, 1));
    }

    #[tokio::test]
    async fn unknown_node_is_rejected() {
        let controller = controller(MockContentGenerator::new());
        let err = controller.select_node("99").await.unwrap_err();
        assert_eq!(err, ContentError::UnknownNode("99".into()));
        assert!(controller.selected().is_none());
    }

    #[tokio::test]
    async fn failure_is_shown_for_current_selection() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(GenerateError::Rejected("model unavailable".into())));

        let controller = controller(generator);
        let err = controller.select_node("2").await.unwrap_err();

        assert!(matches!(err, ContentError::Fetch(_)));
        let display = controller.display();
        assert!(!display.loading);
        assert!(display.content.is_none());
        assert!(display.error.is_some());
    }

    #[tokio::test]
    async fn retry_needs_a_selection() {
        let controller = controller(MockContentGenerator::new());
        assert_eq!(controller.retry().await.unwrap_err(), ContentError::NoSelection);
    }
}
