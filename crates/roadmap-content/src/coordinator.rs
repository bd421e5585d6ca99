//! Content cache coordinator
//!
//! Resolves `(roadmap, node label, mode)` to generated content:
//!
//! - **Hit**: a ready slot is returned without touching the generator
//! - **Join**: a pending slot is awaited; at most one fetch per key is in flight
//! - **Miss**: a pending placeholder is installed under the map lock, then the
//!   fetch is spawned. Media already cached for the node under another mode is
//!   attached to the request as a hint.
//! - **Failed**: a failed slot is replaced by a fresh fetch on the next resolve
//!
//! Fetches run as detached tasks. A caller that stops waiting does not cancel
//! the fetch; its result still lands in the cache.

use crate::error::FetchError;
use crate::generator::ContentGenerator;
use crate::media::MediaIndex;
use crate::types::{CacheEntry, CacheKey, FetchState, GenerationRequest, MediaKey, MediaSet, Mode, RoadmapContext};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use futures::{FutureExt, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;

/// Result of one fetch, shared by every waiter
pub type FetchResult = Result<Arc<CacheEntry>, FetchError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// State of one cache key
enum Slot {
    Pending(SharedFetch),
    Ready(Arc<CacheEntry>),
    Failed(FetchError),
}

impl Slot {
    fn state(&self) -> FetchState {
        match self {
            Self::Pending(_) => FetchState::Pending,
            Self::Ready(_) => FetchState::Ready,
            Self::Failed(_) => FetchState::Failed,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.state()).finish()
    }
}

/// Counters since the coordinator was created
#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    joins: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
    media_hints: AtomicU64,
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Keys with a slot in any state
    pub entry_count: usize,
    /// Slots with a fetch in flight
    pub pending: usize,
    /// Slots holding content
    pub ready: usize,
    /// Slots whose last fetch failed
    pub failed: usize,
    /// Resolves answered from a ready slot
    pub hits: u64,
    /// Resolves that awaited someone else's fetch
    pub joins: u64,
    /// Generator calls issued
    pub fetches: u64,
    /// Generator calls that returned an error
    pub failures: u64,
    /// Fetches issued with media from another mode
    pub media_hints: u64,
}

struct Inner {
    generator: Arc<dyn ContentGenerator>,
    slots: DashMap<CacheKey, Slot>,
    media: MediaIndex,
    counters: Counters,
}

/// A fetch that has been registered but not yet started
struct Dispatch {
    key: CacheKey,
    request: GenerationRequest,
    reply: oneshot::Sender<FetchResult>,
}

enum Step {
    Hit(Arc<CacheEntry>),
    Join(SharedFetch),
    Fetch(SharedFetch, Dispatch),
}

/// Single-flight content cache scoped to a roadmap-view session
///
/// Cloning is cheap and shares the cache.
#[derive(Clone)]
pub struct ContentCoordinator {
    inner: Arc<Inner>,
}

impl fmt::Debug for ContentCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCoordinator")
            .field("entries", &self.inner.slots.len())
            .field("media", &self.inner.media.len())
            .finish_non_exhaustive()
    }
}

impl ContentCoordinator {
    /// Create coordinator over a generator
    #[must_use]
    pub fn new(generator: impl ContentGenerator + 'static) -> Self {
        Self::with_generator(Arc::new(generator))
    }

    /// Create coordinator over a shared generator
    #[must_use]
    pub fn with_generator(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                generator,
                slots: DashMap::new(),
                media: MediaIndex::new(),
                counters: Counters::default(),
            }),
        }
    }

    /// Resolve content for a node in a mode
    ///
    /// Must be called from within a Tokio runtime; misses spawn the fetch.
    ///
    /// # Errors
    /// Returns the `FetchError` of the fetch this call issued or joined. The
    /// failure is recorded on the key and the next call retries.
    #[tracing::instrument(
        level = "debug",
        skip(self, context),
        fields(roadmap = %context.roadmap_id)
    )]
    pub async fn resolve(
        &self,
        context: &RoadmapContext,
        node_label: &str,
        mode: Mode,
    ) -> FetchResult {
        let key = context.key(node_label, mode);

        let step = match self.inner.slots.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let existing = match occupied.get() {
                    Slot::Ready(entry) => Some(Step::Hit(Arc::clone(entry))),
                    Slot::Pending(fetch) => Some(Step::Join(fetch.clone())),
                    Slot::Failed(_) => None,
                };
                existing.unwrap_or_else(|| {
                    let (fetch, dispatch) = self.prepare(&key, context);
                    occupied.insert(Slot::Pending(fetch.clone()));
                    Step::Fetch(fetch, dispatch)
                })
            }
            Entry::Vacant(vacant) => {
                let (fetch, dispatch) = self.prepare(&key, context);
                vacant.insert(Slot::Pending(fetch.clone()));
                Step::Fetch(fetch, dispatch)
            }
        };

        match step {
            Step::Hit(entry) => {
                self.inner.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%key, "content cache hit");
                Ok(entry)
            }
            Step::Join(fetch) => {
                self.inner.counters.joins.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%key, "joining in-flight fetch");
                fetch.await
            }
            Step::Fetch(fetch, dispatch) => {
                tokio::spawn(run_fetch(Arc::clone(&self.inner), dispatch));
                fetch.await
            }
        }
    }

    /// Resolve several nodes concurrently, at most `limit` fetches at a time
    ///
    /// Results come back in input order.
    pub async fn prefetch<I, S>(
        &self,
        context: &RoadmapContext,
        targets: I,
        limit: usize,
    ) -> Vec<(CacheKey, FetchResult)>
    where
        I: IntoIterator<Item = (S, Mode)>,
        S: Into<String>,
    {
        futures::stream::iter(targets)
            .map(|(label, mode)| {
                let label: String = label.into();
                async move {
                    let result = self.resolve(context, &label, mode).await;
                    (context.key(label, mode), result)
                }
            })
            .buffered(limit.max(1))
            .collect()
            .await
    }

    /// Register a pending fetch; the returned dispatch must be spawned
    fn prepare(&self, key: &CacheKey, context: &RoadmapContext) -> (SharedFetch, Dispatch) {
        let mut request = GenerationRequest::new(context, key.node_label.clone(), key.mode);
        if let Some(media) = self.inner.media.lookup(&key.media_key()) {
            self.inner.counters.media_hints.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                %key,
                images = media.images.len(),
                videos = media.videos.len(),
                "reusing cached media"
            );
            request = request.with_media_hint(media);
        }

        self.inner.counters.fetches.fetch_add(1, Ordering::Relaxed);
        tracing::info!(%key, "fetching content");

        let (reply, receiver) = oneshot::channel();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let waiting_key = key.clone();

        let fetch = async move {
            match receiver.await {
                Ok(result) => result,
                Err(_) => {
                    // Fetch task died without replying; free the key for a retry.
                    let err = FetchError::Abandoned {
                        key: waiting_key.clone(),
                    };
                    if let Some(inner) = weak.upgrade() {
                        inner.slots.insert(waiting_key, Slot::Failed(err.clone()));
                    }
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        let dispatch = Dispatch {
            key: key.clone(),
            request,
            reply,
        };
        (fetch, dispatch)
    }

    /// Ready content for a key, counted as a cache hit
    ///
    /// The synchronous hit path: never fetches, and a miss leaves no trace.
    #[must_use]
    pub fn cached(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        let entry = self.get(key)?;
        self.inner.counters.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%key, "content cache hit");
        Some(entry)
    }

    /// Ready content for a key, without fetching or counting
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        match self.inner.slots.get(key)?.value() {
            Slot::Ready(entry) => Some(Arc::clone(entry)),
            _ => None,
        }
    }

    /// State of a key, if it was ever resolved
    #[must_use]
    pub fn fetch_state(&self, key: &CacheKey) -> Option<FetchState> {
        self.inner.slots.get(key).map(|slot| slot.state())
    }

    /// Error recorded for a failed key
    #[must_use]
    pub fn failure(&self, key: &CacheKey) -> Option<FetchError> {
        match self.inner.slots.get(key)?.value() {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Media that would be hinted for a node
    #[must_use]
    pub fn media_hint(&self, key: &MediaKey) -> Option<MediaSet> {
        self.inner.media.lookup(key)
    }

    /// Number of keys in any state
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.slots.len()
    }

    /// True when no key was ever resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.slots.is_empty()
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            entry_count: self.inner.slots.len(),
            hits: self.inner.counters.hits.load(Ordering::Relaxed),
            joins: self.inner.counters.joins.load(Ordering::Relaxed),
            fetches: self.inner.counters.fetches.load(Ordering::Relaxed),
            failures: self.inner.counters.failures.load(Ordering::Relaxed),
            media_hints: self.inner.counters.media_hints.load(Ordering::Relaxed),
            ..CacheStats::default()
        };
        for slot in &self.inner.slots {
            match slot.value().state() {
                FetchState::Pending => stats.pending += 1,
                FetchState::Ready => stats.ready += 1,
                FetchState::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

/// Run one generator call and publish its outcome
async fn run_fetch(inner: Arc<Inner>, dispatch: Dispatch) {
    let Dispatch {
        key,
        request,
        reply,
    } = dispatch;

    let result = match inner.generator.generate(request).await {
        Ok(generated) => {
            let entry = Arc::new(CacheEntry::from(generated));
            inner.media.record(key.media_key(), &entry.media());
            inner.slots.insert(key.clone(), Slot::Ready(Arc::clone(&entry)));
            tracing::debug!(%key, "content ready");
            Ok(entry)
        }
        Err(source) => {
            let err = FetchError::generation(key.clone(), source);
            inner.counters.failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(%key, error = %err, "content fetch failed");
            inner.slots.insert(key, Slot::Failed(err.clone()));
            Err(err)
        }
    };

    // Nobody may be waiting any more; the cache is already updated.
    let _ = reply.send(result);
}
