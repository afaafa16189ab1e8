use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::{
    error::Result,
    registry::SourceRegistry,
    types::FileRecord,
};

/// Point-in-time view of the coordinator's published state
///
/// A snapshot is replaced as a whole, so observers never see files from
/// one load paired with the loading flag of another.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    /// Identifier the coordinator is currently bound to
    pub identifier: Option<String>,
    /// Files from the most recently resolved load (empty on failure)
    pub files: Vec<FileRecord>,
    /// Whether a load is outstanding
    pub is_loading: bool,
    /// Load counter; grows on every bind and refresh
    pub generation: u64,
}

impl ListingSnapshot {
    fn idle() -> Self {
        Self {
            identifier: None,
            files: Vec::new(),
            is_loading: false,
            generation: 0,
        }
    }
}

/// Loads and republishes one source's file listing for a presentation layer
///
/// The coordinator is bound to at most one source identifier at a time.
/// Binding to a new identifier or calling [`refresh`](Self::refresh) starts
/// an asynchronous load; while the load is outstanding the previously
/// published files stay visible and only `is_loading` flips. Every load is
/// stamped with a generation number, and only the resolution carrying the
/// current generation may publish — results of superseded loads are
/// discarded, so rapid rebinding can never end with stale files on screen.
///
/// Lookup absence and listing failure both resolve to an empty listing;
/// the coordinator never surfaces an error to its caller.
#[derive(Clone)]
pub struct ListingCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<SourceRegistry>,
    state: Mutex<LoadState>,
    tx: watch::Sender<ListingSnapshot>,
}

struct LoadState {
    identifier: Option<String>,
    generation: u64,
}

impl ListingCoordinator {
    /// Create an idle coordinator over the given registry
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        let (tx, _rx) = watch::channel(ListingSnapshot::idle());
        Self {
            inner: Arc::new(Inner {
                registry,
                state: Mutex::new(LoadState {
                    identifier: None,
                    generation: 0,
                }),
                tx,
            }),
        }
    }

    /// Create a coordinator already bound to `identifier`
    ///
    /// Must be called within a tokio runtime, as the first load is
    /// spawned immediately.
    pub fn bound(registry: Arc<SourceRegistry>, identifier: impl Into<String>) -> Self {
        let coordinator = Self::new(registry);
        coordinator.bind(identifier);
        coordinator
    }

    /// Point the coordinator at a source identifier and start loading
    ///
    /// Binding to the identifier already bound is a no-op; use
    /// [`refresh`](Self::refresh) to force a reload. Previously published
    /// files stay visible until the new load resolves. The load is spawned
    /// on the ambient tokio runtime.
    pub fn bind(&self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        let generation = {
            let mut state = self.inner.lock_state();
            if state.identifier.as_deref() == Some(identifier.as_str()) {
                return;
            }
            state.identifier = Some(identifier.clone());
            state.generation += 1;
            let generation = state.generation;
            self.inner.tx.send_modify(|snap| {
                snap.identifier = Some(identifier.clone());
                snap.is_loading = true;
                snap.generation = generation;
            });
            generation
        };
        debug!(identifier = %identifier, generation, "listing load started");
        self.inner.spawn_load(identifier, generation);
    }

    /// Reload the currently bound source
    ///
    /// Fire-and-forget; a no-op while no identifier is bound.
    pub fn refresh(&self) {
        let (identifier, generation) = {
            let mut state = self.inner.lock_state();
            let Some(identifier) = state.identifier.clone() else {
                return;
            };
            state.generation += 1;
            let generation = state.generation;
            self.inner.tx.send_modify(|snap| {
                snap.is_loading = true;
                snap.generation = generation;
            });
            (identifier, generation)
        };
        debug!(identifier = %identifier, generation, "listing refresh started");
        self.inner.spawn_load(identifier, generation);
    }

    /// Get the currently published snapshot
    pub fn snapshot(&self) -> ListingSnapshot {
        self.inner.tx.borrow().clone()
    }

    /// Get the currently published files
    pub fn files(&self) -> Vec<FileRecord> {
        self.inner.tx.borrow().files.clone()
    }

    /// Whether a load is outstanding
    pub fn is_loading(&self) -> bool {
        self.inner.tx.borrow().is_loading
    }

    /// Subscribe to snapshot updates
    ///
    /// Each received value is a complete snapshot; the channel only keeps
    /// the latest one, which is exactly what a rendering layer wants.
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.inner.tx.subscribe()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        // The lock is only held across synchronous sections; a poisoned
        // guard still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_load(self: &Arc<Self>, identifier: String, generation: u64) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = inner.resolve(&identifier).await;
            inner.commit(generation, outcome);
        });
    }

    /// Resolve one load: registry lookup, then the single suspension
    /// point of the whole state machine.
    async fn resolve(&self, identifier: &str) -> Result<Vec<FileRecord>> {
        match self.registry.get(identifier) {
            Some(source) => source.list_files().await,
            // An unregistered identifier reads as an empty source.
            None => Ok(Vec::new()),
        }
    }

    /// Publish the outcome of a load, unless a later generation won
    fn commit(&self, generation: u64, outcome: Result<Vec<FileRecord>>) {
        // Keep the state lock across the publish so a concurrent bind or
        // refresh cannot interleave between the generation check and the
        // snapshot update.
        let state = self.lock_state();
        if generation != state.generation {
            debug!(
                generation,
                current = state.generation,
                "discarding superseded listing result"
            );
            return;
        }
        let files = match outcome {
            Ok(files) => files,
            Err(err) => {
                debug!(generation, error = %err, "listing failed, publishing empty");
                Vec::new()
            }
        };
        self.tx.send_modify(|snap| {
            snap.files = files;
            snap.is_loading = false;
            snap.generation = generation;
        });
        drop(state);
    }
}
