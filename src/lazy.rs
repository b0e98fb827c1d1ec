//! Route units that are resolved on first navigation.
//!
//! Every route descriptor owns a [`LazyPage`]. The first request that reaches an
//! idle unit starts its loader on the runtime and is answered with the loading
//! fallback; requests arriving while the load runs get the fallback too. Once the
//! loader finishes, its outcome is cached for the lifetime of the process.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::pages::Page;

/// Error produced by a [`PageLoader`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PageLoadError(pub String);

impl PageLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Produces a page unit. Runs at most once per [`LazyPage`].
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn Page>, PageLoadError>;
}

/// Builds the page with a plain constructor the first time it is needed.
pub struct Deferred<F>(pub F);

#[async_trait]
impl<F, P> PageLoader for Deferred<F>
where
    F: Fn() -> P + Send + Sync,
    P: Page + 'static,
{
    async fn load(&self) -> Result<Arc<dyn Page>, PageLoadError> {
        Ok(Arc::new((self.0)()))
    }
}

enum LoadState {
    Idle,
    Pending,
    Ready(Arc<dyn Page>),
    Failed(PageLoadError),
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Idle => f.write_str("Idle"),
            LoadState::Pending => f.write_str("Pending"),
            LoadState::Ready(_) => f.write_str("Ready"),
            LoadState::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// What a request should render for a unit right now.
pub enum Availability {
    Ready(Arc<dyn Page>),
    Pending,
    Failed(PageLoadError),
}

/// LazyPage
///
/// A route unit with explicit idle/pending/ready/failed state.
pub struct LazyPage {
    name: String,
    loader: Option<Arc<dyn PageLoader>>,
    state: Mutex<LoadState>,
    settled: Notify,
}

impl fmt::Debug for LazyPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPage")
            .field("name", &self.name)
            .field("state", &*self.lock())
            .finish()
    }
}

impl LazyPage {
    pub fn new(name: impl Into<String>, loader: impl PageLoader + 'static) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            loader: Some(Arc::new(loader)),
            state: Mutex::new(LoadState::Idle),
            settled: Notify::new(),
        })
    }

    /// A unit that is available from the start.
    pub fn ready(name: impl Into<String>, page: impl Page + 'static) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            loader: None,
            state: Mutex::new(LoadState::Ready(Arc::new(page))),
            settled: Notify::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.lock(), LoadState::Ready(_))
    }

    /// poll
    ///
    /// Non-blocking check used by request handlers. Starts the loader when the unit
    /// is still idle. Must be called from within a tokio runtime.
    pub fn poll(self: &Arc<Self>) -> Availability {
        let mut state = self.lock();
        if matches!(*state, LoadState::Idle) {
            *state = LoadState::Pending;
            drop(state);
            self.spawn_load();
            return Availability::Pending;
        }

        match &*state {
            LoadState::Ready(page) => Availability::Ready(page.clone()),
            LoadState::Failed(e) => Availability::Failed(e.clone()),
            LoadState::Idle | LoadState::Pending => Availability::Pending,
        }
    }

    /// load
    ///
    /// Resolves the unit, starting the loader if nobody has yet, and waits for it to
    /// settle. Used for startup preloading.
    pub async fn load(self: &Arc<Self>) -> Result<Arc<dyn Page>, PageLoadError> {
        loop {
            // Register interest before inspecting the state so a completion landing
            // between the check and the await is not missed.
            let settled = self.settled.notified();
            tokio::pin!(settled);
            settled.as_mut().enable();

            match self.poll() {
                Availability::Ready(page) => return Ok(page),
                Availability::Failed(e) => return Err(e),
                Availability::Pending => settled.await,
            }
        }
    }

    fn spawn_load(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tracing::debug!(page = %this.name, "loading page unit");
            let outcome = match this.loader.clone() {
                // The loader runs in its own task so a panic still settles the unit.
                Some(loader) => match tokio::spawn(async move { loader.load().await }).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(page = %this.name, error = %e, "page loader panicked");
                        Err(PageLoadError::new("page loader panicked"))
                    }
                },
                None => Err(PageLoadError::new("page unit has no loader")),
            };
            this.settle(outcome);
        });
    }

    fn settle(&self, outcome: Result<Arc<dyn Page>, PageLoadError>) {
        let next = match outcome {
            Ok(page) => {
                tracing::info!(page = %self.name, "page unit ready");
                LoadState::Ready(page)
            }
            Err(e) => {
                tracing::error!(page = %self.name, error = %e, "page unit failed to load");
                LoadState::Failed(e)
            }
        };
        *self.lock() = next;
        self.settled.notify_waiters();
    }

    fn lock(&self) -> MutexGuard<'_, LoadState> {
        // The state is always left consistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
