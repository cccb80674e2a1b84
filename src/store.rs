//! Single-slot result cache with request-generation tokens.
//!
//! Every fetch takes a token from [`ResultStore::begin`]. Only the holder of the most
//! recently issued token may commit, so a slow response to an earlier request can never
//! replace the result of a later one. The slot is replaced wholesale, never edited.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Generation number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

struct Slot<T> {
    generation: u64,
    value: Option<Arc<T>>,
}

/// Replace-only store holding the most recent result.
pub struct ResultStore<T> {
    issued: Arc<AtomicU64>,
    slot: Arc<RwLock<Slot<T>>>,
}

impl<T> Clone for ResultStore<T> {
    fn clone(&self) -> Self {
        Self {
            issued: self.issued.clone(),
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for ResultStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultStore<T> {
    pub fn new() -> Self {
        Self {
            issued: Arc::new(AtomicU64::new(0)),
            slot: Arc::new(RwLock::new(Slot {
                generation: 0,
                value: None,
            })),
        }
    }

    /// Start a request, superseding every request started before it.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has been started since `token` was issued.
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Store `value` if `token` is still the latest request.
    ///
    /// Returns the stored value, or gives `value` back when the response was stale.
    pub async fn commit(&self, token: RequestToken, value: T) -> Result<Arc<T>, T> {
        let mut slot = self.slot.write().await;
        if !self.is_latest(token) || token.0 <= slot.generation {
            debug!(
                "Discarding stale result for request {} (latest {})",
                token.0,
                self.issued.load(Ordering::SeqCst)
            );
            return Err(value);
        }
        let value = Arc::new(value);
        slot.generation = token.0;
        slot.value = Some(value.clone());
        Ok(value)
    }

    /// The most recently committed value.
    pub async fn current(&self) -> Option<Arc<T>> {
        self.slot.read().await.value.clone()
    }

    /// Generation of the committed value (0 when empty).
    pub async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }

    /// Drop the cached value; in-flight requests are superseded.
    pub async fn clear(&self) {
        let token = self.begin();
        let mut slot = self.slot.write().await;
        slot.generation = token.0;
        slot.value = None;
    }
}
