use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::models::{Story, StoryId};

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache store failed: {0}")]
    Store(String),
}

/// Process-lifetime cache of previously fetched stories.
///
/// A miss is never an error. Store failures are reported to the caller but
/// only cost future cache hits, never the current request's result.
#[async_trait]
pub trait StoryCache: Send + Sync {
    async fn get(&self, id: StoryId) -> Option<Story>;
    async fn put(&self, story: Story) -> Result<(), CacheError>;
}

struct CacheEntry {
    story: Story,
    stored_at: Instant,
}

/// In-memory store with a bounded TTL per entry.
///
/// Lookups take no store lock; concurrent stores are serialized by a single
/// mutex held only for the insert. Two requests racing to populate the same
/// id both land their write, last one wins.
pub struct MemoryStoryCache {
    entries: DashMap<StoryId, CacheEntry>,
    ttl: Duration,
    store_lock: Mutex<()>,
}

impl MemoryStoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            store_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl StoryCache for MemoryStoryCache {
    async fn get(&self, id: StoryId) -> Option<Story> {
        let expired = match self.entries.get(&id) {
            Some(entry) => {
                if entry.stored_at.elapsed() < self.ttl {
                    return Some(entry.story.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(&id);
        }

        trace!("cache miss for story id {id}");
        None
    }

    async fn put(&self, story: Story) -> Result<(), CacheError> {
        let _guard = self.store_lock.lock().await;
        self.entries.insert(
            story.id,
            CacheEntry {
                story,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }
}
