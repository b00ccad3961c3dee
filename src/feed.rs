use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, warn};

use crate::cache::StoryCache;
use crate::hn_client::HackerNewsApi;
use crate::models::{FeedRequest, Story, StoryId, StoryView};

/// Orchestrates one feed request: id fetch, concurrent cache-or-fetch
/// resolution under a shared deadline, then ranking and truncation.
pub struct BestStoriesFeed {
    api: Arc<dyn HackerNewsApi>,
    cache: Arc<dyn StoryCache>,
}

impl BestStoriesFeed {
    pub fn new(api: Arc<dyn HackerNewsApi>, cache: Arc<dyn StoryCache>) -> Self {
        Self { api, cache }
    }

    /// Never fails: an invalid request, an exhausted deadline, missing
    /// upstream data, and a faulted resolution all resolve to an empty feed.
    pub async fn handle(&self, request: FeedRequest, deadline: Instant) -> Vec<StoryView> {
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);

        match tokio::spawn(run_feed(api, cache, request, deadline)).await {
            Ok(stories) => stories,
            Err(err) => {
                error!("feed orchestration failed: {err}");
                Vec::new()
            }
        }
    }
}

async fn run_feed(
    api: Arc<dyn HackerNewsApi>,
    cache: Arc<dyn StoryCache>,
    request: FeedRequest,
    deadline: Instant,
) -> Vec<StoryView> {
    // Invalid or already-expired requests must never reach the network or
    // the cache.
    if request.story_count <= 0 {
        return Vec::new();
    }
    if Instant::now() >= deadline {
        return Vec::new();
    }

    let ids = api.best_story_ids().await;
    if ids.is_empty() {
        return Vec::new();
    }

    let tasks: Vec<JoinHandle<Option<Story>>> = ids
        .into_iter()
        .map(|id| {
            let api = Arc::clone(&api);
            let cache = Arc::clone(&cache);
            tokio::spawn(resolve_story(api, cache, id, deadline))
        })
        .collect();

    // Wait for the whole fan-out; every branch must reach a terminal state
    // before we decide anything. join_all keeps spawn order, so equal scores
    // stay in upstream id order through the stable sort below.
    let mut faulted = false;
    let mut stories = Vec::new();
    for outcome in join_all(tasks).await {
        match outcome {
            Ok(Some(story)) => stories.push(story),
            Ok(None) => {}
            Err(err) => {
                error!("story resolution task failed: {err}");
                faulted = true;
            }
        }
    }

    // One faulted branch blanks the whole result; partial success is not
    // returned.
    if faulted {
        return Vec::new();
    }

    stories.sort_by(|a, b| b.score.cmp(&a.score));
    stories
        .into_iter()
        .take(request.story_count as usize)
        .map(StoryView::from)
        .collect()
}

/// Resolve one id to a story: cache first, upstream on a miss. Checks the
/// shared deadline before any upstream work and resolves to `None` once it
/// has passed.
async fn resolve_story(
    api: Arc<dyn HackerNewsApi>,
    cache: Arc<dyn StoryCache>,
    id: StoryId,
    deadline: Instant,
) -> Option<Story> {
    if Instant::now() >= deadline {
        return None;
    }

    if let Some(story) = cache.get(id).await {
        return Some(story);
    }

    if Instant::now() >= deadline {
        return None;
    }

    let story = api.story(id).await?;

    // Write back off the request's critical path; a failed store only costs
    // future cache hits.
    let snapshot = story.clone();
    tokio::spawn(async move {
        if let Err(err) = cache.put(snapshot).await {
            warn!("failed to cache story {id}: {err}");
        }
    });

    Some(story)
}
