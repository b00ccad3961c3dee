use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type StoryId = u64;

/// A story as returned by the Hacker News item endpoint.
///
/// Immutable once deserialized; cached by id. The upstream omits `kids`,
/// `url` and `descendants` for some item kinds, so those default.
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub descendants: i32,
    #[serde(default)]
    pub kids: Vec<StoryId>,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

/// Response representation of a story. The upstream epoch-seconds `time`
/// becomes an RFC 3339 timestamp; an out-of-range epoch serializes as null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    pub id: StoryId,
    pub by: String,
    pub descendants: i32,
    pub kids: Vec<StoryId>,
    pub score: i32,
    pub time: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl From<Story> for StoryView {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            by: story.by,
            descendants: story.descendants,
            kids: story.kids,
            score: story.score,
            time: DateTime::from_timestamp(story.time, 0),
            title: story.title,
            kind: story.kind,
            url: story.url,
        }
    }
}

/// One inbound feed request. Invalid when `story_count <= 0`; rejected
/// before any fetch occurs.
#[derive(Debug, Clone, Copy)]
pub struct FeedRequest {
    pub story_count: i32,
}
