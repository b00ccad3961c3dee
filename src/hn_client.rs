use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::error;

use crate::config::AppConfig;
use crate::models::{Story, StoryId};

/// Upstream source of the ranked id list and story details.
///
/// Both operations treat upstream failure as absence: transport errors,
/// non-success statuses and malformed bodies are logged and resolved to an
/// empty list / `None`, never surfaced to the caller.
#[async_trait]
pub trait HackerNewsApi: Send + Sync {
    async fn best_story_ids(&self) -> Vec<StoryId>;
    async fn story(&self, id: StoryId) -> Option<Story>;
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
    best_ids_path: String,
    item_path_template: String,
}

impl HackerNewsClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            best_ids_path: config.best_ids_path.clone(),
            item_path_template: config.item_path_template.clone(),
        })
    }

    fn best_ids_url(&self) -> String {
        format!("{}{}", self.base_url, self.best_ids_path)
    }

    fn item_url(&self, id: StoryId) -> String {
        let path = self.item_path_template.replace("{id}", &id.to_string());
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HackerNewsApi for HackerNewsClient {
    async fn best_story_ids(&self) -> Vec<StoryId> {
        let url = self.best_ids_url();
        let result: std::result::Result<Vec<StoryId>, reqwest::Error> = async {
            self.client
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<StoryId>>()
                .await
        }
        .await;

        match result {
            Ok(ids) => ids,
            Err(err) => {
                error!("failed to fetch best story ids from {url}: {err}");
                Vec::new()
            }
        }
    }

    async fn story(&self, id: StoryId) -> Option<Story> {
        let url = self.item_url(id);
        let result: std::result::Result<Option<Story>, reqwest::Error> = async {
            self.client
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?
                .json::<Option<Story>>()
                .await
        }
        .await;

        match result {
            Ok(Some(story)) => Some(story),
            // The item endpoint answers `null` for ids it has no data for.
            Ok(None) => {
                error!("upstream returned no data for story id {id}");
                None
            }
            Err(err) => {
                error!("failed to fetch story {id} from {url}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config(base_url: &str) -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            request_timeout_ms: 5_000,
            cache_item_ttl_minutes: 10,
            upstream_base_url: base_url.to_string(),
            best_ids_path: "/v0/beststories.json".to_string(),
            item_path_template: "/v0/item/{id}.json".to_string(),
        }
    }

    #[test]
    fn item_url_substitutes_id_into_template() {
        let client = HackerNewsClient::new(&test_config("https://hn.example.com/")).unwrap();
        assert_eq!(
            client.item_url(8863),
            "https://hn.example.com/v0/item/8863.json"
        );
        assert_eq!(
            client.best_ids_url(),
            "https://hn.example.com/v0/beststories.json"
        );
    }

    #[tokio::test]
    async fn best_story_ids_parses_json_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v0/beststories.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[101, 42, 7]")
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        assert_eq!(client.best_story_ids().await, vec![101, 42, 7]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn best_story_ids_treats_server_error_as_no_ids() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/beststories.json")
            .with_status(503)
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        assert!(client.best_story_ids().await.is_empty());
    }

    #[tokio::test]
    async fn best_story_ids_treats_non_array_body_as_no_ids() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/beststories.json")
            .with_status(200)
            .with_body(r#"{"unexpected":"object"}"#)
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        assert!(client.best_story_ids().await.is_empty());
    }

    #[tokio::test]
    async fn story_parses_item_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/item/8863.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"by":"dhouston","descendants":71,"id":8863,"kids":[9224],"score":104,"time":1175714200,"title":"My YC app: Dropbox","type":"story","url":"http://www.getdropbox.com/u/2/screencast.html"}"#,
            )
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        let story = client.story(8863).await.unwrap();

        assert_eq!(story.id, 8863);
        assert_eq!(story.by, "dhouston");
        assert_eq!(story.score, 104);
        assert_eq!(story.kids, vec![9224]);
        assert_eq!(story.kind, "story");
    }

    #[tokio::test]
    async fn story_treats_null_body_as_absent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/item/1.json")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        assert!(client.story(1).await.is_none());
    }

    #[tokio::test]
    async fn story_treats_not_found_as_absent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/item/2.json")
            .with_status(404)
            .create_async()
            .await;

        let client = HackerNewsClient::new(&test_config(&server.url())).unwrap();
        assert!(client.story(2).await.is_none());
    }
}
