//! Notion REST client implementing [`RemoteStore`] for one database.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::properties::{properties_json, PropertyMap};
use crate::remote::{RemoteEntry, RemotePage, RemoteStore};
use crate::SyncError;

const BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// Credentials and target database, read once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
}

/// Handle to one Notion database. Construct once and pass by reference.
pub struct NotionClient {
    client: reqwest::Client,
    config: NotionConfig,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<PageObject>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: Value,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, SyncError> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Point the client at another API root (a proxy or a local stub).
    pub fn with_base_url(config: NotionConfig, base_url: &str) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, SyncError> {
        let resp = request
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl RemoteStore for NotionClient {
    async fn query(&self, cursor: Option<&str>) -> Result<RemotePage, SyncError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.config.database_id);
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        let value = self.send(self.client.post(&url).json(&body)).await?;
        let parsed: QueryResponse = serde_json::from_value(value)?;
        Ok(RemotePage {
            entries: parsed
                .results
                .into_iter()
                .map(|p| RemoteEntry {
                    id: p.id,
                    properties: p.properties,
                })
                .collect(),
            next_cursor: if parsed.has_more { parsed.next_cursor } else { None },
        })
    }

    async fn create(&self, properties: &PropertyMap) -> Result<String, SyncError> {
        let url = format!("{}/pages", self.base_url);
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": properties_json(properties),
        });
        let value = self.send(self.client.post(&url).json(&body)).await?;
        let page: PageObject = serde_json::from_value(value)?;
        Ok(page.id)
    }

    async fn update(&self, id: &str, properties: &PropertyMap) -> Result<(), SyncError> {
        let url = format!("{}/pages/{}", self.base_url, id);
        let body = json!({ "properties": properties_json(properties) });
        self.send(self.client.patch(&url).json(&body)).await?;
        Ok(())
    }

    async fn archive(&self, id: &str) -> Result<(), SyncError> {
        let url = format!("{}/pages/{}", self.base_url, id);
        self.send(self.client.patch(&url).json(&json!({ "archived": true })))
            .await?;
        Ok(())
    }
}
