use anyhow::Context;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::NotionConfig;

pub const NOTION_VERSION: &str = "2022-06-28";
/// Notion accepts at most this many blocks per append request.
const MAX_BLOCKS_PER_REQUEST: usize = 100;

#[async_trait]
pub trait PageSync: Send + Sync {
    /// Creates a page titled `name` with one unchecked to-do per item and returns its id.
    async fn create_page(&self, name: &str, items: &[String]) -> anyhow::Result<String>;
    /// Renames the page and replaces its content with the given items.
    async fn update_page(&self, page_id: &str, name: &str, items: &[String]) -> anyhow::Result<()>;
}

pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    parent_page_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BlockChildren {
    #[serde(default)]
    results: Vec<PageRef>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: config.token.clone(),
            parent_page_id: config.parent_page_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send(&self, builder: reqwest::RequestBuilder, what: &str) -> anyhow::Result<reqwest::Response> {
        let response = builder.send().await.with_context(|| format!("notion {what}"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("notion {what} failed: HTTP {status}: {body}");
        }
        Ok(response)
    }

    async fn child_block_ids(&self, page_id: &str) -> anyhow::Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut query = vec![("page_size", MAX_BLOCKS_PER_REQUEST.to_string())];
            if let Some(c) = &cursor {
                query.push(("start_cursor", c.clone()));
            }
            let page: BlockChildren = self
                .send(
                    self.request(Method::GET, &format!("/blocks/{page_id}/children"))
                        .query(&query),
                    "list blocks",
                )
                .await?
                .json()
                .await
                .context("decode block children")?;

            ids.extend(page.results.into_iter().map(|b| b.id));
            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }
        Ok(ids)
    }

    async fn append_blocks(&self, page_id: &str, blocks: &[Value]) -> anyhow::Result<()> {
        for chunk in blocks.chunks(MAX_BLOCKS_PER_REQUEST) {
            self.send(
                self.request(Method::PATCH, &format!("/blocks/{page_id}/children"))
                    .json(&json!({ "children": chunk })),
                "append blocks",
            )
            .await?;
        }
        Ok(())
    }
}

fn title_property(name: &str) -> Value {
    json!({
        "title": {
            "title": [{ "type": "text", "text": { "content": name } }]
        }
    })
}

fn todo_blocks(items: &[String]) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            json!({
                "object": "block",
                "type": "to_do",
                "to_do": {
                    "rich_text": [{ "type": "text", "text": { "content": item } }],
                    "checked": false
                }
            })
        })
        .collect()
}

fn create_page_body(parent_page_id: &str, name: &str, blocks: &[Value]) -> Value {
    json!({
        "parent": { "page_id": parent_page_id },
        "properties": title_property(name),
        "children": blocks,
    })
}

#[async_trait]
impl PageSync for NotionClient {
    async fn create_page(&self, name: &str, items: &[String]) -> anyhow::Result<String> {
        let blocks = todo_blocks(items);
        let split = blocks.len().min(MAX_BLOCKS_PER_REQUEST);
        let (first, rest) = blocks.split_at(split);

        let page: PageRef = self
            .send(
                self.request(Method::POST, "/pages")
                    .json(&create_page_body(&self.parent_page_id, name, first)),
                "create page",
            )
            .await?
            .json()
            .await
            .context("decode created page")?;

        self.append_blocks(&page.id, rest).await?;
        debug!(page_id = %page.id, items = items.len(), "notion page created");
        Ok(page.id)
    }

    async fn update_page(&self, page_id: &str, name: &str, items: &[String]) -> anyhow::Result<()> {
        self.send(
            self.request(Method::PATCH, &format!("/pages/{page_id}"))
                .json(&json!({ "properties": title_property(name) })),
            "rename page",
        )
        .await?;

        for block_id in self.child_block_ids(page_id).await? {
            self.send(
                self.request(Method::DELETE, &format!("/blocks/{block_id}")),
                "delete block",
            )
            .await?;
        }

        self.append_blocks(page_id, &todo_blocks(items)).await?;
        debug!(%page_id, items = items.len(), "notion page updated");
        Ok(())
    }
}
