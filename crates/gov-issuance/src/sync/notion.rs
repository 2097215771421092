use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::commit::CommitPage;
use crate::config::SyncConfig;

pub const NOTION_VERSION: &str = "2022-06-28";
/// Notion rejects rich text longer than this.
const MAX_TEXT_LEN: usize = 2000;
/// Notion caps the children of one request at 100 blocks.
const MAX_CHILD_BLOCKS: usize = 100;
const TRUNCATION_MARK: char = '…';
const MESSAGE_HEADING: &str = "Commit Message";
const FILES_HEADING: &str = "Changed Files";

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    #[error("notion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notion responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("NOTION_TOKEN is not a valid header value")]
    InvalidToken(#[source] InvalidHeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseInfo {
    pub id: String,
    #[serde(default)]
    title: Vec<PlainText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct PlainText {
    plain_text: String,
}

impl DatabaseInfo {
    pub fn title(&self) -> String {
        self.title.iter().map(|part| part.plain_text.as_str()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<NotionPage>,
}

/// Where commit pages are written.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn find_commit_page(&self, short_sha: &str) -> Result<Option<NotionPage>, NotionError>;
    async fn create_commit_page(&self, page: &CommitPage) -> Result<NotionPage, NotionError>;
    async fn update_commit_page(
        &self,
        page_id: &str,
        page: &CommitPage,
    ) -> Result<NotionPage, NotionError>;
}

/// Writes commit pages into one Notion database.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(config: &SyncConfig) -> Result<Self, NotionError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.notion_token))
            .map_err(NotionError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert("notion-version", HeaderValue::from_static(NOTION_VERSION));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.notion_api_base_url.trim_end_matches('/').to_string(),
            database_id: config.notion_database_id.clone(),
        })
    }

    /// Database metadata; doubles as a credentials check.
    pub async fn database(&self) -> Result<DatabaseInfo, NotionError> {
        let url = format!("{}/v1/databases/{}", self.base_url, self.database_id);
        debug!(%url, "fetching database info");
        read_json(self.http.get(url).send().await?).await
    }
}

#[async_trait]
impl PageSink for NotionClient {
    async fn find_commit_page(&self, short_sha: &str) -> Result<Option<NotionPage>, NotionError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, self.database_id);
        let body = json!({
            "filter": { "property": "SHA", "rich_text": { "equals": short_sha } },
            "page_size": 1,
        });

        debug!(%short_sha, "looking up commit page");
        let response: QueryResponse = read_json(self.http.post(url).json(&body).send().await?).await?;
        Ok(response.results.into_iter().next())
    }

    async fn create_commit_page(&self, page: &CommitPage) -> Result<NotionPage, NotionError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": commit_properties(page),
            "children": commit_blocks(page),
        });

        debug!(short_sha = %page.short_sha, "creating commit page");
        let url = format!("{}/v1/pages", self.base_url);
        read_json(self.http.post(url).json(&body).send().await?).await
    }

    async fn update_commit_page(
        &self,
        page_id: &str,
        page: &CommitPage,
    ) -> Result<NotionPage, NotionError> {
        let body = json!({ "properties": commit_properties(page) });

        debug!(short_sha = %page.short_sha, %page_id, "updating commit page");
        let url = format!("{}/v1/pages/{page_id}", self.base_url);
        read_json(self.http.patch(url).json(&body).send().await?).await
    }
}

/// Database properties for a commit page.
pub fn commit_properties(page: &CommitPage) -> Value {
    json!({
        "Title": { "title": [text(&page.title)] },
        "Author": { "rich_text": [text(&page.author)] },
        "Date": { "date": { "start": page.date.to_rfc3339() } },
        "SHA": { "rich_text": [text(&page.short_sha)] },
        "URL": { "url": page.url },
    })
}

/// Page body: the full message, then one bullet per changed file.
pub fn commit_blocks(page: &CommitPage) -> Vec<Value> {
    let mut blocks = vec![
        block("heading_2", MESSAGE_HEADING),
        block("paragraph", &page.message),
        block("heading_2", FILES_HEADING),
    ];

    let room = MAX_CHILD_BLOCKS - blocks.len();
    if page.files.len() <= room {
        blocks.extend(page.files.iter().map(|file| block("bulleted_list_item", file)));
    } else {
        let shown = room - 1;
        blocks.extend(
            page.files[..shown]
                .iter()
                .map(|file| block("bulleted_list_item", file)),
        );
        let rest = format!("... and {} more files", page.files.len() - shown);
        blocks.push(block("bulleted_list_item", &rest));
    }

    blocks
}

fn block(kind: &str, content: &str) -> Value {
    json!({
        "object": "block",
        "type": kind,
        kind: { "rich_text": [text(content)] },
    })
}

fn text(content: &str) -> Value {
    let content: String = if content.chars().count() > MAX_TEXT_LEN {
        let mut cut: String = content.chars().take(MAX_TEXT_LEN - 1).collect();
        cut.push(TRUNCATION_MARK);
        cut
    } else {
        content.to_string()
    };
    json!({ "type": "text", "text": { "content": content } })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, NotionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NotionError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn page(files: usize) -> CommitPage {
        CommitPage {
            title: "[Commit] Add land ledger".to_string(),
            message: "Add land ledger\n\nQuery parameters only.".to_string(),
            author: "Kim".to_string(),
            date: Utc
                .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
                .single()
                .expect("timestamp"),
            short_sha: "4f2c9a1".to_string(),
            url: "https://github.com/acme/gov/commit/4f2c9a1".to_string(),
            files: (0..files).map(|n| format!("src/file_{n}.rs")).collect(),
        }
    }

    #[test]
    fn properties_carry_title_author_date_sha_and_url() {
        let properties = commit_properties(&page(1));

        assert_eq!(
            properties["Title"]["title"][0]["text"]["content"],
            "[Commit] Add land ledger"
        );
        assert_eq!(properties["Author"]["rich_text"][0]["text"]["content"], "Kim");
        assert_eq!(properties["Date"]["date"]["start"], "2025-03-01T09:00:00+00:00");
        assert_eq!(properties["SHA"]["rich_text"][0]["text"]["content"], "4f2c9a1");
        assert_eq!(
            properties["URL"]["url"],
            "https://github.com/acme/gov/commit/4f2c9a1"
        );
    }

    #[test]
    fn blocks_list_message_then_files() {
        let blocks = commit_blocks(&page(2));

        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0]["type"], "heading_2");
        assert_eq!(
            blocks[0]["heading_2"]["rich_text"][0]["text"]["content"],
            "Commit Message"
        );
        assert_eq!(blocks[1]["type"], "paragraph");
        assert_eq!(
            blocks[3]["bulleted_list_item"]["rich_text"][0]["text"]["content"],
            "src/file_0.rs"
        );
        assert_eq!(blocks[4]["type"], "bulleted_list_item");
    }

    #[test]
    fn oversized_file_lists_are_summarized() {
        let blocks = commit_blocks(&page(250));

        assert_eq!(blocks.len(), MAX_CHILD_BLOCKS);
        let last = &blocks[MAX_CHILD_BLOCKS - 1];
        assert_eq!(
            last["bulleted_list_item"]["rich_text"][0]["text"]["content"],
            "... and 154 more files"
        );
    }

    #[test]
    fn long_messages_are_truncated() {
        let mut long = page(0);
        long.message = "가".repeat(MAX_TEXT_LEN + 10);

        let blocks = commit_blocks(&long);
        let content = blocks[1]["paragraph"]["rich_text"][0]["text"]["content"]
            .as_str()
            .expect("paragraph text");
        assert_eq!(content.chars().count(), MAX_TEXT_LEN);
        assert!(content.ends_with(TRUNCATION_MARK));

        let mut exact = page(0);
        exact.message = "가".repeat(MAX_TEXT_LEN);
        let blocks = commit_blocks(&exact);
        let content = blocks[1]["paragraph"]["rich_text"][0]["text"]["content"]
            .as_str()
            .expect("paragraph text");
        assert!(!content.ends_with(TRUNCATION_MARK), "text at the limit is kept whole");
    }
}
