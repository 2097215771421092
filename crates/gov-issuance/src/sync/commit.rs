use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SHORT_SHA_LEN: usize = 7;
const TITLE_PREFIX: &str = "[Commit]";

/// A commit as read from the source repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub url: String,
    /// Empty until the commit details have been fetched.
    pub files: Vec<String>,
}

impl CommitRecord {
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// What one Notion page records about a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPage {
    pub title: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub short_sha: String,
    pub url: String,
    pub files: Vec<String>,
}

impl CommitPage {
    /// Undated commits are stamped with the current time.
    pub fn from_commit(commit: &CommitRecord) -> Self {
        Self {
            title: format!("{TITLE_PREFIX} {}", commit.summary()),
            message: commit.message.clone(),
            author: commit.author.clone(),
            date: commit.date.unwrap_or_else(Utc::now),
            short_sha: commit.sha.chars().take(SHORT_SHA_LEN).collect(),
            url: commit.url.clone(),
            files: commit.files.clone(),
        }
    }
}

/// Narrows which commits get mirrored. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitFilters {
    pub branches: Vec<String>,
    pub authors: Vec<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl CommitFilters {
    pub fn matches(&self, commit: &CommitRecord) -> bool {
        let author_ok = self.authors.is_empty()
            || self
                .authors
                .iter()
                .any(|author| author.eq_ignore_ascii_case(&commit.author));
        if !author_ok {
            return false;
        }

        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        let Some(date) = commit.date else {
            return false;
        };
        self.since.map_or(true, |since| date >= since)
            && self.until.map_or(true, |until| date <= until)
    }
}
