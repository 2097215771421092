use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use super::commit::{CommitFilters, CommitPage, CommitRecord};
use super::github::{CommitSource, GitHubError};
use super::notion::{NotionError, PageSink};

/// Upper bound on listing pages read per branch in one run.
const MAX_PAGES: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] GitHubError),
    #[error(transparent)]
    Sink(#[from] NotionError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    /// Commits read but excluded by the filters.
    pub skipped: usize,
}

/// Copies recent commits from a [`CommitSource`] into a [`PageSink`].
///
/// Pages are keyed by short SHA, so rerunning over the same commits updates
/// the existing pages instead of adding new ones.
pub struct CommitSync<S, P> {
    source: S,
    sink: P,
    filters: CommitFilters,
}

impl<S: CommitSource, P: PageSink> CommitSync<S, P> {
    pub fn new(source: S, sink: P) -> Self {
        Self {
            source,
            sink,
            filters: CommitFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: CommitFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub async fn run(&self, limit: usize) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let selected = self.select_commits(limit, &mut report).await?;

        for commit in selected {
            let detailed = self.source.commit_details(&commit.sha).await?;
            let page = CommitPage::from_commit(&detailed);

            match self.sink.find_commit_page(&page.short_sha).await? {
                Some(existing) => {
                    self.sink.update_commit_page(&existing.id, &page).await?;
                    report.updated += 1;
                    debug!(short_sha = %page.short_sha, page_id = %existing.id, "commit page updated");
                }
                None => {
                    let created = self.sink.create_commit_page(&page).await?;
                    report.created += 1;
                    debug!(short_sha = %page.short_sha, page_id = %created.id, "commit page created");
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "commit sync finished"
        );
        Ok(report)
    }

    async fn select_commits(
        &self,
        limit: usize,
        report: &mut SyncReport,
    ) -> Result<Vec<CommitRecord>, SyncError> {
        let branches: Vec<Option<&str>> = if self.filters.branches.is_empty() {
            vec![None]
        } else {
            self.filters.branches.iter().map(|b| Some(b.as_str())).collect()
        };

        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for branch in branches {
            for page in 1..=MAX_PAGES {
                if selected.len() >= limit {
                    return Ok(selected);
                }

                let commits = self.source.recent_commits(page, branch).await?;
                if commits.is_empty() {
                    break;
                }

                for commit in commits {
                    if selected.len() >= limit {
                        break;
                    }
                    if !seen.insert(commit.sha.clone()) {
                        continue;
                    }
                    if self.filters.matches(&commit) {
                        selected.push(commit);
                    } else {
                        report.skipped += 1;
                    }
                }
            }
        }

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::notion::NotionPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSource {
        commits: Vec<CommitRecord>,
        page_size: usize,
    }

    impl FakeSource {
        fn new(authors: &[&str]) -> Self {
            let commits = authors
                .iter()
                .enumerate()
                .map(|(n, author)| CommitRecord {
                    sha: format!("{n:07}abcdef"),
                    message: format!("Change {n}\n\nDetails."),
                    author: author.to_string(),
                    date: None,
                    url: format!("https://github.com/acme/gov/commit/{n:07}"),
                    files: Vec::new(),
                })
                .collect();
            Self {
                commits,
                page_size: 2,
            }
        }
    }

    #[async_trait]
    impl CommitSource for FakeSource {
        async fn recent_commits(
            &self,
            page: u32,
            _branch: Option<&str>,
        ) -> Result<Vec<CommitRecord>, GitHubError> {
            let start = (page as usize - 1) * self.page_size;
            Ok(self
                .commits
                .iter()
                .skip(start)
                .take(self.page_size)
                .cloned()
                .collect())
        }

        async fn commit_details(&self, sha: &str) -> Result<CommitRecord, GitHubError> {
            let mut commit = self
                .commits
                .iter()
                .find(|commit| commit.sha == sha)
                .cloned()
                .expect("known sha");
            commit.files = vec![format!("src/{sha}.rs")];
            Ok(commit)
        }
    }

    #[derive(Default)]
    struct MemorySink {
        pages: Mutex<HashMap<String, CommitPage>>,
    }

    #[async_trait]
    impl PageSink for MemorySink {
        async fn find_commit_page(
            &self,
            short_sha: &str,
        ) -> Result<Option<NotionPage>, NotionError> {
            let pages = self.pages.lock().expect("pages mutex");
            Ok(pages.contains_key(short_sha).then(|| NotionPage {
                id: format!("page-{short_sha}"),
                url: None,
            }))
        }

        async fn create_commit_page(&self, page: &CommitPage) -> Result<NotionPage, NotionError> {
            self.pages
                .lock()
                .expect("pages mutex")
                .insert(page.short_sha.clone(), page.clone());
            Ok(NotionPage {
                id: format!("page-{}", page.short_sha),
                url: None,
            })
        }

        async fn update_commit_page(
            &self,
            page_id: &str,
            page: &CommitPage,
        ) -> Result<NotionPage, NotionError> {
            self.pages
                .lock()
                .expect("pages mutex")
                .insert(page.short_sha.clone(), page.clone());
            Ok(NotionPage {
                id: page_id.to_string(),
                url: None,
            })
        }
    }

    #[tokio::test]
    async fn creates_pages_then_updates_on_rerun() {
        let sync = CommitSync::new(FakeSource::new(&["Kim", "Lee", "Park"]), MemorySink::default());

        let first = sync.run(10).await.expect("first run");
        assert_eq!(
            first,
            SyncReport {
                created: 3,
                updated: 0,
                skipped: 0
            }
        );

        let second = sync.run(10).await.expect("second run");
        assert_eq!(
            second,
            SyncReport {
                created: 0,
                updated: 3,
                skipped: 0
            }
        );
        assert_eq!(sync.sink().pages.lock().expect("pages mutex").len(), 3);
    }

    #[tokio::test]
    async fn pages_carry_changed_files_from_details() {
        let sync = CommitSync::new(FakeSource::new(&["Kim"]), MemorySink::default());
        sync.run(1).await.expect("run");

        let pages = sync.sink().pages.lock().expect("pages mutex");
        let page = pages.get("0000000").expect("page for first commit");
        assert_eq!(page.title, "[Commit] Change 0");
        assert_eq!(page.files, vec!["src/0000000abcdef.rs"]);
    }

    #[tokio::test]
    async fn limit_counts_only_matching_commits() {
        let filters = CommitFilters {
            authors: vec!["kim".to_string()],
            ..CommitFilters::default()
        };
        let sync = CommitSync::new(
            FakeSource::new(&["Lee", "Kim", "Park", "Kim", "Kim"]),
            MemorySink::default(),
        )
        .with_filters(filters);

        let report = sync.run(2).await.expect("run");
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 2);
    }
}
