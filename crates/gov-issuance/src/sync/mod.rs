//! Mirrors recent repository commits into a Notion database, one page per
//! commit, keyed by the abbreviated SHA.

pub mod commit;
pub mod github;
pub mod notion;
pub mod pipeline;

pub use commit::{CommitFilters, CommitPage, CommitRecord, SHORT_SHA_LEN};
pub use github::{CommitSource, GitHubClient, GitHubError, RepositoryInfo};
pub use notion::{DatabaseInfo, NotionClient, NotionError, NotionPage, PageSink};
pub use pipeline::{CommitSync, SyncError, SyncReport};
