use crate::infra::parse_timestamp;
use chrono::{DateTime, Utc};
use clap::Args;
use gov_issuance::config::{AppConfig, SyncConfig};
use gov_issuance::error::AppError;
use gov_issuance::sync::{CommitFilters, CommitSync, GitHubClient, NotionClient, SyncError};
use gov_issuance::telemetry;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct SyncCommitsArgs {
    /// Maximum number of matching commits to mirror per run
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
    /// Keep running, syncing every SYNC_INTERVAL_SECS
    #[arg(long)]
    pub(crate) watch: bool,
    /// Only mirror commits by this author (repeatable)
    #[arg(long)]
    pub(crate) author: Vec<String>,
    /// Read commits from this branch instead of the default (repeatable)
    #[arg(long)]
    pub(crate) branch: Vec<String>,
    /// Skip commits older than this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) since: Option<DateTime<Utc>>,
    /// Skip commits newer than this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) until: Option<DateTime<Utc>>,
}

impl SyncCommitsArgs {
    fn filters(&self) -> CommitFilters {
        CommitFilters {
            branches: self.branch.clone(),
            authors: self.author.clone(),
            since: self.since,
            until: self.until,
        }
    }
}

fn clients(config: &SyncConfig) -> Result<(GitHubClient, NotionClient), AppError> {
    let github = GitHubClient::new(config).map_err(SyncError::from)?;
    let notion = NotionClient::new(config).map_err(SyncError::from)?;
    Ok((github, notion))
}

pub(crate) async fn run_sync_commits(args: SyncCommitsArgs) -> Result<(), AppError> {
    let app_config = AppConfig::load()?;
    telemetry::init(&app_config.telemetry)?;
    let config = SyncConfig::from_env()?;

    let (github, notion) = clients(&config)?;
    let sync = CommitSync::new(github, notion).with_filters(args.filters());

    if !args.watch {
        let report = sync.run(args.limit).await?;
        println!(
            "Synced {}/{}: {} created, {} updated, {} skipped",
            config.github_owner, config.github_repo, report.created, report.updated, report.skipped
        );
        return Ok(());
    }

    info!(
        interval_secs = config.interval.as_secs(),
        limit = args.limit,
        "watching for new commits"
    );
    let mut ticker = tokio::time::interval(config.interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = sync.run(args.limit).await {
                    warn!(error = %err, "commit sync run failed; retrying next interval");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping commit watch");
                return Ok(());
            }
        }
    }
}

pub(crate) async fn run_sync_check() -> Result<(), AppError> {
    let config = SyncConfig::from_env()?;
    let (github, notion) = clients(&config)?;

    let repository = github.repository().await.map_err(SyncError::from)?;
    println!(
        "GitHub: {} (default branch {}, {})",
        repository.full_name,
        repository.default_branch,
        if repository.private { "private" } else { "public" }
    );

    let database = notion.database().await.map_err(SyncError::from)?;
    let title = database.title();
    println!(
        "Notion: database {} ({})",
        database.id,
        if title.is_empty() { "untitled" } else { title.as_str() }
    );
    Ok(())
}
