use crate::demo::{run_demo, run_issue, run_list, DemoArgs, IssueArgs, ListArgs};
use crate::server;
use crate::sync::{run_sync_check, run_sync_commits, SyncCommitsArgs};
use clap::{Args, Parser, Subcommand};
use gov_issuance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gov24 Issuance Dispatcher",
    about = "Issue government documents and mirror repository commits from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the document catalog or issue a single document
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },
    /// Issue every catalog sample concurrently and print the status panel
    Demo(DemoArgs),
    /// Mirror repository commits into the Notion database
    Sync {
        #[command(subcommand)]
        command: SyncCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DocumentsCommand {
    /// List every supported document kind with its endpoint
    List(ListArgs),
    /// Issue one document, using the catalog sample unless a payload is given
    Issue(IssueArgs),
}

#[derive(Subcommand, Debug)]
enum SyncCommand {
    /// Copy recent commits into Notion, once or on an interval
    Commits(SyncCommitsArgs),
    /// Verify the GitHub and Notion credentials
    Check,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Documents {
            command: DocumentsCommand::List(args),
        } => run_list(args),
        Command::Documents {
            command: DocumentsCommand::Issue(args),
        } => run_issue(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Sync {
            command: SyncCommand::Commits(args),
        } => run_sync_commits(args).await,
        Command::Sync {
            command: SyncCommand::Check,
        } => run_sync_check().await,
    }
}
