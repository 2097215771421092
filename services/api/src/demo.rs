use crate::infra::{issuance_service, parse_json, parse_kind};
use clap::Args;
use gov_issuance::config::{AppConfig, Gov24Config};
use gov_issuance::documents::{
    known_kinds, sample_request, DocumentKind, DocumentRequest, IssuanceError, IssuancePanel,
    ResolutionPolicy,
};
use gov_issuance::error::AppError;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Print the catalog as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct IssueArgs {
    /// Document kind, e.g. landLedger or land-ledger
    #[arg(value_parser = parse_kind)]
    pub(crate) kind: DocumentKind,
    /// Payload JSON for the kind. Defaults to the catalog sample.
    #[arg(long, value_parser = parse_json)]
    pub(crate) payload: Option<Value>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Discard resolutions from attempts superseded by a newer one
    #[arg(long)]
    pub(crate) latest_started_wins: bool,
    /// Print the final panel as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let definitions = known_kinds();

    if args.json {
        match serde_json::to_string_pretty(&definitions) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Catalog unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Supported documents ({})", definitions.len());
    for definition in definitions {
        println!(
            "- {} {} [{}] {} {}",
            definition.service_type.icon(),
            definition.name,
            definition.kind,
            definition.method,
            definition.path
        );
        println!("    {}", definition.description);
    }
    Ok(())
}

pub(crate) async fn run_issue(args: IssueArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    print_defaults_notice(&config.gov24);

    let request = match args.payload {
        Some(payload) => DocumentRequest::from_json(args.kind, payload)?,
        None => sample_request(args.kind),
    };

    let service = issuance_service(&config.gov24, ResolutionPolicy::default())?;
    let call = service
        .request_builder()
        .build(&request)
        .map_err(IssuanceError::from)?;
    println!("Issuing {} via {} {}", args.kind.label(), call.method(), call.url());

    let outcome = service.issue(request).await;
    println!("Status: {}", service.status(args.kind).label());

    let result = outcome?;
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Result unavailable: {err}"),
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    print_defaults_notice(&config.gov24);

    let policy = if args.latest_started_wins {
        ResolutionPolicy::LatestStartedWins
    } else {
        ResolutionPolicy::LastResolvedWins
    };
    let service = issuance_service(&config.gov24, policy)?;

    println!("Gov24 issuance demo against {}", config.gov24.base_url);
    let mut tasks = JoinSet::new();
    for kind in DocumentKind::ordered() {
        let service = Arc::clone(&service);
        tasks.spawn(async move { (kind, service.issue(sample_request(kind)).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((kind, Ok(result))) => {
                println!("- {} issued at {}", kind.label(), result.issued_at.to_rfc3339())
            }
            Ok((kind, Err(err))) => println!("- {} failed: {}", kind.label(), err),
            Err(err) => println!("- issuance task aborted: {}", err),
        }
    }

    let panel = service.panel();
    if args.json {
        match serde_json::to_string_pretty(&panel) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Panel unavailable: {err}"),
        }
    } else {
        print!("{}", render_panel(&panel));
    }
    Ok(())
}

fn print_defaults_notice(config: &Gov24Config) {
    for name in &config.defaults_applied {
        println!("Note: {name} is not set; using the demo default");
    }
}

pub(crate) fn render_panel(panel: &IssuancePanel) -> String {
    let mut out = String::from("\nIssuance status\n");
    for entry in &panel.statuses {
        out.push_str(&format!("- {}: {}", entry.name, entry.label));
        if let Some(message) = entry.status.message() {
            out.push_str(&format!(" ({message})"));
        }
        out.push('\n');
    }

    match &panel.last_result {
        Some(result) => out.push_str(&format!(
            "Last result: {} at {}\n",
            result.document_kind.label(),
            result.issued_at.to_rfc3339()
        )),
        None => out.push_str("Last result: none\n"),
    }
    if let Some(error) = &panel.last_error {
        out.push_str(&format!("Last error: {error}\n"));
    }
    out
}
