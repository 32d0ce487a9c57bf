use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;

use stockhub_client::{ClientConfig, HttpGateway, Snapshot, TransactionGateway, submitter};
use stockhub_reports::{DashboardSummary, ReportFilter, build_report};
use stockhub_transactions::{
    SubmitRequest, TransactionBatch, TransactionKind, TransactionRecord, ValidatedBatch, aggregate,
    validate,
};

const USAGE: &str = "usage: stockhub <dashboard | report [purchase|sale] | preview <batch.json> | submit <batch.json>>";

#[tokio::main]
async fn main() -> Result<()> {
    stockhub_observability::init();

    let config = ClientConfig::from_env()?;
    let gateway = HttpGateway::new(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["dashboard"] => dashboard(&gateway, config.low_stock_threshold).await,
        ["report"] => report(&gateway, None).await,
        ["report", kind] => report(&gateway, Some(parse_kind(kind)?)).await,
        ["preview", path] => preview(&gateway, Path::new(path)).await,
        ["submit", path] => submit(&gateway, Path::new(path)).await,
        _ => bail!(USAGE),
    }
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    match raw {
        "purchase" | "purchases" => Ok(TransactionKind::Purchase),
        "sale" | "sales" => Ok(TransactionKind::Sale),
        other => bail!("unknown transaction kind '{other}'\n{USAGE}"),
    }
}

fn read_batch(path: &Path) -> Result<TransactionBatch> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

async fn all_records(gateway: &dyn TransactionGateway) -> Result<Vec<TransactionRecord>> {
    let mut records = gateway.transactions(TransactionKind::Purchase).await?;
    records.extend(gateway.transactions(TransactionKind::Sale).await?);
    Ok(records)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn dashboard(gateway: &dyn TransactionGateway, threshold: u64) -> Result<()> {
    let snapshot = Snapshot::load(gateway).await?;
    let records = all_records(gateway).await?;
    let summary = DashboardSummary::build(
        &snapshot.catalog,
        &snapshot.categories,
        &snapshot.salesmen,
        &records,
        threshold,
    );
    print_json(&summary)
}

async fn report(gateway: &dyn TransactionGateway, kind: Option<TransactionKind>) -> Result<()> {
    let snapshot = Snapshot::load(gateway).await?;
    let records = match kind {
        Some(kind) => gateway.transactions(kind).await?,
        None => all_records(gateway).await?,
    };
    let filter = ReportFilter {
        kind,
        ..ReportFilter::default()
    };
    let report = build_report(&records, &snapshot.catalog, &snapshot.salesmen, &filter)?;
    print_json(&report)
}

async fn preview(gateway: &dyn TransactionGateway, path: &Path) -> Result<()> {
    let batch = read_batch(path)?;
    let snapshot = Snapshot::load(gateway).await?;

    let summary = aggregate(&batch, &snapshot.catalog);
    let violations = match validate(&batch, &snapshot.catalog) {
        Ok(()) => Vec::new(),
        Err(v) => v.messages(),
    };
    print_json(&json!({
        "summary": summary,
        "valid": violations.is_empty(),
        "violations": violations,
    }))
}

async fn submit(gateway: &dyn TransactionGateway, path: &Path) -> Result<()> {
    let batch = read_batch(path)?;
    let snapshot = Snapshot::load(gateway).await?;

    let validated = ValidatedBatch::new(batch, &snapshot.catalog)?;
    let request = if validated.len() == 1 {
        SubmitRequest::single(&validated)?
    } else {
        SubmitRequest::bulk(&validated)?
    };

    let count = request.item_count();
    let ack = submitter::send(gateway, &request).await?;
    println!(
        "{}",
        ack.message
            .unwrap_or_else(|| format!("{count} {} item(s) recorded", request.kind()))
    );
    Ok(())
}
