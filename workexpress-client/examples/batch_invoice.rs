// workexpress-client/examples/batch_invoice.rs
// Search packages, stage them and invoice the batch

use workexpress_client::logger::init_logger;
use workexpress_client::{ClearPolicy, WorkExpressClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger(None);

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <tracking_number>...", args[0]);
        println!("  Example: WORKEXPRESS_TOKEN=... {} WEX123456 WEX123457", args[0]);
        return Ok(());
    }

    let client = WorkExpressClient::from_env()?;
    if !client.is_authenticated() {
        tracing::error!("WORKEXPRESS_TOKEN is not set");
        return Ok(());
    }

    for query in &args[1..] {
        let records = match client.search(query).await {
            Ok(Some(records)) => records,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(query = %query, "Search failed: {}", e.user_message());
                continue;
            }
        };

        for record in &records {
            tracing::info!(
                tracking_number = %record.tracking_number,
                slot = %record.slot_code(),
                status = %record.package_status,
                external = record.is_external(),
                "Package found"
            );
            match client.stage_package(record).await {
                Ok(group) => tracing::info!(
                    client_id = %group.client_id,
                    packages = group.packages.len(),
                    total = group.total,
                    "Staged"
                ),
                Err(e) => tracing::warn!("Not staged: {}", e.user_message()),
            }
        }
    }

    let pending = client.pending_batch().await;
    if pending.is_empty() {
        tracing::info!("Nothing to invoice");
        return Ok(());
    }

    let report = client
        .submit_pending(ClearPolicy::default(), |progress| {
            tracing::info!(
                "[{}/{}] {} -> {}",
                progress.completed,
                progress.total,
                progress.client_id,
                progress.status
            );
        })
        .await?;

    let summary = report.summary();
    println!(
        "Invoices: {} created, {} skipped, {} failed",
        summary.succeeded, summary.skipped, summary.failed
    );
    for failed in &report.failed {
        println!("  {}: {}", failed.group.client_id, failed.error.user_message());
    }

    Ok(())
}
