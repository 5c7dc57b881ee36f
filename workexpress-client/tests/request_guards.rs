// workexpress-client/tests/request_guards.rs
// Overlapping searches, stagings and submissions against a slowed-down mock backend

mod common;

use std::time::Duration;

use common::{MockBackend, MockState, client_json, client_ref, package, record};
use serde_json::json;
use workexpress_client::{ClearPolicy, ClientError};

async fn after(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[tokio::test]
async fn test_superseded_search_is_discarded() -> anyhow::Result<()> {
    let mut state = MockState::default();
    for (id, tracking) in [("p1", "WEX111111"), ("p2", "WEX222222")] {
        state.packages.insert(
            tracking.into(),
            package(id, tracking, 1.0, client_json("c1", "Uno", 2.0, json!(false))),
        );
    }
    state.delay("GET /packages/tracking/WEX111111", 200);
    let backend = MockBackend::start(state).await;
    let client = backend.client();

    let (slow, fast) = tokio::join!(client.search("WEX111111"), async {
        after(20).await;
        client.search("WEX222222").await
    });

    assert_eq!(slow?, None);
    let fast = fast?.ok_or_else(|| anyhow::anyhow!("latest search was discarded"))?;
    assert_eq!(fast[0].tracking_number, "WEX222222");
    assert_eq!(client.recent_searches(), vec!["WEX222222"]);
    Ok(())
}

#[tokio::test]
async fn test_superseded_failure_is_discarded_too() -> anyhow::Result<()> {
    let mut state = MockState::default();
    state.packages.insert(
        "WEX222222".into(),
        package("p2", "WEX222222", 1.0, client_json("c1", "Uno", 2.0, json!(false))),
    );
    state.delay("GET /packages/tracking/WEX999999", 200);
    let backend = MockBackend::start(state).await;
    let client = backend.client();

    let (stale, latest) = tokio::join!(client.search("WEX999999"), async {
        after(20).await;
        client.search("WEX222222").await
    });

    // The stale lookup ends in NotFound, but nobody is waiting for it any more
    assert_eq!(stale?, None);
    assert!(latest?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_same_package_cannot_be_staged_twice_at_once() -> anyhow::Result<()> {
    let mut state = MockState::default();
    state.delay("GET /invoices/verify-package/WEX100001", 100);
    let backend = MockBackend::start(state).await;
    let client = backend.client();
    let r = record("p1", "WEX100001", 2.0, Some(client_ref("c1", 2.5, false)));

    let (first, second) = tokio::join!(client.stage_package(&r), client.stage_package(&r));

    assert_eq!(first?.packages.len(), 1);
    assert!(matches!(second, Err(ClientError::Validation(_))));
    // The second attempt never reached the backend
    let verifications = backend
        .hits()
        .iter()
        .filter(|h| h.starts_with("GET /invoices/verify-package/"))
        .count();
    assert_eq!(verifications, 1);
    assert_eq!(client.pending_batch().await.package_count(), 1);
    assert!(client.in_flight().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_second_submission_is_rejected_while_running() -> anyhow::Result<()> {
    let mut state = MockState::default();
    state.delay("POST /invoices", 200);
    let backend = MockBackend::start(state).await;
    let client = backend.client();
    client
        .stage_package(&record("p1", "WEX100001", 2.0, Some(client_ref("c1", 2.5, false))))
        .await?;

    let (first, second) = tokio::join!(
        client.submit_pending(ClearPolicy::default(), |_| {}),
        async {
            after(20).await;
            client.submit_pending(ClearPolicy::default(), |_| {}).await
        }
    );

    assert_eq!(first?.summary().succeeded, 1);
    assert!(matches!(second, Err(ClientError::Validation(_))));
    assert_eq!(backend.created().len(), 1);
    assert!(client.pending_batch().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_package_staged_during_submission_is_not_lost() -> anyhow::Result<()> {
    let mut state = MockState::default();
    state.delay("GET /invoices/verify-package/WEX200001", 100);
    state.delay("POST /invoices", 300);
    let backend = MockBackend::start(state).await;
    let client = backend.client();
    client
        .stage_package(&record("p1", "WEX100001", 2.0, Some(client_ref("c1", 2.5, false))))
        .await?;
    let late = record("p2", "WEX200001", 1.0, Some(client_ref("c2", 3.0, false)));

    // Verification of the late package outlasts the start of the submission
    let (staged, report) = tokio::join!(client.stage_package(&late), async {
        after(20).await;
        client.submit_pending(ClearPolicy::default(), |_| {}).await
    });

    assert!(matches!(staged, Err(ClientError::Validation(_))));
    let report = report?;
    assert_eq!(report.summary().succeeded, 1);
    let customers: Vec<String> = backend
        .created()
        .iter()
        .filter_map(|p| p["customer_id"].as_str().map(str::to_string))
        .collect();
    assert_eq!(customers, vec!["c1"]);
    assert!(client.pending_batch().await.is_empty());

    // Once the submission is over the package can be staged again
    client.stage_package(&late).await?;
    let pending = client.pending_batch().await;
    assert_eq!(pending.package_count(), 1);
    assert!(pending.contains_package("p2"));
    Ok(())
}

#[tokio::test]
async fn test_staging_is_refused_outright_during_submission() -> anyhow::Result<()> {
    let mut state = MockState::default();
    state.delay("POST /invoices", 200);
    let backend = MockBackend::start(state).await;
    let client = backend.client();
    client
        .stage_package(&record("p1", "WEX100001", 2.0, Some(client_ref("c1", 2.5, false))))
        .await?;
    let late = record("p2", "WEX200001", 1.0, Some(client_ref("c2", 3.0, false)));

    let (report, staged) = tokio::join!(
        client.submit_pending(ClearPolicy::default(), |_| {}),
        async {
            after(50).await;
            client.stage_package(&late).await
        }
    );

    report?;
    assert!(matches!(staged, Err(ClientError::Validation(_))));
    assert!(!backend.hits().iter().any(|h| h.ends_with("WEX200001")));
    Ok(())
}
