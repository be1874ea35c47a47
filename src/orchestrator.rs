//! Concurrent dispatch of server checks.
//!
//! Every server gets its own tokio task. A semaphore bounds how many checks are
//! in flight; a permit is acquired before a task is spawned and released when
//! the task finishes, so excess servers wait for a free slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, shutdown_gracefully};
use crate::checker::{check_server, CheckSettings, VerificationRequest};
use crate::config::LOGGING_INTERVAL;
use crate::dns::NameserverQuery;
use crate::error_handling::CheckError;
use crate::failure::{CheckResult, Outcome};
use crate::initialization::init_semaphore;

/// Checks every server and returns one result per server.
///
/// Results come back in completion order. The call returns only once every
/// check has finished; there is no global timeout and no cancellation. A check
/// whose task panics is reported as [`CheckError::Panicked`] so that its
/// server still appears exactly once.
pub async fn run_all<Q>(
    servers: Vec<String>,
    request: Arc<VerificationRequest>,
    querier: Arc<Q>,
    settings: CheckSettings,
) -> Vec<CheckResult>
where
    Q: NameserverQuery + ?Sized + 'static,
{
    let total = servers.len();
    let semaphore = init_semaphore(settings.workers);
    let completed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let start_time = Instant::now();

    info!(
        "Checking {} servers with up to {} in flight",
        total, settings.workers
    );

    let cancel = CancellationToken::new();
    let logging_task = Some(spawn_progress_logger(
        cancel.child_token(),
        start_time,
        Arc::clone(&completed),
        Arc::clone(&failed),
        total,
    ));

    let mut tasks = FuturesUnordered::new();
    for server in servers {
        // The semaphore is never closed, so this only fails if that changes;
        // the check then runs without a permit rather than being dropped.
        let permit = Arc::clone(&semaphore).acquire_owned().await.ok();

        let request = Arc::clone(&request);
        let querier = Arc::clone(&querier);
        let completed = Arc::clone(&completed);
        let failed = Arc::clone(&failed);
        let task_server = server.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let result = check_server(&task_server, &request, querier.as_ref(), &settings).await;
            if !result.outcome.is_compliant() {
                failed.fetch_add(1, Ordering::SeqCst);
            }
            completed.fetch_add(1, Ordering::SeqCst);
            result
        });
        tasks.push(async move { (server, handle.await) });
    }

    let mut results = Vec::with_capacity(total);
    while let Some((server, joined)) = tasks.next().await {
        let result = match joined {
            Ok(result) => result,
            Err(join_error) => {
                warn!("Check task for {server} panicked: {join_error:?}");
                failed.fetch_add(1, Ordering::SeqCst);
                completed.fetch_add(1, Ordering::SeqCst);
                CheckResult {
                    server: server.clone(),
                    outcome: Outcome::Errored(CheckError::Panicked {
                        server,
                        message: join_error.to_string(),
                    }),
                    attempts: 0,
                }
            }
        };
        results.push(result);
    }

    shutdown_gracefully(cancel, logging_task).await;
    log_progress(start_time, &completed, &failed, total);

    results
}

fn spawn_progress_logger(
    cancel: CancellationToken,
    start_time: Instant,
    completed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    total: usize,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        interval.tick().await; // first tick completes immediately
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, &completed, &failed, total);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{Answer, QueryType};
    use crate::error_handling::QueryError;
    use crate::failure::Failure;
    use crate::test_helpers::{answer, scenario_request, test_settings, ScriptedQuery};
    use async_trait::async_trait;
    use std::net::SocketAddr;

    fn servers(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("10.0.0.{i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_server_appears_exactly_once() {
        let mut querier = ScriptedQuery::new();
        for server in servers(10) {
            querier = querier.script(&server, vec![Ok(answer(&["1.2.3.4"], 100))]);
        }
        let results = run_all(
            servers(10),
            Arc::new(scenario_request()),
            Arc::new(querier),
            test_settings(4),
        )
        .await;

        let mut seen: Vec<String> = results.iter().map(|r| r.server.clone()).collect();
        seen.sort();
        let mut expected = servers(10);
        expected.sort();
        assert_eq!(seen, expected);
        assert!(results.iter().all(|r| r.outcome.is_compliant()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded_by_workers() {
        let querier = Arc::new(ScriptedQuery::with_delay(Duration::from_secs(1)));
        let results = run_all(
            servers(20),
            Arc::new(scenario_request()),
            Arc::clone(&querier),
            CheckSettings {
                retry: crate::checker::RetryPolicy {
                    max_attempts: 1,
                    backoff: Duration::from_secs(30),
                },
                ..test_settings(5)
            },
        )
        .await;

        assert_eq!(results.len(), 20);
        assert_eq!(querier.max_in_flight(), 5);
        assert_eq!(querier.calls(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_server_list() {
        let results = run_all(
            Vec::new(),
            Arc::new(scenario_request()),
            Arc::new(ScriptedQuery::new()),
            test_settings(10),
        )
        .await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_server_does_not_block_others() {
        // 10.0.0.1 times out three times; the rest answer at once.
        let mut querier = ScriptedQuery::new();
        for server in servers(5).into_iter().skip(1) {
            querier = querier.script(&server, vec![Ok(answer(&["1.2.3.4"], 100))]);
        }
        let results = run_all(
            servers(5),
            Arc::new(scenario_request()),
            Arc::new(querier),
            test_settings(2),
        )
        .await;

        assert_eq!(results.len(), 5);
        let timeouts: Vec<&CheckResult> = results
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(Failure::QueryTimeout { .. })))
            .collect();
        assert_eq!(timeouts.len(), 1);
        assert_eq!(timeouts[0].server, "10.0.0.1");
        assert_eq!(timeouts[0].attempts, 3);
    }

    struct PanickingQuery;

    #[async_trait]
    impl NameserverQuery for PanickingQuery {
        async fn query(
            &self,
            server: SocketAddr,
            _hostname: &str,
            _query_type: QueryType,
        ) -> Result<Answer, QueryError> {
            if server.ip().to_string() == "10.0.0.2" {
                panic!("scripted panic");
            }
            Ok(answer(&["1.2.3.4"], 100))
        }
    }

    #[tokio::test]
    async fn test_panicking_check_still_yields_a_result() {
        let querier: Arc<dyn NameserverQuery> = Arc::new(PanickingQuery);
        let results = run_all(
            servers(3),
            Arc::new(scenario_request()),
            querier,
            test_settings(3),
        )
        .await;

        assert_eq!(results.len(), 3);
        let panicked = results
            .iter()
            .find(|r| r.server == "10.0.0.2")
            .expect("panicked server still reported");
        assert!(matches!(
            panicked.outcome,
            Outcome::Errored(CheckError::Panicked { .. })
        ));
        assert_eq!(
            results.iter().filter(|r| r.outcome.is_compliant()).count(),
            2
        );
    }
}
