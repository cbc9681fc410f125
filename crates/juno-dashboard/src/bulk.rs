//! Fan-out for multi-row operations.
//!
//! Each id is processed by its own future; all run concurrently and are
//! awaited together. A failure never cancels or rolls back the others.

use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;

/// Body of the `bulk-delete` actions.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Ids whose operation succeeded, in request order.
    pub succeeded: Vec<i64>,
    pub failed: Vec<BulkFailure>,
    /// Ids that were requested but not successfully processed, in request order.
    pub remaining: Vec<i64>,
}

impl BulkOutcome {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Drop every row whose operation succeeded; failed rows stay.
    pub fn retain_remaining<T>(&self, rows: &mut Vec<T>, id_of: impl Fn(&T) -> i64) {
        let done: HashSet<i64> = self.succeeded.iter().copied().collect();
        rows.retain(|row| !done.contains(&id_of(row)));
    }
}

/// Run `op` once per distinct id, concurrently, and tally the results.
pub async fn run_all<F, Fut, E>(ids: &[i64], op: F) -> BulkOutcome
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut seen = HashSet::new();
    let distinct: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let results = join_all(distinct.iter().map(|&id| {
        let fut = op(id);
        async move { (id, fut.await) }
    }))
    .await;

    let mut outcome = BulkOutcome::default();
    for (id, result) in results {
        match result {
            Ok(()) => outcome.succeeded.push(id),
            Err(e) => {
                tracing::warn!("Bulk operation failed for id {}: {}", id, e);
                outcome.remaining.push(id);
                outcome.failed.push(BulkFailure {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }
    outcome
}

impl IntoResponse for BulkOutcome {
    fn into_response(self) -> Response {
        Json(json!({
            "success": self.failed.is_empty(),
            "data": {
                "successCount": self.success_count(),
                "failureCount": self.failure_count(),
                "succeeded": self.succeeded,
                "failed": self.failed,
                "remaining": self.remaining,
            }
        }))
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_succeed() {
        let outcome = run_all(&[1, 2, 3], |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(outcome.succeeded, vec![1, 2, 3]);
        assert_eq!(outcome.failure_count(), 0);
        assert!(outcome.remaining.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_counts() {
        // N = 6, M = 2 failures
        let ids = [10, 11, 12, 13, 14, 15];
        let outcome = run_all(&ids, |id| async move {
            if id == 11 || id == 14 {
                Err(format!("cannot delete {}", id))
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(outcome.success_count(), 4);
        assert_eq!(outcome.failure_count(), 2);
        assert_eq!(outcome.succeeded, vec![10, 12, 13, 15]);
        assert_eq!(outcome.remaining, vec![11, 14]);
        assert_eq!(outcome.failed[0].error, "cannot delete 11");

        let mut rows: Vec<(i64, &str)> = ids.iter().map(|&id| (id, "row")).collect();
        outcome.retain_remaining(&mut rows, |r| r.0);
        let left: Vec<i64> = rows.iter().map(|r| r.0).collect();
        assert_eq!(left, vec![11, 14]);
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_slower_siblings() {
        let completed = AtomicUsize::new(0);
        let outcome = run_all(&[1, 2, 3], |id| {
            let completed = &completed;
            async move {
                if id == 1 {
                    return Err("fast failure");
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;
        assert_eq!(completed.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.succeeded, vec![2, 3]);
        assert_eq!(outcome.remaining, vec![1]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_processed_once() {
        let calls = AtomicUsize::new(0);
        let outcome = run_all(&[5, 5, 6, 5], |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), String>(()) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.succeeded, vec![5, 6]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcome = run_all(&[], |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(outcome, BulkOutcome::default());
    }
}
