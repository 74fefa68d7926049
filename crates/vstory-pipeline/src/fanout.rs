//! Bounded per-scene fan-out with ordered reassembly.
//!
//! Collaborator calls across scenes are independent and may run
//! concurrently, but results must reach the compositor in scene order. Tasks
//! run under a semaphore-bounded pool and gather into an index-ordered
//! vector, never relying on completion order.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

/// Run `task(0..count)` with at most `limit` tasks in flight, returning
/// results in task-index order.
pub async fn ordered_fan_out<T, F, Fut>(count: usize, limit: usize, task: F) -> Vec<T>
where
    F: Fn(usize) -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));

    let futures = (0..count).map(|index| {
        let semaphore = Arc::clone(&semaphore);
        let future = task(index);
        async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            future.await
        }
    });

    // join_all preserves input order regardless of completion order
    join_all(futures).await
}
