//! Spawning seam for sequential processors.
//!
//! Coordinators run their command loops as detached tasks. On `wasm32` the
//! browser microtask executor drives them; everywhere else they ride on the
//! ambient tokio runtime, which is also what the test suite provides.

use futures::future::{AbortHandle, abortable};
use std::future::Future;

/// Spawns processor futures on the platform executor.
pub struct Task;

impl Task {
    /// Start a detached task that runs until its future completes.
    pub fn start<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        spawn(future);
    }

    /// Start a task tied to the returned handle. Dropping the handle aborts
    /// the task, which is how coordinator subscriptions are torn down when
    /// the owning UI scope ends.
    #[must_use]
    pub fn start_droppable<F>(future: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (task, abort_handle) = abortable(future);
        spawn(async move {
            let _ = task.await;
        });
        TaskHandle { abort_handle }
    }
}

/// Abort-on-drop handle for a spawned processor.
#[derive(Debug)]
pub struct TaskHandle {
    abort_handle: AbortHandle,
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::task::spawn(future);
}

#[cfg(target_arch = "wasm32")]
fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_signals::signal::Mutable;

    #[tokio::test]
    async fn dropping_the_handle_aborts_the_task() {
        let flag = Mutable::new(false);

        let task_flag = flag.clone();
        let handle = Task::start_droppable(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            task_flag.set(true);
        });
        drop(handle);

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        assert!(!flag.get());
    }

    #[tokio::test]
    async fn detached_tasks_run_to_completion() {
        let flag = Mutable::new(false);

        let task_flag = flag.clone();
        Task::start(async move {
            task_flag.set(true);
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert!(flag.get());
    }
}
