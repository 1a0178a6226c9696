use std::fmt;

use crate::error::ApiError;

/// Run a best-effort side effect off the request path. Failures are logged and
/// dropped so the caller's error type never has to account for them.
///
/// Inside a tokio runtime the task goes to the blocking pool; outside one (CLI,
/// plain unit tests) it runs inline.
pub(crate) fn detach<F, E>(label: &'static str, task: F)
where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(move || report(label, task()));
        }
        Err(_) => report(label, task()),
    }
}

/// Run CPU-bound work such as password hashing on the blocking pool and wait for it.
pub(crate) async fn run_blocking<F, T>(label: &'static str, task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ApiError::dependency(format!("{label} did not complete: {err}")))
}

fn report<E: fmt::Display>(label: &'static str, result: Result<(), E>) {
    if let Err(err) = result {
        tracing::warn!(task = label, error = %err, "background task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_inline_without_runtime() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        detach("count", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), String>(())
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn swallows_failures() {
        detach("fails", || Err::<(), _>("storage offline".to_string()));
    }

    #[tokio::test]
    async fn blocking_work_returns_its_value() {
        let value = run_blocking("sum", || (1..=4).sum::<u32>())
            .await
            .expect("task completes");
        assert_eq!(value, 10);
    }

    #[tokio::test]
    async fn panicking_work_becomes_dependency_error() {
        let result: Result<(), ApiError> = run_blocking("hash", || panic!("hasher crashed")).await;
        assert!(matches!(result, Err(ApiError::Dependency(_))));
    }
}
