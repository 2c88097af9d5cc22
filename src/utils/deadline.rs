use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::error::{CpuStatsError, Result};

/// Run `query` on a worker thread and wait at most `timeout` for it.
///
/// When the timer wins the worker is left to finish on its own and its
/// result is dropped.
pub fn run_with_deadline<T, F>(timeout: Duration, query: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("hostcpu-query".to_string())
        .spawn(move || {
            let _ = tx.send(query());
        })
        .map_err(|err| CpuStatsError::platform(format!("failed to spawn query thread: {err}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(CpuStatsError::timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
        Err(RecvTimeoutError::Disconnected) => Err(CpuStatsError::platform(
            "query thread exited without a result",
        )),
    }
}
