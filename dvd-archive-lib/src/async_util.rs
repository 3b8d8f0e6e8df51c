//! Driving an async operation while handling the events it emits.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Upper bound on waiting for events after the operation finished, in case a
/// sender outlives it.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, handing every event from `events` to `on_event`.
///
/// Events sent before the task finished are all delivered before this
/// returns, as long as their senders are dropped within the drain timeout.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut events: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut handled: u64 = 0;

    let result = loop {
        tokio::select! {
            result = &mut task => break Some(result),
            event = events.recv() => match event {
                Some(event) => {
                    handled += 1;
                    on_event(event);
                }
                None => break None,
            },
        }
    };

    let Some(result) = result else {
        log::debug!("Event channel closed after {handled} events, awaiting task");
        return task.await;
    };

    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(event)) => {
                handled += 1;
                on_event(event);
            }
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "Stopped waiting for events after {}s ({handled} handled)",
                    DRAIN_TIMEOUT.as_secs()
                );
                break;
            }
        }
    }
    result
}

#[cfg(test)]
#[path = "tests/async_util_tests.rs"]
mod tests;
