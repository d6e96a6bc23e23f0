//! Job completion waiter.
//!
//! Two strategies, in order. First the event-driven wait: race the job
//! monitor's terminal-state signal against a timeout, and on a signal
//! re-fetch the job from the service (the event is a wake-up, not the
//! truth). If the timeout wins, the monitor misbehaves, or no monitor could
//! be started at all, fall back to fixed-interval polling, which runs with
//! no overall deadline until the job reaches a terminal state.

use std::time::{Duration, Instant};

use mediaflow_client::models::{Job, JobState};
use mediaflow_client::{ClientResult, MediaService};

use crate::monitor::JobMonitor;

/// Wait-strategy knobs. Injected so tests can run in milliseconds.
#[derive(Clone, Debug)]
pub struct WaiterOptions {
    /// How long the event-driven path may run before polling takes over.
    pub event_timeout: Duration,
    /// Interval between job status fetches in the polling fallback.
    pub poll_interval: Duration,
}

impl Default for WaiterOptions {
    fn default() -> Self {
        Self {
            event_timeout: Duration::from_secs(30 * 60),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Wait until the job reaches Finished, Error, or Canceled and return it.
///
/// Error and Canceled are not errors here; the caller branches on the
/// returned state.
pub async fn wait_for_completion<S: MediaService + ?Sized>(
    service: &S,
    transform_name: &str,
    job_name: &str,
    monitor: Option<JobMonitor>,
    options: &WaiterOptions,
) -> ClientResult<Job> {
    let started = Instant::now();

    let job = match monitor {
        Some(monitor) => {
            match event_wait(service, transform_name, job_name, monitor, options).await {
                Some(job) => job,
                None => poll_until_terminal(service, transform_name, job_name, options).await?,
            }
        }
        None => poll_until_terminal(service, transform_name, job_name, options).await?,
    };

    println!("Job elapsed time: {} second(s).", started.elapsed().as_secs());
    Ok(job)
}

/// Event-driven strategy. `None` means "fall back to polling".
async fn event_wait<S: MediaService + ?Sized>(
    service: &S,
    transform_name: &str,
    job_name: &str,
    monitor: JobMonitor,
    options: &WaiterOptions,
) -> Option<Job> {
    // First settled branch wins; the loser is dropped (cancelled).
    let outcome = tokio::select! {
        _ = monitor.terminal_event() => {
            Some(service.get_job(transform_name, job_name).await)
        }
        _ = tokio::time::sleep(options.event_timeout) => None,
    };

    // Stop the monitor on both outcomes: after an event it is done, after a
    // timeout it must not keep consuming the feed.
    monitor.stop();

    match outcome {
        Some(Ok(job)) => Some(job),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "job fetch after event signal failed, switching to polling");
            None
        }
        None => {
            tracing::warn!(
                timeout_secs = options.event_timeout.as_secs(),
                "no terminal event within the timeout, switching to polling"
            );
            None
        }
    }
}

/// Polling fallback: fetch, report progress, sleep, repeat. No deadline;
/// ends only on a terminal state or a fetch error.
async fn poll_until_terminal<S: MediaService + ?Sized>(
    service: &S,
    transform_name: &str,
    job_name: &str,
    options: &WaiterOptions,
) -> ClientResult<Job> {
    loop {
        let job = service.get_job(transform_name, job_name).await?;

        if job.properties.state.is_terminal() {
            return Ok(job);
        }

        println!("Job is {}", job.properties.state);
        for (i, output) in job.properties.outputs.iter().enumerate() {
            let state = output.state.unwrap_or(job.properties.state);
            if state == JobState::Processing {
                let progress = output.progress.unwrap_or(0);
                println!("\tJobOutput[{i}] is {state}.  Progress: {progress}");
            } else {
                println!("\tJobOutput[{i}] is {state}.");
            }
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}
