//! Job lifecycle event monitor.
//!
//! Consumes a line-delimited JSON event feed (Event Grid schema) over HTTP,
//! filtered to one job, and fires a signal when the job reaches a terminal
//! state. The signal is a wake-up to re-check the job, not a payload of
//! truth: the waiter always re-fetches the job from the service.
//!
//! Any setup failure (bad feed URL, unreachable checkpoint store) surfaces
//! from [`JobMonitor::start`] immediately so the caller can fall back to
//! polling without consuming the event-wait timeout budget.

use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::checkpoints::CheckpointStore;

/// Settings for one monitoring session.
#[derive(Clone, Debug)]
pub struct MonitorSettings {
    /// URL of the job event feed.
    pub feed_url: String,
    /// Job whose lifecycle events are of interest.
    pub job_name: String,
}

#[derive(Debug, Deserialize)]
struct JobEvent {
    #[serde(default)]
    subject: String,
    #[serde(rename = "eventType", default)]
    event_type: String,
    #[serde(default)]
    data: JobEventData,
}

#[derive(Debug, Default, Deserialize)]
struct JobEventData {
    #[serde(default)]
    state: Option<String>,
}

impl JobEvent {
    fn is_terminal_for(&self, job_name: &str) -> bool {
        if self.event_type != "Microsoft.Media.JobStateChange" {
            return false;
        }
        if !self.subject.ends_with(&format!("/jobs/{job_name}")) {
            return false;
        }
        matches!(
            self.data.state.as_deref(),
            Some("Finished") | Some("Error") | Some("Canceled")
        )
    }
}

/// Running event monitor for a single job.
pub struct JobMonitor {
    signal: Arc<Notify>,
    task: JoinHandle<()>,
}

impl JobMonitor {
    /// Clear the checkpoint store (when configured), open the event feed,
    /// and start consuming it in the background.
    pub async fn start(
        settings: MonitorSettings,
        checkpoints: Option<CheckpointStore>,
    ) -> anyhow::Result<Self> {
        if let Some(store) = checkpoints {
            store
                .clear()
                .await
                .context("clearing the event checkpoint container")?;
        }

        let client = reqwest::Client::new();
        let response = client
            .get(&settings.feed_url)
            .send()
            .await
            .context("connecting to the job event feed")?
            .error_for_status()
            .context("job event feed rejected the subscription")?;

        let signal = Arc::new(Notify::new());
        let task = tokio::spawn(consume_feed(response, settings.job_name, signal.clone()));

        Ok(Self { signal, task })
    }

    /// Resolves when a terminal-state event for the job has been observed.
    /// The permit is stored, so an event that arrives before the caller
    /// awaits is not lost.
    pub async fn terminal_event(&self) {
        self.signal.notified().await;
    }

    /// Stop consuming the feed. Called on both race outcomes: after the
    /// event wins, and to force the monitor down when the timeout wins.
    pub fn stop(self) {
        self.task.abort();
    }

    #[cfg(test)]
    pub(crate) fn with_signal(signal: Arc<Notify>) -> Self {
        let task = tokio::spawn(std::future::pending::<()>());
        Self { signal, task }
    }
}

async fn consume_feed(response: reqwest::Response, job_name: String, signal: Arc<Notify>) {
    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "job event feed closed unexpectedly");
                return;
            }
        };
        buffer.extend_from_slice(&chunk);

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline).collect();
            if process_line(&line, &job_name) {
                signal.notify_one();
                return;
            }
        }
    }
}

/// Returns true when the line carries a terminal-state event for the job.
fn process_line(line: &[u8], job_name: &str) -> bool {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    match serde_json::from_str::<JobEvent>(text) {
        Ok(event) => {
            tracing::debug!(subject = %event.subject, event_type = %event.event_type, "job event");
            event.is_terminal_for(job_name)
        }
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable event line");
            false
        }
    }
}
