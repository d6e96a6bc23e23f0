//! End-to-end workflow: provision, encode, protect, publish, clean up.
//!
//! The body runs inside a scope whose cleanup guard is executed exactly
//! once afterwards, whatever the outcome — success, early return, or error.

use anyhow::Context;

use mediaflow_client::models::{JobInput, JobOutput, JobState, StreamingEndpointResourceState};
use mediaflow_client::models::{StreamingLocator, StreamingLocatorProperties};
use mediaflow_client::MediaService;
use mediaflow_core::constants::{
    CONTENT_KEY_POLICY_NAME, FAIRPLAY_STREAMING_POLICY_NAME, INPUT_BASE_URI, INPUT_MP4_FILE,
    TRANSFORM_NAME,
};
use mediaflow_core::{Config, RunNames};

use crate::checkpoints::CheckpointStore;
use crate::cleanup::CleanupGuard;
use crate::monitor::{JobMonitor, MonitorSettings};
use crate::provision;
use crate::urls;
use crate::waiter::{self, WaiterOptions};

/// Per-invocation options from the command line.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub waiter: WaiterOptions,
    /// Pause for ENTER after printing the playback URL.
    pub interactive: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            waiter: WaiterOptions::default(),
            interactive: true,
        }
    }
}

/// Run the whole workflow with guaranteed cleanup.
pub async fn execute<S: MediaService + ?Sized>(
    service: &S,
    config: &Config,
    options: &RunOptions,
) -> anyhow::Result<()> {
    let names = RunNames::generate();
    let mut guard = CleanupGuard::new(
        TRANSFORM_NAME,
        CONTENT_KEY_POLICY_NAME,
        &config.streaming_endpoint_name,
        names.clone(),
    );

    let result = run_body(service, config, options, &names, &mut guard).await;

    let failures = guard.execute(service).await;
    if !failures.is_empty() {
        tracing::warn!(count = failures.len(), "cleanup finished with failures");
    }

    result
}

async fn run_body<S: MediaService + ?Sized>(
    service: &S,
    config: &Config,
    options: &RunOptions,
    names: &RunNames,
    guard: &mut CleanupGuard,
) -> anyhow::Result<()> {
    provision::get_or_create_transform(service, TRANSFORM_NAME)
        .await
        .context("provisioning the transform")?;

    println!("Creating an output asset...");
    service
        .create_asset(&names.output_asset)
        .await
        .context("creating the output asset")?;

    println!("Creating a job...");
    let input = JobInput::Http {
        base_uri: INPUT_BASE_URI.to_string(),
        files: vec![INPUT_MP4_FILE.to_string()],
    };
    let outputs = vec![JobOutput::asset(&names.output_asset)];
    service
        .create_job(TRANSFORM_NAME, &names.job, input, outputs)
        .await
        .context("submitting the encoding job")?;

    let monitor = start_monitor(config, &names.job).await;
    let job = waiter::wait_for_completion(service, TRANSFORM_NAME, &names.job, monitor, &options.waiter)
        .await
        .context("waiting for the job to complete")?;

    if job.properties.state != JobState::Finished {
        println!(
            "Job ended in state {}; skipping DRM provisioning and playback.",
            job.properties.state
        );
        return Ok(());
    }

    let policy =
        provision::get_or_create_content_key_policy(service, config, CONTENT_KEY_POLICY_NAME)
            .await?;
    let locator = create_streaming_locator(service, names, &policy.name).await?;

    match service
        .get_streaming_endpoint(&config.streaming_endpoint_name)
        .await
    {
        Ok(endpoint) => {
            if endpoint.properties.resource_state != StreamingEndpointResourceState::Running {
                service
                    .start_streaming_endpoint(&config.streaming_endpoint_name)
                    .await
                    .context("starting the streaming endpoint")?;
                guard.mark_endpoint_started();
            }

            let paths = service
                .list_paths(&locator.name)
                .await
                .context("listing streaming paths")?;
            let url = urls::hls_playback_url(&endpoint.properties.host_name, &paths);
            if url.is_empty() {
                println!("No HLS path is available for this locator.");
            } else {
                println!();
                println!("HLS url can be played on your Apple device:");
                println!("{url}");
                println!();
            }
        }
        Err(e) if e.is_not_found() => {
            println!(
                "Could not find streaming endpoint: {}",
                config.streaming_endpoint_name
            );
        }
        Err(e) => return Err(anyhow::Error::new(e).context("fetching the streaming endpoint")),
    }

    if options.interactive {
        wait_for_enter().await;
    }

    Ok(())
}

/// Create the locator binding the output asset to the FairPlay policies.
async fn create_streaming_locator<S: MediaService + ?Sized>(
    service: &S,
    names: &RunNames,
    content_key_policy_name: &str,
) -> anyhow::Result<StreamingLocator> {
    let streaming_policy =
        provision::get_or_create_streaming_policy(service, FAIRPLAY_STREAMING_POLICY_NAME)
            .await
            .context("provisioning the streaming policy")?;

    println!("Creating a streaming locator...");
    let locator = service
        .create_streaming_locator(
            &names.locator,
            StreamingLocatorProperties {
                asset_name: names.output_asset.clone(),
                streaming_policy_name: streaming_policy.name.clone(),
                default_content_key_policy_name: Some(content_key_policy_name.to_string()),
                streaming_locator_id: None,
            },
        )
        .await
        .context("creating the streaming locator")?;

    Ok(locator)
}

/// Try to start the event monitor. Every failure here downgrades to the
/// polling strategy with a warning and costs none of the event timeout.
async fn start_monitor(config: &Config, job_name: &str) -> Option<JobMonitor> {
    let feed_url = config.event_stream_url.as_ref()?;

    println!("Creating an event monitor to process job events...");
    let checkpoints = match (
        &config.storage_account_name,
        &config.storage_account_key,
        &config.storage_container_name,
    ) {
        (Some(account), Some(key), Some(container)) => Some(CheckpointStore::new(
            account.clone(),
            key.clone(),
            container.clone(),
        )),
        _ => None,
    };

    // The feed may host multiple streams; the configured stream name selects one.
    let feed_url = match &config.event_stream_name {
        Some(stream) => format!("{}/{}", feed_url.trim_end_matches('/'), stream),
        None => feed_url.clone(),
    };
    let settings = MonitorSettings {
        feed_url,
        job_name: job_name.to_string(),
    };

    match JobMonitor::start(settings, checkpoints).await {
        Ok(monitor) => Some(monitor),
        Err(e) => {
            tracing::warn!(error = %e, "failed to start event monitoring, will poll job status instead");
            println!("Failed to start event monitoring, will use polling job status instead...");
            None
        }
    }
}

async fn wait_for_enter() {
    use tokio::io::{AsyncBufReadExt, BufReader};

    println!("When finished testing press ENTER to cleanup.");
    let mut line = String::new();
    if let Err(e) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        tracing::warn!(error = %e, "stdin unavailable, continuing to cleanup");
    }
}
