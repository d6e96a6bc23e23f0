//! Mediaflow — offline FairPlay DRM workflow driver.
//!
//! Drives the remote media management API end to end: provision the encoding
//! transform, submit a job, wait for completion (event-driven with a polling
//! fallback), provision the FairPlay content key and streaming policies,
//! create a streaming locator, print the HLS playback URL, then clean up.

pub mod checkpoints;
pub mod cleanup;
pub mod monitor;
pub mod provision;
pub mod urls;
pub mod waiter;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
