//! Guaranteed best-effort cleanup of per-run resources.
//!
//! The guard is created before the workflow body runs and executed exactly
//! once afterwards, whatever the body's outcome. Every deletion is
//! attempted even when an earlier one fails; failures are collected and
//! logged. Durable resources (the transform and the streaming policy) are
//! never deleted.

use mediaflow_client::{ClientError, MediaService};
use mediaflow_core::RunNames;

/// Consume-once cleanup plan for a single run.
pub struct CleanupGuard {
    transform_name: String,
    content_key_policy_name: String,
    streaming_endpoint_name: String,
    names: RunNames,
    stop_endpoint: bool,
}

impl CleanupGuard {
    pub fn new(
        transform_name: &str,
        content_key_policy_name: &str,
        streaming_endpoint_name: &str,
        names: RunNames,
    ) -> Self {
        Self {
            transform_name: transform_name.to_string(),
            content_key_policy_name: content_key_policy_name.to_string(),
            streaming_endpoint_name: streaming_endpoint_name.to_string(),
            names,
            stop_endpoint: false,
        }
    }

    /// Record that this run started the streaming endpoint. Set at the point
    /// the start call is issued; cleanup then restores the endpoint to its
    /// prior stopped state.
    pub fn mark_endpoint_started(&mut self) {
        self.stop_endpoint = true;
    }

    pub fn endpoint_started(&self) -> bool {
        self.stop_endpoint
    }

    /// Run the cleanup. Consumes the guard so it cannot run twice.
    pub async fn execute<S: MediaService + ?Sized>(self, service: &S) -> Vec<ClientError> {
        println!("Cleaning up...");
        let mut failures = Vec::new();

        if let Err(e) = service.delete_job(&self.transform_name, &self.names.job).await {
            tracing::warn!(job = %self.names.job, error = %e, "failed to delete job");
            failures.push(e);
        }
        if let Err(e) = service.delete_asset(&self.names.output_asset).await {
            tracing::warn!(asset = %self.names.output_asset, error = %e, "failed to delete asset");
            failures.push(e);
        }
        if let Err(e) = service.delete_streaming_locator(&self.names.locator).await {
            tracing::warn!(locator = %self.names.locator, error = %e, "failed to delete streaming locator");
            failures.push(e);
        }
        if let Err(e) = service
            .delete_content_key_policy(&self.content_key_policy_name)
            .await
        {
            tracing::warn!(policy = %self.content_key_policy_name, error = %e, "failed to delete content key policy");
            failures.push(e);
        }

        if self.stop_endpoint {
            if let Err(e) = service
                .stop_streaming_endpoint(&self.streaming_endpoint_name)
                .await
            {
                tracing::warn!(endpoint = %self.streaming_endpoint_name, error = %e, "failed to stop streaming endpoint");
                failures.push(e);
            }
        } else {
            println!(
                "The endpoint '{}' is running. To halt further billing on the endpoint, please stop it.",
                self.streaming_endpoint_name
            );
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockService;

    fn names() -> RunNames {
        RunNames {
            job: "job-1".to_string(),
            output_asset: "output-1".to_string(),
            locator: "locator-1".to_string(),
        }
    }

    #[tokio::test]
    async fn deletes_per_run_resources_and_leaves_endpoint_alone() {
        let service = MockService::default();
        let guard = CleanupGuard::new("MyTransform", "FairPlayContentKeyPolicy", "default", names());

        let failures = guard.execute(&service).await;

        assert!(failures.is_empty());
        assert_eq!(service.count("delete_job:job-1"), 1);
        assert_eq!(service.count("delete_asset:output-1"), 1);
        assert_eq!(service.count("delete_streaming_locator:locator-1"), 1);
        assert_eq!(
            service.count("delete_content_key_policy:FairPlayContentKeyPolicy"),
            1
        );
        assert_eq!(service.count("stop_streaming_endpoint"), 0);
    }

    #[tokio::test]
    async fn stops_endpoint_only_when_marked_started() {
        let service = MockService::default();
        let mut guard =
            CleanupGuard::new("MyTransform", "FairPlayContentKeyPolicy", "default", names());
        assert!(!guard.endpoint_started());
        guard.mark_endpoint_started();
        assert!(guard.endpoint_started());

        let failures = guard.execute(&service).await;

        assert!(failures.is_empty());
        assert_eq!(service.count("stop_streaming_endpoint:default"), 1);
    }

    #[tokio::test]
    async fn one_failed_delete_does_not_stop_the_rest() {
        let service = MockService {
            failing_deletes: vec!["job"],
            ..Default::default()
        };
        let guard = CleanupGuard::new("MyTransform", "FairPlayContentKeyPolicy", "default", names());

        let failures = guard.execute(&service).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(service.count("delete_asset:"), 1);
        assert_eq!(service.count("delete_streaming_locator:"), 1);
        assert_eq!(service.count("delete_content_key_policy:"), 1);
    }

    #[tokio::test]
    async fn all_failures_are_collected() {
        let service = MockService {
            failing_deletes: vec!["job", "asset", "locator", "policy"],
            ..Default::default()
        };
        let guard = CleanupGuard::new("MyTransform", "FairPlayContentKeyPolicy", "default", names());

        let failures = guard.execute(&service).await;

        assert_eq!(failures.len(), 4);
    }
}
