//! Domain methods for the media management API client.
//!
//! Thin typed wrappers over the REST surface: one method per operation the
//! workflow issues. GET on a missing resource yields
//! [`ClientError::NotFound`](crate::ClientError::NotFound), which the
//! get-or-create provisioners treat as the create trigger.

use crate::models::{
    Asset, ContentKeyPolicy, ContentKeyPolicyProperties, Job, JobInput, JobOutput,
    ListPathsResponse, StreamingEndpoint, StreamingLocator, StreamingLocatorProperties,
    StreamingPolicy, StreamingPolicyProperties, Transform, TransformProperties,
};
use crate::{ClientResult, MediaClient, ResourceBody};

fn jobs_collection(transform_name: &str) -> String {
    format!("transforms/{}/jobs", urlencoding::encode(transform_name))
}

impl MediaClient {
    // -- Transforms ---------------------------------------------------------

    pub async fn get_transform(&self, name: &str) -> ClientResult<Transform> {
        let url = self.resource_url("transforms", name);
        self.get_json(&url, "Transform", name).await
    }

    pub async fn create_transform(
        &self,
        name: &str,
        properties: TransformProperties,
    ) -> ClientResult<Transform> {
        let url = self.resource_url("transforms", name);
        self.put_json(&url, &ResourceBody { properties }, "Transform", name)
            .await
    }

    // -- Assets -------------------------------------------------------------

    pub async fn get_asset(&self, name: &str) -> ClientResult<Asset> {
        let url = self.resource_url("assets", name);
        self.get_json(&url, "Asset", name).await
    }

    pub async fn create_asset(&self, name: &str) -> ClientResult<Asset> {
        let url = self.resource_url("assets", name);
        self.put_json(&url, &serde_json::json!({ "properties": {} }), "Asset", name)
            .await
    }

    pub async fn delete_asset(&self, name: &str) -> ClientResult<()> {
        let url = self.resource_url("assets", name);
        self.delete(&url, "Asset", name).await
    }

    // -- Jobs ---------------------------------------------------------------

    pub async fn get_job(&self, transform_name: &str, job_name: &str) -> ClientResult<Job> {
        let url = self.resource_url(&jobs_collection(transform_name), job_name);
        self.get_json(&url, "Job", job_name).await
    }

    pub async fn create_job(
        &self,
        transform_name: &str,
        job_name: &str,
        input: JobInput,
        outputs: Vec<JobOutput>,
    ) -> ClientResult<Job> {
        let url = self.resource_url(&jobs_collection(transform_name), job_name);
        let body = serde_json::json!({
            "properties": {
                "input": input,
                "outputs": outputs,
            }
        });
        self.put_json(&url, &body, "Job", job_name).await
    }

    pub async fn delete_job(&self, transform_name: &str, job_name: &str) -> ClientResult<()> {
        let url = self.resource_url(&jobs_collection(transform_name), job_name);
        self.delete(&url, "Job", job_name).await
    }

    // -- Content key policies -----------------------------------------------

    pub async fn get_content_key_policy(&self, name: &str) -> ClientResult<ContentKeyPolicy> {
        let url = self.resource_url("contentKeyPolicies", name);
        self.get_json(&url, "ContentKeyPolicy", name).await
    }

    pub async fn create_content_key_policy(
        &self,
        name: &str,
        properties: ContentKeyPolicyProperties,
    ) -> ClientResult<ContentKeyPolicy> {
        let url = self.resource_url("contentKeyPolicies", name);
        self.put_json(&url, &ResourceBody { properties }, "ContentKeyPolicy", name)
            .await
    }

    pub async fn delete_content_key_policy(&self, name: &str) -> ClientResult<()> {
        let url = self.resource_url("contentKeyPolicies", name);
        self.delete(&url, "ContentKeyPolicy", name).await
    }

    // -- Streaming policies -------------------------------------------------

    pub async fn get_streaming_policy(&self, name: &str) -> ClientResult<StreamingPolicy> {
        let url = self.resource_url("streamingPolicies", name);
        self.get_json(&url, "StreamingPolicy", name).await
    }

    pub async fn create_streaming_policy(
        &self,
        name: &str,
        properties: StreamingPolicyProperties,
    ) -> ClientResult<StreamingPolicy> {
        let url = self.resource_url("streamingPolicies", name);
        self.put_json(&url, &ResourceBody { properties }, "StreamingPolicy", name)
            .await
    }

    // -- Streaming locators -------------------------------------------------

    pub async fn create_streaming_locator(
        &self,
        name: &str,
        properties: StreamingLocatorProperties,
    ) -> ClientResult<StreamingLocator> {
        let url = self.resource_url("streamingLocators", name);
        self.put_json(&url, &ResourceBody { properties }, "StreamingLocator", name)
            .await
    }

    pub async fn list_paths(&self, locator_name: &str) -> ClientResult<ListPathsResponse> {
        let url = self.action_url("streamingLocators", locator_name, "listPaths");
        self.post_json(&url, "StreamingLocator", locator_name).await
    }

    pub async fn delete_streaming_locator(&self, name: &str) -> ClientResult<()> {
        let url = self.resource_url("streamingLocators", name);
        self.delete(&url, "StreamingLocator", name).await
    }

    // -- Streaming endpoints ------------------------------------------------

    pub async fn get_streaming_endpoint(&self, name: &str) -> ClientResult<StreamingEndpoint> {
        let url = self.resource_url("streamingEndpoints", name);
        self.get_json(&url, "StreamingEndpoint", name).await
    }

    pub async fn start_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        let url = self.action_url("streamingEndpoints", name, "start");
        self.post_empty(&url, "StreamingEndpoint", name).await
    }

    pub async fn stop_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        let url = self.action_url("streamingEndpoints", name, "stop");
        self.post_empty(&url, "StreamingEndpoint", name).await
    }
}
