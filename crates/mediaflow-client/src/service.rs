//! Service abstraction trait
//!
//! The workflow crate talks to the management API through this trait rather
//! than the concrete client, so tests can substitute a mock service. The
//! surface is exactly the set of operations the workflow issues.

use async_trait::async_trait;

use crate::models::{
    Asset, ContentKeyPolicy, ContentKeyPolicyProperties, Job, JobInput, JobOutput,
    ListPathsResponse, StreamingEndpoint, StreamingLocator, StreamingLocatorProperties,
    StreamingPolicy, StreamingPolicyProperties, Transform, TransformProperties,
};
use crate::{ClientResult, MediaClient};

#[async_trait]
pub trait MediaService: Send + Sync {
    async fn get_transform(&self, name: &str) -> ClientResult<Transform>;
    async fn create_transform(
        &self,
        name: &str,
        properties: TransformProperties,
    ) -> ClientResult<Transform>;

    async fn get_asset(&self, name: &str) -> ClientResult<Asset>;
    async fn create_asset(&self, name: &str) -> ClientResult<Asset>;
    async fn delete_asset(&self, name: &str) -> ClientResult<()>;

    async fn get_job(&self, transform_name: &str, job_name: &str) -> ClientResult<Job>;
    async fn create_job(
        &self,
        transform_name: &str,
        job_name: &str,
        input: JobInput,
        outputs: Vec<JobOutput>,
    ) -> ClientResult<Job>;
    async fn delete_job(&self, transform_name: &str, job_name: &str) -> ClientResult<()>;

    async fn get_content_key_policy(&self, name: &str) -> ClientResult<ContentKeyPolicy>;
    async fn create_content_key_policy(
        &self,
        name: &str,
        properties: ContentKeyPolicyProperties,
    ) -> ClientResult<ContentKeyPolicy>;
    async fn delete_content_key_policy(&self, name: &str) -> ClientResult<()>;

    async fn get_streaming_policy(&self, name: &str) -> ClientResult<StreamingPolicy>;
    async fn create_streaming_policy(
        &self,
        name: &str,
        properties: StreamingPolicyProperties,
    ) -> ClientResult<StreamingPolicy>;

    async fn create_streaming_locator(
        &self,
        name: &str,
        properties: StreamingLocatorProperties,
    ) -> ClientResult<StreamingLocator>;
    async fn list_paths(&self, locator_name: &str) -> ClientResult<ListPathsResponse>;
    async fn delete_streaming_locator(&self, name: &str) -> ClientResult<()>;

    async fn get_streaming_endpoint(&self, name: &str) -> ClientResult<StreamingEndpoint>;
    async fn start_streaming_endpoint(&self, name: &str) -> ClientResult<()>;
    async fn stop_streaming_endpoint(&self, name: &str) -> ClientResult<()>;
}

#[async_trait]
impl MediaService for MediaClient {
    async fn get_transform(&self, name: &str) -> ClientResult<Transform> {
        MediaClient::get_transform(self, name).await
    }

    async fn create_transform(
        &self,
        name: &str,
        properties: TransformProperties,
    ) -> ClientResult<Transform> {
        MediaClient::create_transform(self, name, properties).await
    }

    async fn get_asset(&self, name: &str) -> ClientResult<Asset> {
        MediaClient::get_asset(self, name).await
    }

    async fn create_asset(&self, name: &str) -> ClientResult<Asset> {
        MediaClient::create_asset(self, name).await
    }

    async fn delete_asset(&self, name: &str) -> ClientResult<()> {
        MediaClient::delete_asset(self, name).await
    }

    async fn get_job(&self, transform_name: &str, job_name: &str) -> ClientResult<Job> {
        MediaClient::get_job(self, transform_name, job_name).await
    }

    async fn create_job(
        &self,
        transform_name: &str,
        job_name: &str,
        input: JobInput,
        outputs: Vec<JobOutput>,
    ) -> ClientResult<Job> {
        MediaClient::create_job(self, transform_name, job_name, input, outputs).await
    }

    async fn delete_job(&self, transform_name: &str, job_name: &str) -> ClientResult<()> {
        MediaClient::delete_job(self, transform_name, job_name).await
    }

    async fn get_content_key_policy(&self, name: &str) -> ClientResult<ContentKeyPolicy> {
        MediaClient::get_content_key_policy(self, name).await
    }

    async fn create_content_key_policy(
        &self,
        name: &str,
        properties: ContentKeyPolicyProperties,
    ) -> ClientResult<ContentKeyPolicy> {
        MediaClient::create_content_key_policy(self, name, properties).await
    }

    async fn delete_content_key_policy(&self, name: &str) -> ClientResult<()> {
        MediaClient::delete_content_key_policy(self, name).await
    }

    async fn get_streaming_policy(&self, name: &str) -> ClientResult<StreamingPolicy> {
        MediaClient::get_streaming_policy(self, name).await
    }

    async fn create_streaming_policy(
        &self,
        name: &str,
        properties: StreamingPolicyProperties,
    ) -> ClientResult<StreamingPolicy> {
        MediaClient::create_streaming_policy(self, name, properties).await
    }

    async fn create_streaming_locator(
        &self,
        name: &str,
        properties: StreamingLocatorProperties,
    ) -> ClientResult<StreamingLocator> {
        MediaClient::create_streaming_locator(self, name, properties).await
    }

    async fn list_paths(&self, locator_name: &str) -> ClientResult<ListPathsResponse> {
        MediaClient::list_paths(self, locator_name).await
    }

    async fn delete_streaming_locator(&self, name: &str) -> ClientResult<()> {
        MediaClient::delete_streaming_locator(self, name).await
    }

    async fn get_streaming_endpoint(&self, name: &str) -> ClientResult<StreamingEndpoint> {
        MediaClient::get_streaming_endpoint(self, name).await
    }

    async fn start_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        MediaClient::start_streaming_endpoint(self, name).await
    }

    async fn stop_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        MediaClient::stop_streaming_endpoint(self, name).await
    }
}
