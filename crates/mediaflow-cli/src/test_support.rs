//! Configurable mock of the management API for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mediaflow_client::models::{
    Asset, AssetProperties, ContentKeyPolicy, ContentKeyPolicyProperties, Job, JobInput, JobOutput,
    JobProperties, JobState, ListPathsResponse, StreamingEndpoint, StreamingEndpointProperties,
    StreamingEndpointResourceState, StreamingLocator, StreamingLocatorProperties, StreamingPath,
    StreamingPolicy, StreamingPolicyProperties, Transform, TransformProperties,
};
use mediaflow_client::{ClientError, ClientResult, MediaService};

/// How a mocked fetch-by-name behaves.
pub enum Fetch {
    Exists,
    Missing,
    Fail(u16),
}

pub struct MockService {
    pub transform_fetch: Fetch,
    pub asset_fetch: Fetch,
    pub content_key_policy_fetch: Fetch,
    pub streaming_policy_fetch: Fetch,
    /// Successive `get_job` results; the last entry repeats once drained.
    pub job_states: Mutex<VecDeque<JobState>>,
    pub endpoint_fetch: Fetch,
    pub endpoint_state: StreamingEndpointResourceState,
    pub streaming_paths: Vec<StreamingPath>,
    /// Resource kinds whose delete calls fail ("job", "asset", "locator", "policy").
    pub failing_deletes: Vec<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            transform_fetch: Fetch::Exists,
            asset_fetch: Fetch::Missing,
            content_key_policy_fetch: Fetch::Exists,
            streaming_policy_fetch: Fetch::Exists,
            job_states: Mutex::new(VecDeque::from([JobState::Finished])),
            endpoint_fetch: Fetch::Exists,
            endpoint_state: StreamingEndpointResourceState::Running,
            streaming_paths: vec![StreamingPath {
                streaming_protocol: mediaflow_client::models::StreamingProtocol::Hls,
                encryption_scheme: Some("CommonEncryptionCbcs".to_string()),
                paths: vec!["/asset/manifest(format=m3u8)".to_string()],
            }],
            failing_deletes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockService {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn fetch<T>(
        &self,
        behavior: &Fetch,
        kind: &'static str,
        name: &str,
        make: impl FnOnce() -> T,
    ) -> ClientResult<T> {
        match behavior {
            Fetch::Exists => Ok(make()),
            Fetch::Missing => Err(ClientError::NotFound {
                kind,
                name: name.to_string(),
            }),
            Fetch::Fail(status) => Err(ClientError::Api {
                status: *status,
                message: "injected failure".to_string(),
            }),
        }
    }

    fn delete_result(&self, kind: &'static str) -> ClientResult<()> {
        if self.failing_deletes.contains(&kind) {
            Err(ClientError::Api {
                status: 500,
                message: format!("injected {kind} delete failure"),
            })
        } else {
            Ok(())
        }
    }

    fn next_job_state(&self) -> JobState {
        let mut states = self.job_states.lock().unwrap();
        if states.len() > 1 {
            states.pop_front().unwrap()
        } else {
            *states.front().unwrap_or(&JobState::Finished)
        }
    }
}

pub fn sample_transform(name: &str) -> Transform {
    Transform {
        name: name.to_string(),
        properties: TransformProperties {
            outputs: vec![],
            description: None,
        },
    }
}

pub fn sample_job(name: &str, state: JobState) -> Job {
    let output_state = match state {
        JobState::Queued | JobState::Scheduled => JobState::Queued,
        other => other,
    };
    Job {
        name: name.to_string(),
        properties: JobProperties {
            state,
            input: JobInput::Http {
                base_uri: "https://example.com/media/".to_string(),
                files: vec!["input.mp4".to_string()],
            },
            outputs: vec![JobOutput {
                odata_type: "#Microsoft.Media.JobOutputAsset".to_string(),
                asset_name: "output-asset".to_string(),
                state: Some(output_state),
                progress: (output_state == JobState::Processing).then_some(50),
            }],
            created: None,
            last_modified: None,
        },
    }
}

pub fn sample_content_key_policy(name: &str) -> ContentKeyPolicy {
    ContentKeyPolicy {
        name: name.to_string(),
        properties: ContentKeyPolicyProperties {
            options: vec![],
            description: None,
        },
    }
}

pub fn sample_streaming_policy(name: &str) -> StreamingPolicy {
    StreamingPolicy {
        name: name.to_string(),
        properties: StreamingPolicyProperties {
            default_content_key_policy_name: None,
            common_encryption_cbcs: None,
        },
    }
}

#[async_trait]
impl MediaService for MockService {
    async fn get_transform(&self, name: &str) -> ClientResult<Transform> {
        self.record("get_transform");
        self.fetch(&self.transform_fetch, "Transform", name, || {
            sample_transform(name)
        })
    }

    async fn create_transform(
        &self,
        name: &str,
        _properties: TransformProperties,
    ) -> ClientResult<Transform> {
        self.record("create_transform");
        Ok(sample_transform(name))
    }

    async fn get_asset(&self, name: &str) -> ClientResult<Asset> {
        self.record("get_asset");
        self.fetch(&self.asset_fetch, "Asset", name, || Asset {
            name: name.to_string(),
            properties: AssetProperties::default(),
        })
    }

    async fn create_asset(&self, name: &str) -> ClientResult<Asset> {
        self.record("create_asset");
        Ok(Asset {
            name: name.to_string(),
            properties: AssetProperties::default(),
        })
    }

    async fn delete_asset(&self, name: &str) -> ClientResult<()> {
        self.record(format!("delete_asset:{name}"));
        self.delete_result("asset")
    }

    async fn get_job(&self, _transform_name: &str, job_name: &str) -> ClientResult<Job> {
        self.record("get_job");
        Ok(sample_job(job_name, self.next_job_state()))
    }

    async fn create_job(
        &self,
        _transform_name: &str,
        job_name: &str,
        _input: JobInput,
        _outputs: Vec<JobOutput>,
    ) -> ClientResult<Job> {
        self.record("create_job");
        Ok(sample_job(job_name, JobState::Queued))
    }

    async fn delete_job(&self, _transform_name: &str, job_name: &str) -> ClientResult<()> {
        self.record(format!("delete_job:{job_name}"));
        self.delete_result("job")
    }

    async fn get_content_key_policy(&self, name: &str) -> ClientResult<ContentKeyPolicy> {
        self.record("get_content_key_policy");
        self.fetch(&self.content_key_policy_fetch, "ContentKeyPolicy", name, || {
            sample_content_key_policy(name)
        })
    }

    async fn create_content_key_policy(
        &self,
        name: &str,
        _properties: ContentKeyPolicyProperties,
    ) -> ClientResult<ContentKeyPolicy> {
        self.record("create_content_key_policy");
        Ok(sample_content_key_policy(name))
    }

    async fn delete_content_key_policy(&self, name: &str) -> ClientResult<()> {
        self.record(format!("delete_content_key_policy:{name}"));
        self.delete_result("policy")
    }

    async fn get_streaming_policy(&self, name: &str) -> ClientResult<StreamingPolicy> {
        self.record("get_streaming_policy");
        self.fetch(&self.streaming_policy_fetch, "StreamingPolicy", name, || {
            sample_streaming_policy(name)
        })
    }

    async fn create_streaming_policy(
        &self,
        name: &str,
        _properties: StreamingPolicyProperties,
    ) -> ClientResult<StreamingPolicy> {
        self.record("create_streaming_policy");
        Ok(sample_streaming_policy(name))
    }

    async fn create_streaming_locator(
        &self,
        name: &str,
        properties: StreamingLocatorProperties,
    ) -> ClientResult<StreamingLocator> {
        self.record("create_streaming_locator");
        Ok(StreamingLocator {
            name: name.to_string(),
            properties,
        })
    }

    async fn list_paths(&self, _locator_name: &str) -> ClientResult<ListPathsResponse> {
        self.record("list_paths");
        Ok(ListPathsResponse {
            streaming_paths: self.streaming_paths.clone(),
            download_paths: vec![],
        })
    }

    async fn delete_streaming_locator(&self, name: &str) -> ClientResult<()> {
        self.record(format!("delete_streaming_locator:{name}"));
        self.delete_result("locator")
    }

    async fn get_streaming_endpoint(&self, name: &str) -> ClientResult<StreamingEndpoint> {
        self.record("get_streaming_endpoint");
        let state = self.endpoint_state;
        self.fetch(&self.endpoint_fetch, "StreamingEndpoint", name, || {
            StreamingEndpoint {
                name: name.to_string(),
                properties: StreamingEndpointProperties {
                    resource_state: state,
                    host_name: "endpoint.streaming.example.net".to_string(),
                },
            }
        })
    }

    async fn start_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        self.record(format!("start_streaming_endpoint:{name}"));
        Ok(())
    }

    async fn stop_streaming_endpoint(&self, name: &str) -> ClientResult<()> {
        self.record(format!("stop_streaming_endpoint:{name}"));
        Ok(())
    }
}
