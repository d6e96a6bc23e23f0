//! Typed models for the media management API resources.
//!
//! The wire format is ARM-style JSON: a resource envelope with `name` and a
//! camelCase `properties` object; polymorphic members are discriminated by
//! an `@odata.type` tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    pub name: String,
    pub properties: TransformProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformProperties {
    pub outputs: Vec<TransformOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOutput {
    pub preset: Preset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum Preset {
    #[serde(rename = "#Microsoft.Media.BuiltInStandardEncoderPreset")]
    #[serde(rename_all = "camelCase")]
    BuiltInStandardEncoder { preset_name: EncoderNamedPreset },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderNamedPreset {
    ContentAwareEncoding,
    AdaptiveStreaming,
    H264SingleBitrate720p,
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub properties: AssetProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub properties: JobProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProperties {
    #[serde(default)]
    pub state: JobState,
    pub input: JobInput,
    pub outputs: Vec<JobOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    #[default]
    Queued,
    Scheduled,
    Processing,
    Finished,
    Error,
    Canceled,
    Canceling,
}

impl JobState {
    /// Terminal states end the completion wait.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Finished | JobState::Error | JobState::Canceled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Queued => "Queued",
            JobState::Scheduled => "Scheduled",
            JobState::Processing => "Processing",
            JobState::Finished => "Finished",
            JobState::Error => "Error",
            JobState::Canceled => "Canceled",
            JobState::Canceling => "Canceling",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum JobInput {
    #[serde(rename = "#Microsoft.Media.JobInputHttp")]
    #[serde(rename_all = "camelCase")]
    Http { base_uri: String, files: Vec<String> },
}

/// Job output bound to an asset. `state` and `progress` are service-set and
/// absent in create requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutput {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub asset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
}

impl JobOutput {
    pub fn asset(asset_name: &str) -> Self {
        Self {
            odata_type: "#Microsoft.Media.JobOutputAsset".to_string(),
            asset_name: asset_name.to_string(),
            state: None,
            progress: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Content key policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentKeyPolicy {
    pub name: String,
    pub properties: ContentKeyPolicyProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentKeyPolicyProperties {
    pub options: Vec<ContentKeyPolicyOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentKeyPolicyOption {
    pub configuration: ContentKeyPolicyConfiguration,
    pub restriction: ContentKeyPolicyRestriction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum ContentKeyPolicyRestriction {
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyOpenRestriction")]
    Open,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum ContentKeyPolicyConfiguration {
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyFairPlayConfiguration")]
    #[serde(rename_all = "camelCase")]
    FairPlay {
        /// Application secret key, base64.
        ask: String,
        /// PKCS#12 certificate with private key, base64.
        fair_play_pfx: String,
        fair_play_pfx_password: String,
        rental_and_lease_key_type: FairPlayRentalAndLeaseKeyType,
        rental_duration: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offline_rental_configuration: Option<FairPlayOfflineRentalConfiguration>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FairPlayRentalAndLeaseKeyType {
    Undefined,
    DualExpiry,
    PersistentUnlimited,
    PersistentLimited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairPlayOfflineRentalConfiguration {
    pub storage_duration_seconds: i64,
    pub playback_duration_seconds: i64,
}

// ---------------------------------------------------------------------------
// Streaming policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingPolicy {
    pub name: String,
    pub properties: StreamingPolicyProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPolicyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content_key_policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_encryption_cbcs: Option<CommonEncryptionCbcs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEncryptionCbcs {
    pub enabled_protocols: EnabledProtocols,
    pub content_keys: StreamingPolicyContentKeys,
    pub drm: CbcsDrmConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnabledProtocols {
    pub hls: bool,
    pub dash: bool,
    pub smooth_streaming: bool,
    pub download: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPolicyContentKeys {
    pub default_key: DefaultKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultKey {
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbcsDrmConfiguration {
    pub fair_play: StreamingPolicyFairPlayConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPolicyFairPlayConfiguration {
    pub allow_persistent_license: bool,
}

// ---------------------------------------------------------------------------
// Streaming locator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingLocator {
    pub name: String,
    pub properties: StreamingLocatorProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingLocatorProperties {
    pub asset_name: String,
    pub streaming_policy_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content_key_policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_locator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPathsResponse {
    #[serde(default)]
    pub streaming_paths: Vec<StreamingPath>,
    #[serde(default)]
    pub download_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPath {
    pub streaming_protocol: StreamingProtocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_scheme: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamingProtocol {
    Hls,
    Dash,
    SmoothStreaming,
    Download,
}

// ---------------------------------------------------------------------------
// Streaming endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingEndpoint {
    pub name: String,
    pub properties: StreamingEndpointProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingEndpointProperties {
    pub resource_state: StreamingEndpointResourceState,
    pub host_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamingEndpointResourceState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Deleting,
    Scaling,
}
