//! Idempotent get-or-create provisioners for fixed-named resources.
//!
//! Each provisioner fetches by name first and creates only on a
//! not-found-class error, so repeated runs reuse the existing resource and
//! never issue a redundant create. Any other fetch error propagates
//! unchanged.

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use mediaflow_client::models::{
    Asset, CbcsDrmConfiguration, CommonEncryptionCbcs, ContentKeyPolicy,
    ContentKeyPolicyConfiguration, ContentKeyPolicyOption, ContentKeyPolicyProperties,
    ContentKeyPolicyRestriction, DefaultKey, EnabledProtocols, EncoderNamedPreset,
    FairPlayOfflineRentalConfiguration, FairPlayRentalAndLeaseKeyType, Preset, StreamingPolicy,
    StreamingPolicyContentKeys, StreamingPolicyFairPlayConfiguration, StreamingPolicyProperties,
    Transform, TransformOutput, TransformProperties,
};
use mediaflow_client::{ClientResult, MediaService};
use mediaflow_core::constants::{
    CBCS_DEFAULT_KEY_LABEL, OFFLINE_RENTAL_PLAYBACK_SECONDS, OFFLINE_RENTAL_STORAGE_SECONDS,
};
use mediaflow_core::Config;

/// Ensure the encoding transform exists. One-time setup: the transform is
/// reused across runs and never deleted.
pub async fn get_or_create_transform<S: MediaService + ?Sized>(
    service: &S,
    name: &str,
) -> ClientResult<Transform> {
    match service.get_transform(name).await {
        Ok(transform) => Ok(transform),
        Err(e) if e.is_not_found() => {
            println!("Creating a transform...");
            let properties = TransformProperties {
                outputs: vec![TransformOutput {
                    preset: Preset::BuiltInStandardEncoder {
                        preset_name: EncoderNamedPreset::ContentAwareEncoding,
                    },
                }],
                description: None,
            };
            let transform = service.create_transform(name, properties).await?;
            println!("Transform created");
            Ok(transform)
        }
        Err(e) => Err(e),
    }
}

/// Ensure the FairPlay content key policy exists.
pub async fn get_or_create_content_key_policy<S: MediaService + ?Sized>(
    service: &S,
    config: &Config,
    name: &str,
) -> anyhow::Result<ContentKeyPolicy> {
    match service.get_content_key_policy(name).await {
        Ok(policy) => Ok(policy),
        Err(e) if e.is_not_found() => {
            println!("Creating a content key policy...");
            let properties = fairplay_policy_properties(config).await?;
            let policy = service
                .create_content_key_policy(name, properties)
                .await
                .context("creating the content key policy")?;
            Ok(policy)
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the FairPlay license template from the configured ASK and PFX.
///
/// Dual-expiry offline rental: the license can be stored for
/// [`OFFLINE_RENTAL_STORAGE_SECONDS`] and played for
/// [`OFFLINE_RENTAL_PLAYBACK_SECONDS`] after first use.
pub async fn fairplay_policy_properties(
    config: &Config,
) -> anyhow::Result<ContentKeyPolicyProperties> {
    let ask = hex::decode(&config.fairplay_ask_hex)
        .context("FAIRPLAY_ASK_HEX is not a valid hex string")?;

    let pfx = tokio::fs::read(&config.fairplay_pfx_path)
        .await
        .with_context(|| format!("reading FairPlay PFX at {}", config.fairplay_pfx_path))?;

    Ok(ContentKeyPolicyProperties {
        options: vec![ContentKeyPolicyOption {
            configuration: ContentKeyPolicyConfiguration::FairPlay {
                ask: BASE64.encode(ask),
                fair_play_pfx: BASE64.encode(pfx),
                fair_play_pfx_password: config.fairplay_pfx_password.clone(),
                rental_and_lease_key_type: FairPlayRentalAndLeaseKeyType::DualExpiry,
                rental_duration: 0,
                offline_rental_configuration: Some(FairPlayOfflineRentalConfiguration {
                    storage_duration_seconds: OFFLINE_RENTAL_STORAGE_SECONDS,
                    playback_duration_seconds: OFFLINE_RENTAL_PLAYBACK_SECONDS,
                }),
            },
            restriction: ContentKeyPolicyRestriction::Open,
            name: None,
        }],
        description: None,
    })
}

/// Ensure the custom CBCS streaming policy exists. HLS and Dash are both
/// enabled: HLS-CMAF-CBCS playlists reference DASH-CBCS fragments.
pub async fn get_or_create_streaming_policy<S: MediaService + ?Sized>(
    service: &S,
    name: &str,
) -> ClientResult<StreamingPolicy> {
    match service.get_streaming_policy(name).await {
        Ok(policy) => Ok(policy),
        Err(e) if e.is_not_found() => {
            let properties = StreamingPolicyProperties {
                default_content_key_policy_name: None,
                common_encryption_cbcs: Some(CommonEncryptionCbcs {
                    enabled_protocols: EnabledProtocols {
                        hls: true,
                        dash: true,
                        smooth_streaming: false,
                        download: false,
                    },
                    content_keys: StreamingPolicyContentKeys {
                        default_key: DefaultKey {
                            label: CBCS_DEFAULT_KEY_LABEL.to_string(),
                        },
                    },
                    drm: CbcsDrmConfiguration {
                        fair_play: StreamingPolicyFairPlayConfiguration {
                            allow_persistent_license: true,
                        },
                    },
                }),
            };
            service.create_streaming_policy(name, properties).await
        }
        Err(e) => Err(e),
    }
}

/// Get-or-overwrite helper for output assets.
///
/// The main workflow creates its per-run asset unconditionally (the name is
/// unique); this variant is for callers reusing a fixed asset name, warning
/// that existing content will be overwritten.
pub async fn ensure_output_asset<S: MediaService + ?Sized>(
    service: &S,
    name: &str,
) -> ClientResult<Asset> {
    match service.get_asset(name).await {
        Ok(existing) => {
            tracing::warn!(asset = name, "asset already exists and will be overwritten");
            Ok(existing)
        }
        Err(e) if e.is_not_found() => {
            println!("Creating an output asset...");
            service.create_asset(name).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fetch, MockService};
    use mediaflow_client::ClientError;

    #[tokio::test]
    async fn existing_transform_is_reused_without_create() {
        let service = MockService::default();

        let transform = get_or_create_transform(&service, "MyTransform").await.unwrap();

        assert_eq!(transform.name, "MyTransform");
        assert_eq!(service.count("create_transform"), 0);
    }

    #[tokio::test]
    async fn missing_transform_triggers_exactly_one_create() {
        let service = MockService {
            transform_fetch: Fetch::Missing,
            ..Default::default()
        };

        let transform = get_or_create_transform(&service, "MyTransform").await.unwrap();

        assert_eq!(transform.name, "MyTransform");
        assert_eq!(service.count("create_transform"), 1);
    }

    #[tokio::test]
    async fn non_not_found_fetch_error_propagates_without_create() {
        let service = MockService {
            transform_fetch: Fetch::Fail(500),
            ..Default::default()
        };

        let err = get_or_create_transform(&service, "MyTransform").await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        assert_eq!(service.count("create_transform"), 0);
    }

    #[tokio::test]
    async fn streaming_policy_follows_the_same_pattern() {
        let service = MockService {
            streaming_policy_fetch: Fetch::Missing,
            ..Default::default()
        };

        get_or_create_streaming_policy(&service, "FairPlayCustomStreamingPolicyName")
            .await
            .unwrap();

        assert_eq!(service.count("create_streaming_policy"), 1);

        // Second run: the policy now "exists".
        let service = MockService::default();
        get_or_create_streaming_policy(&service, "FairPlayCustomStreamingPolicyName")
            .await
            .unwrap();
        assert_eq!(service.count("create_streaming_policy"), 0);
    }

    #[tokio::test]
    async fn content_key_policy_created_from_pfx_when_missing() {
        use std::io::Write as _;

        let mut pfx = tempfile::NamedTempFile::new().unwrap();
        pfx.write_all(b"fake pkcs12 bytes").unwrap();

        let config = test_config(pfx.path().to_str().unwrap());
        let service = MockService {
            content_key_policy_fetch: Fetch::Missing,
            ..Default::default()
        };

        get_or_create_content_key_policy(&service, &config, "FairPlayContentKeyPolicy")
            .await
            .unwrap();

        assert_eq!(service.count("create_content_key_policy"), 1);
    }

    #[tokio::test]
    async fn invalid_ask_hex_is_rejected() {
        let mut config = test_config("/nonexistent.pfx");
        config.fairplay_ask_hex = "not-hex".to_string();

        let err = fairplay_policy_properties(&config).await.unwrap_err();
        assert!(err.to_string().contains("FAIRPLAY_ASK_HEX"));
    }

    #[tokio::test]
    async fn existing_asset_is_returned_with_overwrite_warning() {
        let service = MockService {
            asset_fetch: Fetch::Exists,
            ..Default::default()
        };

        let asset = ensure_output_asset(&service, "fixed-output").await.unwrap();

        assert_eq!(asset.name, "fixed-output");
        assert_eq!(service.count("create_asset"), 0);
    }

    fn test_config(pfx_path: &str) -> Config {
        Config {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            subscription_id: "sub".to_string(),
            resource_group: "rg".to_string(),
            account_name: "account".to_string(),
            arm_endpoint: "https://management.example.net".to_string(),
            aad_endpoint: "https://login.example.net".to_string(),
            storage_account_name: None,
            storage_account_key: None,
            storage_container_name: None,
            event_stream_url: None,
            event_stream_name: None,
            fairplay_ask_hex: "0123456789abcdef0123456789abcdef".to_string(),
            fairplay_pfx_path: pfx_path.to_string(),
            fairplay_pfx_password: "pfx-password".to_string(),
            streaming_endpoint_name: "default".to_string(),
        }
    }
}
