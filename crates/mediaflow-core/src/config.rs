//! Configuration module
//!
//! All settings come from environment variables (a local `.env` file is
//! honored via dotenvy). Required variables produce an error naming the
//! missing variable; endpoints fall back to the public cloud defaults.

use std::env;

const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_AAD_ENDPOINT: &str = "https://login.microsoftonline.com";
const DEFAULT_STREAMING_ENDPOINT_NAME: &str = "default";

/// Runtime configuration for the workflow driver.
#[derive(Clone, Debug)]
pub struct Config {
    // Client-credential auth
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    // Resource scope
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    // Service endpoints
    pub arm_endpoint: String,
    pub aad_endpoint: String,
    // Event checkpoint store (blob container). Optional: without it the
    // event monitor skips checkpoint clearing.
    pub storage_account_name: Option<String>,
    pub storage_account_key: Option<String>,
    pub storage_container_name: Option<String>,
    // Job event feed. Absent means the waiter goes straight to polling.
    pub event_stream_url: Option<String>,
    pub event_stream_name: Option<String>,
    // FairPlay license template inputs
    pub fairplay_ask_hex: String,
    pub fairplay_pfx_path: String,
    pub fairplay_pfx_password: String,
    /// Pre-existing streaming endpoint that serves playback.
    pub streaming_endpoint_name: String,
}

fn required(name: &'static str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} must be set", name))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            tenant_id: required("AZURE_TENANT_ID")?,
            client_id: required("AZURE_CLIENT_ID")?,
            client_secret: required("AZURE_CLIENT_SECRET")?,
            subscription_id: required("AZURE_SUBSCRIPTION_ID")?,
            resource_group: required("RESOURCE_GROUP")?,
            account_name: required("ACCOUNT_NAME")?,
            arm_endpoint: env::var("ARM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ARM_ENDPOINT.to_string()),
            aad_endpoint: env::var("AAD_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_AAD_ENDPOINT.to_string()),
            storage_account_name: env::var("STORAGE_ACCOUNT_NAME").ok(),
            storage_account_key: env::var("STORAGE_ACCOUNT_KEY").ok(),
            storage_container_name: env::var("STORAGE_CONTAINER_NAME").ok(),
            event_stream_url: env::var("EVENT_STREAM_URL").ok(),
            event_stream_name: env::var("EVENT_STREAM_NAME").ok(),
            fairplay_ask_hex: required("FAIRPLAY_ASK_HEX")?,
            fairplay_pfx_path: required("FAIRPLAY_PFX_PATH")?,
            fairplay_pfx_password: required("FAIRPLAY_PFX_PASSWORD")?,
            streaming_endpoint_name: env::var("STREAMING_ENDPOINT_NAME")
                .unwrap_or_else(|_| DEFAULT_STREAMING_ENDPOINT_NAME.to_string()),
        })
    }

    /// True when enough eventing settings are present to try the
    /// event-driven wait before falling back to polling.
    pub fn eventing_configured(&self) -> bool {
        self.event_stream_url.is_some()
    }
}
