//! HTTP client for the media management API.
//!
//! Provides [`MediaClient`], an authenticated handle over the management
//! REST surface: client-credential token acquisition, generic JSON request
//! helpers with typed error classification, and domain methods per resource
//! kind (see [`api`]). The [`MediaService`] trait is the seam the workflow
//! code consumes so tests can substitute a mock service.

pub mod api;
pub mod error;
pub mod models;
pub mod service;

pub use error::{ClientError, ClientResult};
pub use service::MediaService;

use mediaflow_core::Config;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Management API version sent with every request.
const API_VERSION: &str = "2023-01-01";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Request envelope for create/update calls: ARM bodies carry only
/// `properties`, never the resource name.
#[derive(Debug, Serialize)]
pub(crate) struct ResourceBody<T: Serialize> {
    pub properties: T,
}

/// Authenticated handle to the media management API.
///
/// Cheap to clone; safe to share across tasks. The bearer token is acquired
/// once at [`MediaClient::connect`], matching the single-run lifetime of the
/// workflow.
#[derive(Clone, Debug)]
pub struct MediaClient {
    client: Client,
    arm_endpoint: String,
    access_token: String,
    subscription_id: String,
    resource_group: String,
    account_name: String,
}

impl MediaClient {
    /// Authenticate with client credentials and return a connected client.
    ///
    /// Any failure of the token grant is reported as [`ClientError::Auth`];
    /// the kind is attached here, at the point of detection.
    pub async fn connect(config: &Config) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        let token_url = format!(
            "{}/{}/oauth2/token",
            config.aad_endpoint.trim_end_matches('/'),
            config.tenant_id
        );
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("resource", config.arm_endpoint.as_str()),
        ];

        let response = client.post(&token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Auth(format!(
                "token grant failed with status {status}: {message}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        tracing::debug!(account = %config.account_name, "authenticated with the management API");

        Ok(Self {
            client,
            arm_endpoint: config.arm_endpoint.trim_end_matches('/').to_string(),
            access_token: token.access_token,
            subscription_id: config.subscription_id.clone(),
            resource_group: config.resource_group.clone(),
            account_name: config.account_name.clone(),
        })
    }

    /// URL of a named resource under the media account.
    ///
    /// `collection` may be nested (e.g. `transforms/MyTransform/jobs`); each
    /// segment the caller interpolates must already be encoded.
    pub(crate) fn resource_url(&self, collection: &str, name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Media/mediaServices/{}/{}/{}?api-version={}",
            self.arm_endpoint,
            self.subscription_id,
            self.resource_group,
            self.account_name,
            collection,
            urlencoding::encode(name),
            API_VERSION
        )
    }

    /// URL of a POST action (`listPaths`, `start`, `stop`) on a resource.
    pub(crate) fn action_url(&self, collection: &str, name: &str, action: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Media/mediaServices/{}/{}/{}/{}?api-version={}",
            self.arm_endpoint,
            self.subscription_id,
            self.resource_group,
            self.account_name,
            collection,
            urlencoding::encode(name),
            action,
            API_VERSION
        )
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response, kind, name).await
    }

    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<T> {
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::decode(response, kind, name).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<T> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::decode(response, kind, name).await
    }

    /// POST action that returns no interesting body (endpoint start/stop).
    pub(crate) async fn post_empty(
        &self,
        url: &str,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<()> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::classify(status, Self::read_message(response).await, kind, name))
    }

    /// DELETE a resource. A 404 is treated as already-deleted and succeeds,
    /// so best-effort cleanup stays quiet about resources that never got
    /// created.
    pub(crate) async fn delete(
        &self,
        url: &str,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<()> {
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(Self::classify(status, Self::read_message(response).await, kind, name))
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        kind: &'static str,
        name: &str,
    ) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }
        Err(Self::classify(status, Self::read_message(response).await, kind, name))
    }

    async fn read_message(response: Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string())
    }

    fn classify(status: StatusCode, message: String, kind: &'static str, name: &str) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(message),
            StatusCode::NOT_FOUND => ClientError::NotFound {
                kind,
                name: name.to_string(),
            },
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
