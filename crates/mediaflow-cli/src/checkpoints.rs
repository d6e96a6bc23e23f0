//! Event checkpoint store maintenance.
//!
//! The job event feed leases its checkpoints from a blob container. Before a
//! monitoring session starts, the container is cleared so stale checkpoints
//! from earlier sessions cannot replay old events. Deletion is best-effort:
//! a failed blob delete is logged and the rest are still attempted.

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use regex::Regex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const STORAGE_API_VERSION: &str = "2021-08-06";

/// Blob container holding the event feed's checkpoints, accessed with
/// shared-key authorization.
#[derive(Clone, Debug)]
pub struct CheckpointStore {
    account: String,
    /// Base64-encoded account key.
    key: String,
    container: String,
    client: reqwest::Client,
}

impl CheckpointStore {
    pub fn new(account: String, key: String, container: String) -> Self {
        Self {
            account,
            key,
            container,
            client: reqwest::Client::new(),
        }
    }

    fn container_url(&self) -> String {
        format!(
            "https://{}.blob.core.windows.net/{}",
            self.account, self.container
        )
    }

    /// Delete every blob in the container.
    pub async fn clear(&self) -> anyhow::Result<()> {
        let names = self.list_blobs().await?;
        tracing::info!(
            container = %self.container,
            count = names.len(),
            "clearing event checkpoint container"
        );
        for name in names {
            if let Err(e) = self.delete_blob(&name).await {
                tracing::warn!(blob = %name, error = %e, "failed to delete checkpoint blob");
            }
        }
        Ok(())
    }

    async fn list_blobs(&self) -> anyhow::Result<Vec<String>> {
        let date = http_date();
        let resource = format!("/{}/{}", self.account, self.container);
        let to_sign = string_to_sign(
            "GET",
            &date,
            &resource,
            &[("comp", "list"), ("restype", "container")],
        );
        let authorization = self.authorization(&to_sign)?;

        let url = format!("{}?restype=container&comp=list", self.container_url());
        let body = self
            .client
            .get(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("Authorization", authorization)
            .send()
            .await
            .context("listing checkpoint blobs")?
            .error_for_status()
            .context("checkpoint container listing was rejected")?
            .text()
            .await
            .context("reading checkpoint listing body")?;

        Ok(blob_names(&body))
    }

    async fn delete_blob(&self, name: &str) -> anyhow::Result<()> {
        let date = http_date();
        let resource = format!("/{}/{}/{}", self.account, self.container, name);
        let to_sign = string_to_sign("DELETE", &date, &resource, &[]);
        let authorization = self.authorization(&to_sign)?;

        let url = format!("{}/{}", self.container_url(), name);
        self.client
            .delete(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("Authorization", authorization)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn authorization(&self, string_to_sign: &str) -> anyhow::Result<String> {
        let key = BASE64
            .decode(&self.key)
            .context("STORAGE_ACCOUNT_KEY is not valid base64")?;
        let mut mac =
            HmacSha256::new_from_slice(&key).context("storage account key has invalid length")?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        Ok(format!("SharedKey {}:{}", self.account, signature))
    }
}

fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Shared-key string-to-sign: verb, eleven empty standard headers, the
/// canonicalized x-ms headers, the canonicalized resource, then one
/// `name:value` line per query parameter in lexical order.
fn string_to_sign(
    verb: &str,
    date: &str,
    canonical_resource: &str,
    query: &[(&str, &str)],
) -> String {
    let mut s = format!(
        "{verb}\n\n\n\n\n\n\n\n\n\n\n\nx-ms-date:{date}\nx-ms-version:{STORAGE_API_VERSION}\n{canonical_resource}"
    );
    let mut query: Vec<_> = query.to_vec();
    query.sort();
    for (name, value) in query {
        s.push_str(&format!("\n{name}:{value}"));
    }
    s
}

fn blob_names(listing_xml: &str) -> Vec<String> {
    // Checkpoint blob names never contain markup, so a tag scan is enough.
    let re = Regex::new(r"<Name>([^<]+)</Name>").unwrap();
    re.captures_iter(listing_xml)
        .map(|c| c[1].to_string())
        .collect()
}
