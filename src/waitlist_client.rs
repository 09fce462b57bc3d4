use std::fmt::Debug;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;

use crate::domain::WaitlistEntry;
use crate::utils::error_chain_fmt;

/// HTTP client for the remote waitlist collector. Cloning is cheap: the
/// underlying `reqwest::Client` is an `Arc`, so every widget on a page shares one
/// connection pool.
#[derive(Clone)]
pub struct WaitlistClient {
    http_client: Client,
    /// `None` when nothing was provisioned; every submission then fails on
    /// the network-error path instead of panicking at startup
    base_url: Option<String>,
    api_key: Option<Secret<String>>,
    /// e.g. `/rest/v1/waitlist`; differs per locale
    collection_path: String,
}

#[derive(thiserror::Error)]
pub enum SubmitError {
    #[error("Waitlist endpoint is not configured")]
    NotConfigured,
    /// Unreachable, timed out, or the request could not even be built
    #[error("Failed to reach the waitlist endpoint")]
    Transport(#[from] reqwest::Error),
    /// The collector answered, but not with a 2xx
    #[error("Waitlist endpoint rejected the submission ({status})")]
    Rejected {
        status: StatusCode,
        /// Human-readable `message` from the response body, if there was one
        message: Option<String>,
    },
}

impl Debug for SubmitError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Deserialize)]
struct RejectionBody {
    message: Option<String>,
}

impl WaitlistClient {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<Secret<String>>,
        collection_path: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            api_key,
            collection_path,
        })
    }

    /// Same connection pool and credentials, different collection (e.g. the
    /// English page posts to its own table)
    pub fn with_collection_path(
        &self,
        collection_path: String,
    ) -> Self {
        Self {
            collection_path,
            ..self.clone()
        }
    }

    pub fn collection_path(&self) -> &str { &self.collection_path }

    /// `POST {base_url}{collection_path}` with a JSON `WaitlistEntry`. Any 2xx
    /// counts as acknowledged; the response body is not read.
    #[tracing::instrument(
        name = "Sending waitlist entry to collector",
        skip(self, entry),
        fields(collection_path = %self.collection_path)
    )]
    pub async fn submit(
        &self,
        entry: &WaitlistEntry,
    ) -> Result<(), SubmitError> {
        let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
            return Err(SubmitError::NotConfigured);
        };
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.collection_path.trim_start_matches('/')
        );

        let resp = self
            .http_client
            .post(&url)
            // `json` also sets `Content-Type: application/json`
            .bearer_auth(api_key.expose_secret())
            .json(entry)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        // an empty or non-json body is still a rejection, just without a
        // message worth showing
        let message = resp
            .json::<RejectionBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        tracing::warn!(%status, ?message, "collector rejected waitlist entry");
        Err(SubmitError::Rejected { status, message })
    }
}
