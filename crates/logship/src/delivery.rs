// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Single HTTP delivery of one batch to the Logz.io listener.
//!
//! ```text
//!   batch ──> join("\n") ──> obtain token ──> POST <url>?token=..&type=go-logs
//!                               │
//!                               └─ lookup failed: placeholder token, request still sent
//! ```
//!
//! A delivery is attempted exactly once. Status codes >= 400 and transport
//! errors are returned to the caller, who reports them and drops the batch.

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use crate::config::LOGZIO_TOKEN_KEY;
use crate::error::ShipmentError;
use crate::secrets::SecretsManager;

/// Value of the `type` query parameter attached to every shipment.
pub const LOGZIO_LOG_TYPE: &str = "go-logs";
/// Sent in place of the token when the secret lookup fails, so the listener
/// rejects the batch visibly instead of it being dropped silently.
pub const TOKEN_NOT_FOUND: &str = "<LogzioTokenNotFound>";

#[derive(Clone)]
pub struct Delivery {
    client: reqwest::Client,
    /// Base listener url, e.g. "https://listener.logz.io:8071/".
    url: String,
    secrets: Arc<dyn SecretsManager>,
}

impl Delivery {
    #[must_use]
    pub fn new(client: reqwest::Client, url: String, secrets: Arc<dyn SecretsManager>) -> Self {
        Delivery {
            client,
            url,
            secrets,
        }
    }

    /// Ships `batch` as one newline separated payload.
    pub async fn deliver(&self, batch: Vec<String>) -> Result<(), ShipmentError> {
        let n_messages = batch.len();
        let payload = batch.join("\n");
        let token = self.obtain_token().await;
        let url = self.endpoint_url(&token)?;

        let time = Instant::now();
        let resp = self.create_request(url, payload).send().await?;
        let elapsed = time.elapsed();

        let status = resp.status();
        if status.as_u16() >= 400 {
            // Body is only read on failure
            let body = resp.text().await.unwrap_or_default();
            return Err(ShipmentError::Status { status, body });
        }

        debug!(
            "LOGZIO | Shipped {} messages in {} ms",
            n_messages,
            elapsed.as_millis()
        );
        Ok(())
    }

    /// Listener url with token and log type attached as query parameters.
    pub fn endpoint_url(&self, token: &str) -> Result<Url, ShipmentError> {
        Url::parse_with_params(&self.url, &[("token", token), ("type", LOGZIO_LOG_TYPE)])
            .map_err(|e| ShipmentError::Url(format!("{}: {e}", self.url)))
    }

    async fn obtain_token(&self) -> String {
        match self.secrets.obtain(LOGZIO_TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                error!("LOGZIO | Unable to obtain shipping token: {}", e);
                TOKEN_NOT_FOUND.to_string()
            }
        }
    }

    fn create_request(&self, url: Url, payload: String) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
    }
}
