// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client used to ship batches.
//!
//! The client carries the per-request timeout, connection pooling with TCP
//! keep-alive, and the optional HTTPS proxy from [`ShipperConfig`]. A broken
//! proxy setting never prevents shipping: the client falls back to a direct
//! connection.

use core::time::Duration;
use std::error::Error;
use tracing::error;

use crate::config::ShipperConfig;

#[must_use]
pub fn get_client(config: &ShipperConfig) -> reqwest::Client {
    match build_client(config, true) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "LOGZIO | Unable to parse proxy configuration: {}, falling back to direct connection",
                e
            );
            match build_client(config, false) {
                Ok(client) => client,
                Err(inner) => {
                    error!(
                        "LOGZIO | Failed to build HTTP client without proxy: {}, using reqwest defaults",
                        inner
                    );
                    reqwest::Client::new()
                }
            }
        }
    }
}

fn build_client(
    config: &ShipperConfig,
    allow_proxy: bool,
) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .pool_idle_timeout(Some(Duration::from_secs(270)))
        .tcp_keepalive(Some(Duration::from_secs(120)));

    if allow_proxy {
        if let Some(https_uri) = &config.https_proxy {
            let proxy = reqwest::Proxy::https(https_uri.clone())?;
            client = client.proxy(proxy);
        }
    }

    Ok(client.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_without_proxy() {
        let config = ShipperConfig::default();
        assert!(build_client(&config, true).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let config = ShipperConfig {
            https_proxy: Some("https://proxy.example.com:3128".to_string()),
            ..Default::default()
        };
        assert!(build_client(&config, true).is_ok());
    }

    #[test]
    fn test_invalid_proxy_falls_back() {
        let config = ShipperConfig {
            https_proxy: Some("::not a proxy::".to_string()),
            ..Default::default()
        };
        // get_client still hands back a usable client
        let _client = get_client(&config);
        assert!(build_client(&config, false).is_ok());
    }
}
