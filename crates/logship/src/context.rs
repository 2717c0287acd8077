// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Key/value context attached to every record a logger emits.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};

pub const LOG_CTX_REQUEST_ID: &str = "requestid";
pub const LOG_CTX_LOG_LEVEL: &str = "loglevel";
pub const LOG_CTX_MESSAGE: &str = "message";
pub const LOG_CTX_TIMESTAMP: &str = "timestamp";
pub const LOG_CTX_NAMESPACE: &str = "namespace";
pub const LOG_CTX_DOMAIN: &str = "domain";
pub const LOG_CTX_HOSTNAME: &str = "hostname";
pub const LOG_CTX_IP: &str = "ip";
pub const LOG_CTX_K8S_NODE: &str = "k8s_node";
pub const LOG_CTX_K8S_POD: &str = "k8s_pod";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    values: BTreeMap<String, String>,
}

impl LogContext {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a new context holding the current values overwritten by `values`.
    #[must_use]
    pub fn append_values<I, K, V>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = self.values.clone();
        merged.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self { values: merged }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Hostname and IPv4 address of the current node.
    pub fn for_nodes() -> Self {
        let hostname = get_hostname();
        let mut values = BTreeMap::new();
        // Port is irrelevant, resolution only needs a socket address shape
        if let Ok(addrs) = (hostname.as_str(), 0).to_socket_addrs() {
            if let Some(ip) = addrs
                .map(|addr| addr.ip())
                .filter(IpAddr::is_ipv4)
                .last()
            {
                values.insert(LOG_CTX_IP.to_string(), ip.to_string());
            }
        }
        values.insert(LOG_CTX_HOSTNAME.to_string(), hostname);
        Self { values }
    }

    /// Kubernetes node and pod name, if exposed as `K8S_NODE_NAME` and `K8S_POD_NAME`.
    pub fn for_k8s() -> Self {
        let mut values = BTreeMap::new();
        if let Ok(node) = env::var("K8S_NODE_NAME") {
            values.insert(LOG_CTX_K8S_NODE.to_string(), node);
        }
        if let Ok(pod) = env::var("K8S_POD_NAME") {
            values.insert(LOG_CTX_K8S_POD.to_string(), pod);
        }
        Self { values }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self
            .values
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<String>>();
        write!(f, "{}", pairs.join(","))
    }
}

fn get_hostname() -> String {
    for key in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(hostname) = env::var(key) {
            if !hostname.is_empty() {
                return hostname;
            }
        }
    }
    std::fs::read_to_string("/etc/hostname")
        .map(|hostname| hostname.trim().to_string())
        .ok()
        .filter(|hostname| !hostname.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
