// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Errors raised while building a shipper or logger configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors returned by a [`crate::secrets::SecretsManager`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("Secret '{0}' not found")]
    NotFound(String),

    #[error("Unable to resolve secret '{key}': {reason}")]
    Resolver { key: String, reason: String },
}

/// Reasons a batch could not be delivered.
///
/// None of these reach the code that produced the log records; the shipper
/// reports them through `tracing` and discards the batch.
#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    #[error("Logz.io response, {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unable to build request url: {0}")]
    Url(String),
}
