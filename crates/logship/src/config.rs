// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::level::LogLevel;

/// Endpoint all logs are shipped to unless `LOGZIO_URL` says otherwise.
pub const LOGZIO_URL: &str = "https://listener.logz.io:8071/";
/// Key used to obtain the Logz.io token from a secrets manager.
pub const LOGZIO_TOKEN_KEY: &str = "LOGZIO_TOKEN";

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MESSAGE_STACK_SIZE: usize = 500;
pub const DEFAULT_SHIPMENT_STACK_SIZE: usize = 2;
pub const DEFAULT_SHIPMENT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_MESSAGE_READ_TIMEOUT: Duration = Duration::from_millis(50);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound of parallel deliveries.
pub const MAX_SHIPMENT_STACK_SIZE: usize = 1024;
/// Upper bound of the message buffer.
pub const MAX_MESSAGE_STACK_SIZE: usize = 1_000_000;

/// Immutable settings of a [`crate::logzio::LogzioShipper`], fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipperConfig {
    /// Base url of the listener, query parameters are appended per request
    pub url: String,
    /// Number of messages shipped together in one request
    pub batch_size: usize,
    /// Number of deliveries allowed to run in parallel
    pub shipment_stack_size: usize,
    /// Capacity of the message buffer
    pub message_stack_size: usize,
    /// How long `send` waits for a free shipment slot
    pub shipment_timeout: Duration,
    /// How long a delivery waits for a batch to fill up
    pub message_read_timeout: Duration,
    /// Timeout of a single HTTP request
    pub request_timeout: Duration,
    pub https_proxy: Option<String>,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            url: LOGZIO_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            shipment_stack_size: DEFAULT_SHIPMENT_STACK_SIZE,
            message_stack_size: DEFAULT_MESSAGE_STACK_SIZE,
            shipment_timeout: DEFAULT_SHIPMENT_TIMEOUT,
            message_read_timeout: DEFAULT_MESSAGE_READ_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            https_proxy: None,
        }
    }
}

impl ShipperConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            url: env::var("LOGZIO_URL").unwrap_or_else(|_| LOGZIO_URL.to_string()),
            batch_size: parse_env("LOGZIO_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            shipment_stack_size: parse_env("LOGZIO_SHIPMENT_STACK_SIZE", DEFAULT_SHIPMENT_STACK_SIZE),
            message_stack_size: parse_env("LOGZIO_MESSAGE_STACK_SIZE", DEFAULT_MESSAGE_STACK_SIZE),
            shipment_timeout: env_millis("LOGZIO_SHIPMENT_TIMEOUT_MS", DEFAULT_SHIPMENT_TIMEOUT),
            message_read_timeout: env_millis(
                "LOGZIO_MESSAGE_READ_TIMEOUT_MS",
                DEFAULT_MESSAGE_READ_TIMEOUT,
            ),
            request_timeout: Duration::from_secs(parse_env(
                "LOGZIO_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )),
            https_proxy: env::var("LOGZIO_PROXY_HTTPS")
                .or_else(|_| env::var("HTTPS_PROXY"))
                .ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = reqwest::Url::parse(&self.url) {
            return Err(ConfigError::InvalidUrl {
                url: self.url.clone(),
                reason: e.to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch size must be greater than 0".to_string(),
            ));
        }
        if self.shipment_stack_size == 0 {
            return Err(ConfigError::Invalid(
                "shipment stack size must be greater than 0".to_string(),
            ));
        }
        if self.message_stack_size == 0 {
            return Err(ConfigError::Invalid(
                "message stack size must be greater than 0".to_string(),
            ));
        }
        if self.shipment_stack_size > MAX_SHIPMENT_STACK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "shipment stack size ({}) must not exceed {}",
                self.shipment_stack_size, MAX_SHIPMENT_STACK_SIZE
            )));
        }
        if self.message_stack_size > MAX_MESSAGE_STACK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "message stack size ({}) must not exceed {}",
                self.message_stack_size, MAX_MESSAGE_STACK_SIZE
            )));
        }
        // The backlog has to be able to exceed one batch, otherwise only a
        // flush would ever ship anything.
        if self.message_stack_size <= self.batch_size {
            return Err(ConfigError::Invalid(format!(
                "message stack size ({}) must be greater than batch size ({})",
                self.message_stack_size, self.batch_size
            )));
        }
        Ok(())
    }
}

/// Destination selected for a [`crate::logger::Logger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShipperKind {
    #[default]
    Stdout,
    Logzio,
}

impl ShipperKind {
    /// `logzio` (any case) selects the remote shipper, everything else stdout.
    pub fn by_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("logzio") {
            ShipperKind::Logzio
        } else {
            ShipperKind::Stdout
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub shipper: ShipperKind,
    pub logzio: ShipperConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Error,
            shipper: ShipperKind::Stdout,
            logzio: ShipperConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Reads `LOG_SHIPPER` and `LOG_LOGLEVEL`; shipper settings are only
    /// read (and validated) when the Logz.io shipper is selected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let shipper = env::var("LOG_SHIPPER")
            .map(|name| ShipperKind::by_name(&name))
            .unwrap_or_default();
        let level = env::var("LOG_LOGLEVEL")
            .map(|name| LogLevel::by_name(&name))
            .unwrap_or(LogLevel::Error);
        let logzio = match shipper {
            ShipperKind::Logzio => ShipperConfig::from_env()?,
            ShipperKind::Stdout => ShipperConfig::default(),
        };

        Ok(Self {
            level,
            shipper,
            logzio,
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
