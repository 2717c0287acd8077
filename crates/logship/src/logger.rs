// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

use crate::config::{LoggerConfig, ShipperKind};
use crate::context::LogContext;
use crate::error::ConfigError;
use crate::formatter::{DefaultFormatter, LogFormatter, LogzioJsonFormatter};
use crate::level::LogLevel;
use crate::logzio::LogzioShipper;
use crate::secrets::SecretsManager;
use crate::shipper::{LogShipper, StdoutShipper};

/// Filters records by level, formats them and hands them to a shipper.
#[derive(Clone)]
pub struct Logger {
    level: LogLevel,
    context: LogContext,
    formatter: Arc<dyn LogFormatter>,
    shipper: Arc<dyn LogShipper>,
}

impl Logger {
    /// Without a formatter or shipper, records are printed as plain text on stdout.
    pub fn new(
        level: LogLevel,
        formatter: Option<Arc<dyn LogFormatter>>,
        shipper: Option<Arc<dyn LogShipper>>,
    ) -> Self {
        Logger {
            level,
            context: LogContext::default(),
            formatter: formatter.unwrap_or_else(|| Arc::new(DefaultFormatter)),
            shipper: shipper.unwrap_or_else(|| Arc::new(StdoutShipper)),
        }
    }

    /// The Logz.io shipper always comes with the JSON formatter, stdout with
    /// the plain text one.
    pub fn from_config(
        config: &LoggerConfig,
        secrets: Arc<dyn SecretsManager>,
    ) -> Result<Self, ConfigError> {
        let (formatter, shipper): (Arc<dyn LogFormatter>, Arc<dyn LogShipper>) =
            match config.shipper {
                ShipperKind::Logzio => (
                    Arc::new(LogzioJsonFormatter),
                    Arc::new(LogzioShipper::new(config.logzio.clone(), secrets)?),
                ),
                ShipperKind::Stdout => (Arc::new(DefaultFormatter), Arc::new(StdoutShipper)),
            };
        debug!(
            "Logger created, shipper: {:?}, level: {}",
            config.shipper, config.level
        );

        Ok(Self::new(config.level, Some(formatter), Some(shipper)))
    }

    /// Replaces the context attached to every following record.
    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub async fn log(&self, level: LogLevel, message: impl Display) {
        if !self.level.enables(level) {
            return;
        }
        let record = self
            .formatter
            .format(level, &self.context, &message.to_string());
        self.shipper.send(record).await;
    }

    pub async fn status(&self, message: impl Display) {
        self.log(LogLevel::Status, message).await;
    }

    pub async fn error(&self, message: impl Display) {
        self.log(LogLevel::Error, message).await;
    }

    pub async fn info(&self, message: impl Display) {
        self.log(LogLevel::Info, message).await;
    }

    pub async fn debug(&self, message: impl Display) {
        self.log(LogLevel::Debug, message).await;
    }

    /// Makes the shipper deliver everything it still buffers.
    pub async fn flush(&self) {
        self.shipper.flush().await;
    }
}
