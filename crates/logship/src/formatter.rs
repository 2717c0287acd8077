// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{SecondsFormat, Utc};

use crate::context::{LogContext, LOG_CTX_LOG_LEVEL, LOG_CTX_MESSAGE};
use crate::level::LogLevel;

/// Key of the record timestamp expected by the Logz.io listener.
pub const LOGZIO_TIMESTAMP_KEY: &str = "@timestamp";

/// Converts a record into the string a shipper delivers.
pub trait LogFormatter: Send + Sync {
    fn format(&self, level: LogLevel, context: &LogContext, message: &str) -> String;
}

/// Plain text fallback: `<Level>: <message>, Context: <k:v,...>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl LogFormatter for DefaultFormatter {
    fn format(&self, level: LogLevel, context: &LogContext, message: &str) -> String {
        format!("{level}: {message}, Context: {context}")
    }
}

/// One flat JSON object per record, suitable for the Logz.io bulk listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogzioJsonFormatter;

impl LogFormatter for LogzioJsonFormatter {
    fn format(&self, level: LogLevel, context: &LogContext, message: &str) -> String {
        let mut values = context.values().clone();
        values.insert(LOG_CTX_LOG_LEVEL.to_string(), level.to_string());
        values.insert(
            LOGZIO_TIMESTAMP_KEY.to_string(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        values.insert(LOG_CTX_MESSAGE.to_string(), message.to_string());

        // A map of strings always serializes
        serde_json::to_string(&values).unwrap_or_default()
    }
}
