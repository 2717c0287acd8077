// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use derive_more::Display;
use std::env;

/// Environment variable read by [`LogLevel::from_env`].
pub const ENV_LOGLEVEL: &str = "LOGLEVEL";

/// Verbosity of a logger or a single record.
///
/// Levels are ordered; a logger configured with level `L` emits every record
/// whose level is `<= L`. `None` disables logging entirely.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    #[default]
    None = 0,
    Status = 100,
    Error = 200,
    Info = 300,
    Debug = 400,
}

impl LogLevel {
    /// Case-insensitive lookup; unknown names map to `None`, which disables logging.
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "status" => LogLevel::Status,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            _ => LogLevel::None,
        }
    }

    pub fn from_env() -> Self {
        env::var(ENV_LOGLEVEL)
            .map(|name| Self::by_name(&name))
            .unwrap_or_default()
    }

    /// Corresponding syslog(3) priority.
    pub fn syslog_level(self) -> u8 {
        match self {
            LogLevel::Error => 3,
            LogLevel::Info => 6,
            LogLevel::Debug => 7,
            LogLevel::None | LogLevel::Status => 0,
        }
    }

    /// Whether a logger at this level emits a record at `level`.
    pub fn enables(self, level: LogLevel) -> bool {
        self != LogLevel::None && level != LogLevel::None && level <= self
    }
}
