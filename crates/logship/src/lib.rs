// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structured logging façade with pluggable formatters and shippers.
//!
//! Records are rendered by a [`formatter::LogFormatter`] and handed to a
//! [`shipper::LogShipper`]. The interesting shipper is
//! [`logzio::LogzioShipper`], which buffers messages and ships them in batches
//! to a remote HTTP endpoint:
//!
//! ```text
//!   Logger::log
//!       │
//!       v
//!   ┌──────────────┐   backlog > batch_size   ┌──────────────┐
//!   │ MessageQueue │ ───────────────────────> │   SlotPool   │ (bounded wait)
//!   └──────┬───────┘                          └──────┬───────┘
//!          │                                         │ slot acquired
//!          v                                         v
//!   ┌──────────────┐                          ┌──────────────┐
//!   │ BatchReader  │ <──────── spawned task ──│   Delivery   │ HTTP POST
//!   └──────────────┘                          └──────────────┘
//! ```
//!
//! Shipping is best effort: failed batches are logged through `tracing` and
//! dropped, never retried.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod config;
pub mod context;
pub mod delivery;
pub mod error;
pub mod formatter;
pub mod http;
pub mod level;
pub mod logger;
pub mod logzio;
pub mod queue;
pub mod secrets;
pub mod shipper;
pub mod slots;

pub use config::{LoggerConfig, ShipperConfig, ShipperKind};
pub use context::LogContext;
pub use error::{ConfigError, SecretError, ShipmentError};
pub use formatter::{DefaultFormatter, LogFormatter, LogzioJsonFormatter};
pub use level::LogLevel;
pub use logger::Logger;
pub use logzio::LogzioShipper;
pub use secrets::{EnvSecretsManager, ResolverSecretsManager, SecretsManager, StaticSecretsManager};
pub use shipper::{LogShipper, StdoutShipper};
