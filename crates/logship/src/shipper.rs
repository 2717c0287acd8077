// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::io::Write;

/// Destination of formatted log messages.
#[async_trait]
pub trait LogShipper: Send + Sync {
    /// Hands over one message. Depending on the shipper this writes it
    /// immediately or buffers it for a later batch.
    async fn send(&self, message: String);

    /// Delivers everything still buffered. Returns once every buffered
    /// message has been attempted.
    async fn flush(&self);
}

/// Prints every message on stdout as it arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutShipper;

#[async_trait]
impl LogShipper for StdoutShipper {
    async fn send(&self, message: String) {
        // A closed stdout must not take the application down
        let _ = writeln!(std::io::stdout().lock(), "{message}");
    }

    /// Nothing is buffered.
    async fn flush(&self) {}
}
