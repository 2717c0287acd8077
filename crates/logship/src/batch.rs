// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use tracing::debug;

use crate::queue::MessageQueue;

/// Reads one batch of at most `batch_size` messages from a [`MessageQueue`].
///
/// A batch that fills slowly is cut off after `read_timeout`, which bounds the
/// latency of the last messages before a flush or shutdown.
#[derive(Debug, Clone, Copy)]
pub struct BatchReader {
    batch_size: usize,
    read_timeout: Duration,
}

impl BatchReader {
    pub fn new(batch_size: usize, read_timeout: Duration) -> Self {
        Self {
            batch_size,
            read_timeout,
        }
    }

    pub async fn read_batch(&self, queue: &MessageQueue) -> Vec<String> {
        let batch = queue.drain(self.batch_size, self.read_timeout).await;
        if batch.len() < self.batch_size {
            debug!(
                "LOGZIO | Read {} of {} messages before timeout",
                batch.len(),
                self.batch_size
            );
        }
        batch
    }
}
