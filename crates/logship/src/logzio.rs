// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching shipper for the Logz.io bulk listener.
//!
//! Every [`LogzioShipper::send`] enqueues the message and, once the backlog
//! exceeds one batch, tries to start a delivery:
//!
//! ```text
//!   send ──> enqueue ──> backlog > batch_size? ──no──> return
//!                              │ yes
//!                              v
//!                   acquire slot (bounded wait) ──timeout──> return, message stays queued
//!                              │
//!                              v
//!                   spawn: read batch ──> deliver ──> release slot
//! ```
//!
//! A slot timeout is the backpressure valve: when deliveries cannot keep up
//! the backlog grows instead of the number of concurrent requests. Failed
//! deliveries are logged once and the batch is dropped.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error};

use crate::batch::BatchReader;
use crate::config::ShipperConfig;
use crate::delivery::Delivery;
use crate::error::ConfigError;
use crate::http::get_client;
use crate::queue::MessageQueue;
use crate::secrets::SecretsManager;
use crate::shipper::LogShipper;
use crate::slots::SlotPool;

#[derive(Clone)]
pub struct LogzioShipper {
    config: Arc<ShipperConfig>,
    queue: Arc<MessageQueue>,
    slots: SlotPool,
    reader: BatchReader,
    delivery: Delivery,
    /// Delivery tasks spawned by `send`, awaited on shutdown.
    tracker: TaskTracker,
}

impl LogzioShipper {
    pub fn new(
        config: ShipperConfig,
        secrets: Arc<dyn SecretsManager>,
    ) -> Result<Self, ConfigError> {
        let client = get_client(&config);
        Self::with_client(config, secrets, client)
    }

    pub fn with_client(
        config: ShipperConfig,
        secrets: Arc<dyn SecretsManager>,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(LogzioShipper {
            queue: Arc::new(MessageQueue::new(config.message_stack_size)),
            slots: SlotPool::new(config.shipment_stack_size),
            reader: BatchReader::new(config.batch_size, config.message_read_timeout),
            delivery: Delivery::new(client, config.url.clone(), secrets),
            tracker: TaskTracker::new(),
            config: Arc::new(config),
        })
    }

    /// Enqueues `message` and starts a background delivery when the backlog
    /// exceeds one batch and a shipment slot frees up in time.
    pub async fn send(&self, message: String) {
        self.queue.enqueue(message);

        let backlog = self.queue.len();
        if backlog <= self.config.batch_size || self.queue.is_closed() {
            return;
        }

        let Some(slot) = self.slots.acquire(self.config.shipment_timeout).await else {
            debug!(
                "LOGZIO | No shipment slot within {} ms, {} messages stay queued",
                self.config.shipment_timeout.as_millis(),
                backlog
            );
            return;
        };

        let shipper = self.clone();
        self.tracker.spawn(async move {
            shipper.ship_batch().await;
            drop(slot);
        });
    }

    /// Ships batch after batch until the queue is empty, ignoring the
    /// threshold and slot limits, then waits for deliveries still in flight.
    pub async fn flush(&self) {
        let mut shipped = 0;
        while !self.queue.is_empty() {
            shipped += self.ship_batch().await;
        }
        self.slots.wait_idle().await;
        debug!("LOGZIO | Flushed {} messages", shipped);
    }

    /// Stops spawning deliveries, flushes the backlog and waits for every
    /// delivery task to finish.
    pub async fn shutdown(&self) {
        self.queue.close();
        self.flush().await;
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Messages currently queued.
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    /// Deliveries currently holding a shipment slot.
    pub fn in_flight(&self) -> usize {
        self.slots.in_use()
    }

    /// Messages evicted because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    /// Reads one batch and delivers it; returns the number of messages attempted.
    async fn ship_batch(&self) -> usize {
        let batch = self.reader.read_batch(&self.queue).await;
        let n_messages = batch.len();
        if n_messages == 0 {
            debug!("LOGZIO | Nothing left to ship");
            return 0;
        }

        if let Err(e) = self.delivery.deliver(batch).await {
            error!("LOGZIO | Failed to ship {} messages: {}", n_messages, e);
        }
        n_messages
    }
}

#[async_trait]
impl LogShipper for LogzioShipper {
    async fn send(&self, message: String) {
        LogzioShipper::send(self, message).await;
    }

    async fn flush(&self) {
        LogzioShipper::flush(self).await;
    }
}
