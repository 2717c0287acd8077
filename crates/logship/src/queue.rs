// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded FIFO buffer of formatted log messages awaiting shipment.
//!
//! Producers never block: when the buffer is full the oldest message is
//! evicted to make room, a warning is logged and the eviction is counted.
//! Readers wait (bounded by a timeout) for messages to arrive.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{timeout_at, Instant};
use tracing::warn;

#[derive(Debug)]
pub struct MessageQueue {
    messages: Mutex<VecDeque<String>>,
    capacity: usize,
    notify: Notify,
    closed: AtomicBool,
    dropped: AtomicU64,
}

impl MessageQueue {
    /// A zero capacity is bumped to one, the queue always holds the newest message.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: Mutex::new(VecDeque::new()),
            capacity,
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Appends `message`, evicting the oldest entry when the queue is full.
    ///
    /// Returns `true` if a message was evicted.
    pub fn enqueue(&self, message: String) -> bool {
        let evicted = {
            let mut messages = self.lock();
            let evicted = if messages.len() >= self.capacity {
                messages.pop_front().is_some()
            } else {
                false
            };
            messages.push_back(message);
            evicted
        };

        if evicted {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                "LOGZIO | Message queue full ({} items), dropping oldest log message ({} dropped so far)",
                self.capacity, dropped
            );
        }
        self.notify.notify_one();
        evicted
    }

    /// Removes up to `max` messages in insertion order.
    ///
    /// Waits for more messages until `max` is reached, `timeout` elapses or
    /// the queue is closed, then returns whatever was collected.
    pub async fn drain(&self, max: usize, timeout: Duration) -> Vec<String> {
        let mut batch = Vec::new();
        if max == 0 {
            return batch;
        }
        let deadline = Instant::now() + timeout;

        loop {
            // Register interest before looking at the queue so an enqueue
            // between the check and the await is not missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let remaining = {
                let mut messages = self.lock();
                let take = (max - batch.len()).min(messages.len());
                batch.extend(messages.drain(..take));
                messages.len()
            };

            if batch.len() >= max || self.is_closed() {
                if remaining > 0 {
                    // hand the wakeup over to the next waiting reader
                    self.notify.notify_one();
                }
                return batch;
            }

            if timeout_at(deadline, notified).await.is_err() {
                return batch;
            }
        }
    }

    /// Current backlog.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages evicted because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Wakes every waiting reader; subsequent drains return without waiting.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn messages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("message {i}")).collect()
    }

    #[test]
    fn test_enqueue_within_capacity() {
        let queue = MessageQueue::new(3);
        assert!(!queue.enqueue("a".to_string()));
        assert!(!queue.enqueue("b".to_string()));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn test_enqueue_evicts_oldest_when_full() {
        let queue = MessageQueue::new(2);
        queue.enqueue("a".to_string());
        queue.enqueue("b".to_string());
        assert!(queue.enqueue("c".to_string()));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn test_zero_capacity_keeps_newest() {
        let queue = MessageQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        queue.enqueue("a".to_string());
        queue.enqueue("b".to_string());
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_drain_returns_full_batch_in_order() {
        let queue = MessageQueue::new(10);
        for message in messages(5) {
            queue.enqueue(message);
        }

        let batch = queue.drain(3, Duration::from_millis(50)).await;
        assert_eq!(batch, vec!["message 0", "message 1", "message 2"]);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_drain_returns_partial_batch_on_timeout() {
        let queue = MessageQueue::new(10);
        queue.enqueue("only".to_string());

        let started = Instant::now();
        let batch = queue.drain(3, Duration::from_millis(50)).await;
        assert_eq!(batch, vec!["only"]);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_drain_empty_queue_times_out_empty() {
        let queue = MessageQueue::new(10);
        let batch = queue.drain(3, Duration::from_millis(20)).await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_drain_zero_max() {
        let queue = MessageQueue::new(10);
        queue.enqueue("a".to_string());
        assert!(queue.drain(0, Duration::from_secs(5)).await.is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_drain_waits_for_late_messages() {
        let queue = Arc::new(MessageQueue::new(10));
        queue.enqueue("first".to_string());

        let producer = Arc::clone(&queue);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.enqueue("second".to_string());
            producer.enqueue("third".to_string());
        });

        let batch = queue.drain(3, Duration::from_secs(5)).await;
        assert_eq!(batch, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_close_wakes_reader() {
        let queue = Arc::new(MessageQueue::new(10));
        queue.enqueue("a".to_string());

        let closer = Arc::clone(&queue);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            closer.close();
        });

        let started = Instant::now();
        let batch = queue.drain(3, Duration::from_secs(10)).await;
        assert_eq!(batch, vec!["a"]);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(queue.is_closed());
    }

    proptest! {
        #[test]
        fn prop_queue_keeps_newest_messages_in_order(capacity in 1usize..32, count in 0usize..96) {
            let queue = MessageQueue::new(capacity);
            for message in messages(count) {
                queue.enqueue(message);
            }

            let expected_len = count.min(capacity);
            prop_assert_eq!(queue.len(), expected_len);
            prop_assert_eq!(queue.dropped(), (count - expected_len) as u64);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let drained = runtime.block_on(queue.drain(capacity, Duration::ZERO));
            let expected = messages(count).split_off(count - expected_len);
            prop_assert_eq!(drained, expected);
        }
    }
}
