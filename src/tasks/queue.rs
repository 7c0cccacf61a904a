//! # Bounded per-task message queue.
//!
//! Many producers, one consumer: anyone holding the registry may enqueue,
//! only the owning task body dequeues (it takes the receiver once, usually in `init`).
//!
//! ## Rules
//! - Capacity and element size are fixed when the task is registered.
//! - Enqueue never blocks and never awaits; it is safe from any context.
//! - A full queue is backpressure, not a failure: the caller decides whether to log it.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

/// Reason a message was not enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// No free slot.
    Full,
    /// The consumer dropped its receiver.
    Closed,
    /// Payload larger than the registered element size.
    TooLarge {
        /// Size of the rejected payload.
        size: usize,
        /// Registered element size.
        max: usize,
    },
}

/// Bounded message channel owned by one task.
#[derive(Debug)]
pub struct MessageQueue {
    tx: mpsc::Sender<Vec<u8>>,
    rx: Mutex<Option<mpsc::Receiver<Vec<u8>>>>,
    capacity: usize,
    message_size: usize,
}

impl MessageQueue {
    /// Creates a queue holding up to `capacity` messages of at most `message_size` bytes.
    ///
    /// Capacity is clamped to a minimum of 1.
    pub fn new(capacity: usize, message_size: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            capacity,
            message_size,
        }
    }

    /// Enqueues without waiting.
    pub fn try_send(&self, payload: Vec<u8>) -> Result<(), QueueError> {
        if payload.len() > self.message_size {
            return Err(QueueError::TooLarge {
                size: payload.len(),
                max: self.message_size,
            });
        }
        self.tx.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    /// Hands the consumer side to the task body. Returns `None` after the first call.
    pub fn take_receiver(&self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.rx.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Number of free slots.
    pub fn free_slots(&self) -> usize {
        self.tx.capacity()
    }

    /// Registered capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registered element size in bytes.
    pub fn message_size(&self) -> usize {
        self.message_size
    }
}
