//! ringmpsc-rs - Bounded Lock-Free Multi-Producer Single-Consumer Queue
//!
//! A single shared ring buffer coordinated by one atomic producer index and
//! one consumer index. Producers reserve a logical slot via CAS and then
//! publish into it; the consumer advances through slots in strict order,
//! waiting out the narrow window between a producer's reservation and its
//! publication.
//!
//! # Key properties
//!
//! - Cache-line-aware layout: the producer index, consumer index, and data
//!   region are each isolated from false sharing.
//! - Adaptive backoff (spin → yield), never parks.
//! - FIFO per logical reservation order, not per-call real time.
//! - No iteration: `Queue` intentionally does not implement `Iterator` or
//!   `IntoIterator`, and `iter()` always returns an error.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ringmpsc_rs::{Config, Queue};
//!
//! let queue = Arc::new(Queue::<u64>::new(1024, Config::default()).unwrap());
//! let mut consumer = queue.consumer().unwrap();
//!
//! queue.offer(Some(42)).unwrap();
//! assert_eq!(consumer.poll(), Some(42));
//! ```

mod backoff;
mod config;
mod error;
mod invariants;
mod metrics;
mod queue;

pub use backoff::Backoff;
pub use config::Config;
pub use error::QueueError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use queue::{Consumer, Queue};
