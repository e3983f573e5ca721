//! bbuffer - Bounded SPSC Ring Buffers with In-Band End-of-Stream
//!
//! A bounded single-producer single-consumer ring buffer that hands a stream
//! of values from a generator to a reducer. The last slot of the stream
//! carries an `is_last` flag, so termination travels through the same ring as
//! the data.
//!
//! Three interchangeable variants implement the same [`Buffer`] contract:
//!
//! - [`SequentialBuffer`] - no synchronization; producer and consumer are
//!   interleaved in one loop and misuse is reported as `Full`/`Empty`.
//! - [`BlockingBuffer`] - mutex plus two condition variables; waiting threads
//!   are suspended.
//! - [`SpinBuffer`] - two atomic indices with acquire/release hand-off;
//!   waiting threads spin.
//!
//! All of them keep one slot empty to tell a full ring from an empty one, so
//! a ring of `capacity` slots holds at most `capacity - 1` unread values and
//! `capacity` must be at least 2.
//!
//! # Example
//!
//! ```
//! use bbuffer_rs::{run, BufferKind, Config, MinMaxReducer, TokenGenerator};
//! use std::io::Cursor;
//!
//! let mut generator = TokenGenerator::<_, i64>::new(Cursor::new("10 20 30"));
//! let mut reducer = MinMaxReducer::new();
//!
//! let report = run(BufferKind::Blocking, Config::new(4, false), &mut generator, &mut reducer)
//!     .unwrap();
//!
//! // The terminal slot carries a placeholder and is not reduced.
//! assert_eq!(report.reduced, 3);
//! assert_eq!((reducer.min(), reducer.max()), (10, 30));
//! ```

mod backoff;
mod blocking;
mod buffer;
mod config;
mod error;
pub mod generator;
pub mod harness;
mod invariants;
mod metrics;
pub mod reducer;
mod sequential;
mod spin;
mod storage;

pub use backoff::Backoff;
pub use blocking::BlockingBuffer;
pub use buffer::Buffer;
pub use config::{BufferKind, Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG, MIN_CAPACITY};
pub use error::BufferError;
pub use generator::{Generator, IterGenerator, RandomGenerator, TokenGenerator};
pub use harness::{run, run_concurrent, run_sequential, RunReport};
pub use metrics::{Metrics, MetricsSnapshot};
pub use reducer::{ByteCountReducer, MinMaxReducer, Reducer};
pub use sequential::SequentialBuffer;
pub use spin::SpinBuffer;
pub use storage::{RingStorage, Slot};
