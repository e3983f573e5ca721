//! Drives one generator and one reducer through a buffer.
//!
//! The producer pulls values and `put`s them until the generator is
//! exhausted, closing the stream with exactly one terminal slot. The
//! consumer `get`s slots, feeds every non-terminal value to the reducer and
//! stops at the terminal slot, whose value is never reduced. The harness owns
//! no synchronization; it composes and times.

use crate::generator::Generator;
use crate::reducer::Reducer;
use crate::{
    BlockingBuffer, Buffer, BufferError, BufferKind, Config, MetricsSnapshot, SequentialBuffer,
    SpinBuffer,
};
use std::marker::PhantomData;
use std::panic;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one producer/consumer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Wall-clock time from start until both sides finished.
    pub elapsed: Duration,
    /// Values put as ordinary data (the terminal slot is not counted).
    pub produced: u64,
    /// Values handed to the reducer.
    pub reduced: u64,
    /// Buffer counters at the end of the run.
    pub metrics: MetricsSnapshot,
}

/// Next `(value, is_last)` pair for the producer.
///
/// An already exhausted generator yields a placeholder terminal slot.
fn pull<G>(generator: &mut G) -> (G::Item, bool)
where
    G: Generator,
    G::Item: Default,
{
    if generator.is_finished() {
        return (G::Item::default(), true);
    }
    let value = generator.generate();
    (value, generator.is_finished())
}

/// Runs producer and consumer as one interleaved loop: fill until full, then
/// drain until empty, until the terminal slot is read.
///
/// Works with any variant; it is the only way to drive a
/// [`SequentialBuffer`]. Never calls `put` on a full buffer or `get` on an
/// empty one.
pub fn run_sequential<G, R, B>(
    generator: &mut G,
    reducer: &mut R,
    buffer: &B,
) -> Result<RunReport, BufferError>
where
    G: Generator,
    G::Item: Default,
    R: Reducer<G::Item>,
    B: Buffer<G::Item>,
{
    let start = Instant::now();
    let mut produced = 0u64;
    let mut reduced = 0u64;
    let mut closed = false;

    'run: loop {
        while !closed && !buffer.is_full() {
            let (value, is_last) = pull(generator);
            buffer.put(value, is_last)?;
            if is_last {
                closed = true;
            } else {
                produced += 1;
            }
        }
        while !buffer.is_empty() {
            let slot = buffer.get()?;
            if slot.is_last {
                break 'run;
            }
            reducer.reduce(slot.value);
            reduced += 1;
        }
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        produced,
        reduced,
        metrics: buffer.metrics(),
    })
}

fn produce<G, B>(generator: &mut G, buffer: &B) -> Result<u64, BufferError>
where
    G: Generator,
    G::Item: Default,
    B: Buffer<G::Item>,
{
    let mut guard = CloseOnExit::new(buffer);
    let mut produced = 0u64;
    loop {
        let (value, is_last) = pull(generator);
        buffer.put(value, is_last)?;
        if is_last {
            guard.closed = true;
            return Ok(produced);
        }
        produced += 1;
    }
}

fn consume<T, R, B>(reducer: &mut R, buffer: &B) -> Result<u64, BufferError>
where
    R: Reducer<T>,
    B: Buffer<T>,
{
    let mut guard = DrainOnExit::new(buffer);
    let mut reduced = 0u64;
    loop {
        let slot = buffer.get()?;
        if slot.is_last {
            guard.drained = true;
            return Ok(reduced);
        }
        reducer.reduce(slot.value);
        reduced += 1;
    }
}

/// Writes a placeholder terminal slot if the producer leaves without having
/// closed the stream (generator panic or put error), so the consumer stops.
struct CloseOnExit<'a, T: Default, B: Buffer<T>> {
    buffer: &'a B,
    closed: bool,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: Default, B: Buffer<T>> CloseOnExit<'a, T, B> {
    fn new(buffer: &'a B) -> Self {
        Self {
            buffer,
            closed: false,
            _item: PhantomData,
        }
    }
}

impl<T: Default, B: Buffer<T>> Drop for CloseOnExit<'_, T, B> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.buffer.put(T::default(), true);
        }
    }
}

/// Reads and discards slots up to the terminal one if the consumer leaves
/// early (reducer panic or get error), so the producer never waits on a full
/// buffer.
struct DrainOnExit<'a, T, B: Buffer<T>> {
    buffer: &'a B,
    drained: bool,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T, B: Buffer<T>> DrainOnExit<'a, T, B> {
    fn new(buffer: &'a B) -> Self {
        Self {
            buffer,
            drained: false,
            _item: PhantomData,
        }
    }
}

impl<T, B: Buffer<T>> Drop for DrainOnExit<'_, T, B> {
    fn drop(&mut self) {
        if self.drained {
            return;
        }
        while let Ok(slot) = self.buffer.get() {
            if slot.is_last {
                break;
            }
        }
    }
}

/// Runs producer and consumer on two scoped threads and joins both.
///
/// A panic on either thread is re-raised here once both are joined: a
/// producer that unwinds still closes the stream, and a consumer that
/// unwinds still drains it. A generator that never finishes keeps both
/// threads busy forever; there is no cancellation.
pub fn run_concurrent<G, R, B>(
    generator: &mut G,
    reducer: &mut R,
    buffer: &B,
) -> Result<RunReport, BufferError>
where
    G: Generator + Send,
    G::Item: Default + Send,
    R: Reducer<G::Item> + Send,
    B: Buffer<G::Item> + Sync,
{
    let start = Instant::now();

    let (produced, reduced) = thread::scope(|s| {
        let producer = s.spawn(move || produce(generator, buffer));
        let consumer = s.spawn(move || consume(reducer, buffer));
        (producer.join(), consumer.join())
    });
    let elapsed = start.elapsed();

    let produced = produced.unwrap_or_else(|payload| panic::resume_unwind(payload))?;
    let reduced = reduced.unwrap_or_else(|payload| panic::resume_unwind(payload))?;
    debug!(produced, reduced, ?elapsed, "producer and consumer joined");

    Ok(RunReport {
        elapsed,
        produced,
        reduced,
        metrics: buffer.metrics(),
    })
}

/// Builds a buffer of the requested kind and runs the pipeline through it.
pub fn run<G, R>(
    kind: BufferKind,
    config: Config,
    generator: &mut G,
    reducer: &mut R,
) -> Result<RunReport, BufferError>
where
    G: Generator + Send,
    G::Item: Default + Send,
    R: Reducer<G::Item> + Send,
{
    debug!(%kind, capacity = config.capacity, "starting run");

    let report = match kind {
        BufferKind::Sequential => {
            run_sequential(generator, reducer, &SequentialBuffer::new(config)?)?
        }
        BufferKind::Blocking => run_concurrent(generator, reducer, &BlockingBuffer::new(config)?)?,
        BufferKind::Spin => run_concurrent(generator, reducer, &SpinBuffer::new(config)?)?,
    };

    info!(
        %kind,
        capacity = config.capacity,
        produced = report.produced,
        reduced = report.reduced,
        elapsed_ns = report.elapsed.as_nanos() as u64,
        "run finished"
    );
    Ok(report)
}
