//! Value sources that feed the producer side of a run.
//!
//! A generator is polled with [`Generator::generate`] only while
//! [`Generator::is_finished`] is false. The producer checks `is_finished`
//! again right after each value to decide whether that value closes the
//! stream, so the moment a generator reports exhaustion decides whether its
//! last value travels as data or inside the terminal slot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// A finite source of values.
pub trait Generator {
    type Item;

    /// Produces the next value. Only valid while not finished.
    fn generate(&mut self) -> Self::Item;

    /// `true` once the source is exhausted.
    fn is_finished(&self) -> bool;
}

/// Uniformly distributed `i64` values over the full range.
///
/// Finished as soon as the requested number of values has been produced, so
/// the last value closes the stream.
pub struct RandomGenerator {
    remaining: u64,
    rng: StdRng,
}

impl RandomGenerator {
    /// `n` values from an entropy-seeded generator.
    pub fn new(n: u64) -> Self {
        Self {
            remaining: n,
            rng: StdRng::from_entropy(),
        }
    }

    /// `n` values from a fixed seed.
    pub fn seeded(n: u64, seed: u64) -> Self {
        Self {
            remaining: n,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Generator for RandomGenerator {
    type Item = i64;

    fn generate(&mut self) -> i64 {
        self.remaining = self.remaining.saturating_sub(1);
        self.rng.gen()
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

/// Whitespace-delimited tokens parsed as `T`.
///
/// Exhaustion is only discovered by a read that fails (end of input, I/O
/// error or a token that does not parse), which yields `T::default()`. Every
/// real token is therefore delivered as data and the terminal slot carries
/// the placeholder. I/O errors are not told apart from end of input.
pub struct TokenGenerator<R, T> {
    reader: Option<R>,
    pending: VecDeque<String>,
    line: String,
    finished: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T> TokenGenerator<BufReader<File>, T> {
    /// Opens `path`. A file that cannot be opened gives an already finished
    /// generator.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Self::new(BufReader::new(file)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot open token file");
                Self {
                    reader: None,
                    pending: VecDeque::new(),
                    line: String::new(),
                    finished: true,
                    _item: PhantomData,
                }
            }
        }
    }
}

impl<R: BufRead, T> TokenGenerator<R, T> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            pending: VecDeque::new(),
            line: String::new(),
            finished: false,
            _item: PhantomData,
        }
    }

    /// Next raw token, reading further lines as needed.
    fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let reader = self.reader.as_mut()?;
            self.line.clear();
            match reader.read_line(&mut self.line) {
                Ok(0) | Err(_) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => self
                    .pending
                    .extend(self.line.split_whitespace().map(str::to_owned)),
            }
        }
    }
}

impl<R, T> Generator for TokenGenerator<R, T>
where
    R: BufRead,
    T: FromStr + Default,
{
    type Item = T;

    fn generate(&mut self) -> T {
        match self.next_token().map(|token| token.parse::<T>()) {
            Some(Ok(value)) => value,
            _ => {
                self.finished = true;
                T::default()
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Adapts any iterator, looking one item ahead.
///
/// Finished as soon as the iterator has nothing left, so the last item closes
/// the stream.
pub struct IterGenerator<I: Iterator> {
    iter: I,
    next: Option<I::Item>,
}

impl<I: Iterator> IterGenerator<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        let mut iter = iter.into_iter();
        let next = iter.next();
        Self { iter, next }
    }
}

impl<I> Generator for IterGenerator<I>
where
    I: Iterator,
    I::Item: Default,
{
    type Item = I::Item;

    fn generate(&mut self) -> I::Item {
        let current = self.next.take().unwrap_or_default();
        self.next = self.iter.next();
        current
    }

    fn is_finished(&self) -> bool {
        self.next.is_none()
    }
}
