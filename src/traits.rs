//! Core traits for the position streaming pipeline.
//!
//! This module defines the seams between the polling source, the per-record
//! transform stages, and the consumer: a pull-based generator interface on
//! the producing side and a push interface with an explicit acceptance
//! signal on the consuming side, enabling demand-driven backpressure.

use crate::error::{Error, Result};
use async_trait::async_trait;

/// A source generates items on demand.
///
/// Sources are pull-based - they only perform work inside `next()`, when
/// explicitly asked by the downstream driver. A source that is not being
/// polled issues no requests and arms no timers, which is the producer's
/// only flow-control lever.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use satstream::error::Result;
/// use satstream::traits::Source;
///
/// struct CounterSource {
///     current: u64,
///     max: u64,
/// }
///
/// #[async_trait]
/// impl Source for CounterSource {
///     type Item = u64;
///
///     async fn next(&mut self) -> Result<Option<Self::Item>> {
///         if self.current <= self.max {
///             let item = self.current;
///             self.current += 1;
///             Ok(Some(item))
///         } else {
///             Ok(None) // Signal completion
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Source {
    /// The type of items this source generates
    type Item: Send + 'static;

    /// Produce the next item.
    ///
    /// `Ok(None)` is the terminal end-of-sequence signal; once returned, all
    /// subsequent calls must also return `Ok(None)`. `Err` ends the sequence
    /// as well - a failed source does not produce further items.
    async fn next(&mut self) -> Result<Option<Self::Item>>;
}

/// Acceptance signal returned by [`Sink::write`].
///
/// Modeled after push-based object streams: the written item is accepted in
/// both cases, the variant only tells the driver whether it may keep
/// delivering or has to wait for demand to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The item was accepted and more can follow immediately.
    Ready,
    /// The item was accepted, but the sink is at capacity. The driver must
    /// await [`Sink::ready`] before writing again.
    Full,
}

/// A sink consumes items pushed by the pipeline driver.
///
/// The three entry points map onto the three signals a consumer can
/// receive: data ([`write`](Sink::write)), an out-of-band error
/// ([`fail`](Sink::fail)) and the terminal end-of-sequence marker
/// ([`finish`](Sink::finish)).
#[async_trait]
pub trait Sink {
    /// The type of items this sink accepts
    type Item: Send + 'static;

    /// Accept a single item.
    ///
    /// Returning [`WriteOutcome::Full`] keeps the item but pauses the
    /// upstream driver until [`Sink::ready`] resolves. Items must never be
    /// dropped on `Full`.
    async fn write(&mut self, item: Self::Item) -> Result<WriteOutcome>;

    /// Wait until the sink can accept more items after reporting `Full`.
    ///
    /// The default resolves immediately, for sinks that never fill up.
    async fn ready(&mut self) -> Result<()> {
        Ok(())
    }

    /// Receive an out-of-band error signal, delivered before the terminal
    /// signal when the upstream sequence fails.
    async fn fail(&mut self, error: &Error) -> Result<()> {
        let _ = error;
        Ok(())
    }

    /// Receive the terminal end-of-sequence signal.
    ///
    /// Called exactly once per pipeline run, after the last item or after
    /// [`Sink::fail`].
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A processor transforms items between a source and a sink.
///
/// Processors are push-through: they receive exactly one item per
/// invocation, in arrival order, and their outputs are forwarded
/// immediately. Returning an empty `Vec` consumes the item without output.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use satstream::error::Result;
/// use satstream::traits::Processor;
///
/// struct DoubleProcessor;
///
/// #[async_trait]
/// impl Processor for DoubleProcessor {
///     type Input = i32;
///     type Output = i32;
///
///     async fn process(&mut self, item: Self::Input) -> Result<Vec<Self::Output>> {
///         Ok(vec![item * 2])
///     }
/// }
/// ```
#[async_trait]
pub trait Processor {
    /// The type of items this processor accepts
    type Input: Send + 'static;
    /// The type of items this processor produces
    type Output: Send + 'static;

    /// Process a single input item and produce zero or more output items.
    async fn process(&mut self, item: Self::Input) -> Result<Vec<Self::Output>>;

    /// Called when upstream is exhausted, allowing final output generation.
    ///
    /// Must not treat the end-of-sequence signal as data: state is left
    /// untouched by the default implementation.
    async fn finish(&mut self) -> Result<Vec<Self::Output>> {
        Ok(vec![])
    }
}
