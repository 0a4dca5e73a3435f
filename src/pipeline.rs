//! Pipeline orchestration.
//!
//! A [`Pipeline`] pulls from a [`Source`], pushes each item through a
//! [`Processor`], and delivers the outputs to a [`Sink`], honoring the
//! sink's acceptance signal: after a [`WriteOutcome::Full`] the driver
//! stops demanding from the source until [`Sink::ready`] resolves, so a
//! paused consumer pauses the producer instead of forcing it to buffer
//! or drop.

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::traits::{Processor, Sink, Source, WriteOutcome};

/// A processor that forwards items unchanged.
///
/// Composes a source directly with a sink when no transform is wanted.
pub struct IdentityProcessor<T> {
    _phantom: PhantomData<T>,
}

impl<T> IdentityProcessor<T> {
    /// Create a new identity processor
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for IdentityProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + 'static> Processor for IdentityProcessor<T> {
    type Input = T;
    type Output = T;

    async fn process(&mut self, item: Self::Input) -> Result<Vec<Self::Output>> {
        Ok(vec![item])
    }
}

/// Connects a source and a processor; [`Pipeline::sink`] runs the loop.
///
/// # Examples
///
/// ```rust,no_run
/// use satstream::delta::DeltaProcessor;
/// use satstream::location::LocationSource;
/// use satstream::pipeline::Pipeline;
/// use satstream::sinks::CollectSink;
///
/// # async fn run() -> satstream::error::Result<()> {
/// let source = LocationSource::builder().id(25544).build()?;
/// let sink = CollectSink::new();
/// Pipeline::new(source, DeltaProcessor::new()).sink(sink).await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<S, P> {
    source: S,
    processor: P,
}

impl<S, P> Pipeline<S, P>
where
    S: Source + Send,
    P: Processor<Input = S::Item> + Send,
    P::Output: Send + 'static,
{
    /// Create a new pipeline
    pub fn new(source: S, processor: P) -> Self {
        Self { source, processor }
    }

    /// Drive the pipeline to completion into `sink`.
    ///
    /// On a source or processor error the sink receives exactly one
    /// out-of-band error signal followed by exactly one terminal signal,
    /// and the error is returned to the caller.
    pub async fn sink<K>(mut self, mut sink: K) -> Result<()>
    where
        K: Sink<Item = P::Output> + Send,
    {
        loop {
            let item = match self.source.next().await {
                Ok(Some(item)) => item,
                Ok(None) => {
                    trace!("source exhausted");
                    return Self::shutdown(&mut self.processor, &mut sink).await;
                }
                Err(err) => {
                    return Self::abort(&mut sink, err).await;
                }
            };

            let outputs = match self.processor.process(item).await {
                Ok(outputs) => outputs,
                Err(err) => {
                    return Self::abort(&mut sink, err).await;
                }
            };

            for output in outputs {
                if sink.write(output).await? == WriteOutcome::Full {
                    // The item was accepted; pause demand until the sink
                    // asks for more. No request runs while we wait here.
                    trace!("sink full, pausing demand");
                    sink.ready().await?;
                }
            }
        }
    }

    async fn shutdown<K>(processor: &mut P, sink: &mut K) -> Result<()>
    where
        K: Sink<Item = P::Output> + Send,
    {
        let tail = processor.finish().await?;
        for output in tail {
            sink.write(output).await?;
        }
        sink.finish().await
    }

    async fn abort<K>(sink: &mut K, err: Error) -> Result<()>
    where
        K: Sink<Item = P::Output> + Send,
    {
        debug!(error = %err, "pipeline failed, signaling sink");
        sink.fail(&err).await?;
        sink.finish().await?;
        Err(err)
    }
}
