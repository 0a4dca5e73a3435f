//! Sink implementations.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

use crate::error::{Error, Result};
use crate::traits::{Sink, WriteOutcome};

/// A sink that collects items and the signals it receives.
///
/// Besides the items themselves it records every out-of-band error and
/// every terminal signal, so a caller can assert on the exact signal
/// sequence a pipeline delivered. Clones share the same storage.
pub struct CollectSink<T> {
    inner: Arc<TokioMutex<Collected<T>>>,
}

#[derive(Debug)]
struct Collected<T> {
    items: Vec<T>,
    errors: Vec<Error>,
    finish_count: usize,
}

impl<T: Send + 'static> CollectSink<T> {
    /// Create a new collect sink
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokioMutex::new(Collected {
                items: Vec::new(),
                errors: Vec::new(),
                finish_count: 0,
            })),
        }
    }

    /// Clone of the collected items
    pub async fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().await.items.clone()
    }

    /// Number of items collected so far
    pub async fn len(&self) -> usize {
        self.inner.lock().await.items.len()
    }

    /// Out-of-band errors received via [`Sink::fail`]
    pub async fn errors(&self) -> Vec<Error> {
        self.inner.lock().await.errors.clone()
    }

    /// How many terminal signals have been received
    pub async fn finish_count(&self) -> usize {
        self.inner.lock().await.finish_count
    }
}

impl<T: Send + 'static> Default for CollectSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CollectSink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Sink for CollectSink<T> {
    type Item = T;

    async fn write(&mut self, item: Self::Item) -> Result<WriteOutcome> {
        self.inner.lock().await.items.push(item);
        Ok(WriteOutcome::Ready)
    }

    async fn fail(&mut self, error: &Error) -> Result<()> {
        self.inner.lock().await.errors.push(error.clone());
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.inner.lock().await.finish_count += 1;
        Ok(())
    }
}

/// A sink that counts items and discards them.
pub struct CountSink<T> {
    count: Arc<TokioMutex<usize>>,
    _phantom: PhantomData<T>,
}

impl<T> CountSink<T> {
    /// Create a new count sink
    pub fn new() -> Self {
        Self {
            count: Arc::new(TokioMutex::new(0)),
            _phantom: PhantomData,
        }
    }

    /// The current count
    pub async fn count(&self) -> usize {
        *self.count.lock().await
    }
}

impl<T> Default for CountSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CountSink<T> {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Sink for CountSink<T> {
    type Item = T;

    async fn write(&mut self, _item: Self::Item) -> Result<WriteOutcome> {
        *self.count.lock().await += 1;
        Ok(WriteOutcome::Ready)
    }
}
