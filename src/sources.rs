//! General-purpose source implementations.
//!
//! [`LocationSource`](crate::location::LocationSource) is the production
//! source; the sources here drive the downstream stages without a network.

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::error::Result;
use crate::traits::Source;

/// A source that yields items from a vector, then ends.
pub struct VecSource<T> {
    items: VecDeque<T>,
}

impl<T> VecSource<T> {
    /// Create a new vector source
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Add another item to the back of the queue
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Number of remaining items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the source is exhausted
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<T: Send + 'static> Source for VecSource<T> {
    type Item = T;

    async fn next(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.items.pop_front())
    }
}
