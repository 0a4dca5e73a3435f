//! Shared test support: a local mock of the satellite position API and a
//! sink that closes the source after a fixed number of records.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::Mutex as TokioMutex;
use tokio::time::Instant;

use satstream::error::{Error, Result};
use satstream::location::CloseHandle;
use satstream::traits::{Sink, WriteOutcome};

/// What the mock endpoint answers with.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// JSON positions with strictly increasing latitude per request
    Positions,
    /// Positions, each delayed by the given duration before responding
    SlowPositions(Duration),
    /// The given non-success status code, no body
    Error(u16),
    /// 200 with an empty body
    EmptyBody,
    /// 200 with a body that is not valid JSON
    MalformedBody,
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    hits: Arc<AtomicUsize>,
}

/// A local stand-in for the satellite position API.
pub struct MockApi {
    /// Base URL ending in `/`, ready to be joined with a satellite id
    pub endpoint: String,
    hits: Arc<AtomicUsize>,
}

impl MockApi {
    pub async fn start(behavior: Behavior) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            behavior,
            hits: hits.clone(),
        };
        let app = Router::new()
            .route("/v1/satellites/{id}", get(satellite))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{addr}/v1/satellites/"),
            hits,
        }
    }

    /// How many requests the mock has served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn satellite(State(state): State<MockState>, Path(id): Path<u32>) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    match state.behavior {
        Behavior::Positions => position(id, hit).into_response(),
        Behavior::SlowPositions(delay) => {
            tokio::time::sleep(delay).await;
            position(id, hit).into_response()
        }
        Behavior::Error(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Behavior::EmptyBody => StatusCode::OK.into_response(),
        Behavior::MalformedBody => (StatusCode::OK, "{\"latitude\": oops").into_response(),
    }
}

fn position(id: u32, hit: usize) -> Json<serde_json::Value> {
    Json(json!({
        "name": "iss",
        "id": id,
        "latitude": 10.0 + hit as f64,
        "longitude": 20.0 + 2.0 * hit as f64,
        "altitude": 420.0,
        "units": "kilometers",
    }))
}

#[derive(Debug)]
struct Taken<T> {
    items: Vec<(T, Instant)>,
    errors: Vec<Error>,
    finish_count: usize,
}

/// A sink that accepts a fixed number of records, then closes the source.
///
/// Arrival instants are recorded for inter-arrival timing assertions.
/// Clones share storage.
pub struct TakeSink<T> {
    limit: usize,
    handle: CloseHandle,
    inner: Arc<TokioMutex<Taken<T>>>,
}

impl<T: Send + 'static> TakeSink<T> {
    pub fn new(limit: usize, handle: CloseHandle) -> Self {
        Self {
            limit,
            handle,
            inner: Arc::new(TokioMutex::new(Taken {
                items: Vec::new(),
                errors: Vec::new(),
                finish_count: 0,
            })),
        }
    }

    pub async fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().await.items.iter().map(|(item, _)| item.clone()).collect()
    }

    pub async fn arrivals(&self) -> Vec<Instant> {
        self.inner.lock().await.items.iter().map(|(_, at)| *at).collect()
    }

    pub async fn errors(&self) -> Vec<Error> {
        self.inner.lock().await.errors.clone()
    }

    pub async fn finish_count(&self) -> usize {
        self.inner.lock().await.finish_count
    }
}

impl<T> Clone for TakeSink<T> {
    fn clone(&self) -> Self {
        Self {
            limit: self.limit,
            handle: self.handle.clone(),
            inner: self.inner.clone(),
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Sink for TakeSink<T> {
    type Item = T;

    async fn write(&mut self, item: T) -> Result<WriteOutcome> {
        let mut taken = self.inner.lock().await;
        taken.items.push((item, Instant::now()));
        if taken.items.len() >= self.limit {
            self.handle.close();
        }
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
