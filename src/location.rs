//! Rate-limited polling source for live satellite positions.
//!
//! [`LocationSource`] issues one `GET {endpoint}{id}` request per rate
//! interval and yields each parsed body as a [`PositionRecord`]. It is
//! demand-driven: all work happens inside [`Source::next`], so a consumer
//! that stops asking stops the polling, and the single-outstanding-request
//! invariant holds structurally - a request and a timer can never overlap
//! because both live inside the same `next()` call.

use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::PositionRecord;
use crate::traits::Source;

/// Where The ISS At satellite endpoint, the default upstream.
pub const DEFAULT_ENDPOINT: &str = "https://api.wheretheiss.at/v1/satellites/";

/// Default and minimum spacing between the start of consecutive requests.
pub const MIN_RATE: Duration = Duration::from_millis(1000);

/// Environment toggle that enables TLS certificate validation by default.
pub const STRICT_SSL_ENV: &str = "SATSTREAM_STRICT_SSL";

/// Environment toggle that disables the minimum-rate validation check.
pub const DISABLE_RATE_LIMIT_ENV: &str = "SATSTREAM_DISABLE_RATE_LIMIT";

/// Builder for [`LocationSource`].
///
/// The environment toggles are read once, when the builder is created;
/// afterwards the source is a pure function of its explicit configuration.
#[derive(Debug, Clone)]
pub struct LocationSourceBuilder {
    id: Option<u32>,
    endpoint: String,
    rate: Duration,
    strict_ssl: bool,
    enforce_min_rate: bool,
}

impl Default for LocationSourceBuilder {
    fn default() -> Self {
        Self {
            id: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            rate: MIN_RATE,
            strict_ssl: std::env::var_os(STRICT_SSL_ENV).is_some(),
            enforce_min_rate: std::env::var_os(DISABLE_RATE_LIMIT_ENV).is_none(),
        }
    }
}

impl LocationSourceBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// The NORAD catalog id of the satellite to track (required)
    pub fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Base URL of the upstream API; the request URL is `endpoint + id`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Minimum spacing between the start of consecutive requests
    pub fn rate(mut self, rate: Duration) -> Self {
        self.rate = rate;
        self
    }

    /// Whether to validate TLS certificates on the request
    pub fn strict_ssl(mut self, strict_ssl: bool) -> Self {
        self.strict_ssl = strict_ssl;
        self
    }

    /// Whether to enforce the minimum-rate check at build time
    pub fn enforce_min_rate(mut self, enforce: bool) -> Self {
        self.enforce_min_rate = enforce;
        self
    }

    /// Validate the configuration and build the source.
    ///
    /// Fails with [`Error::InvalidArgument`] when the id is missing or the
    /// rate is below [`MIN_RATE`] while the check is enforced.
    pub fn build(self) -> Result<LocationSource> {
        let id = self
            .id
            .ok_or_else(|| Error::invalid_argument("`id` is a required parameter"))?;

        if self.enforce_min_rate && self.rate < MIN_RATE {
            return Err(Error::invalid_argument(format!(
                "rate cannot be less than {}ms",
                MIN_RATE.as_millis()
            )));
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!self.strict_ssl)
            .build()?;

        let url = format!("{}{}", self.endpoint, id);
        debug!(id, rate_ms = self.rate.as_millis() as u64, %url, "location source instantiated");

        Ok(LocationSource {
            client,
            url,
            rate: self.rate,
            state: PollState::Idle,
            cancel: CancellationToken::new(),
        })
    }
}

/// Polling lifecycle of a [`LocationSource`].
///
/// Invariant: a request in flight and an armed timer are mutually
/// exclusive. `Armed` only records the deadline; the actual sleep happens
/// inside the next demand call, so no timer runs while nobody is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    /// No request issued yet, or demand was paused by backpressure
    Idle,
    /// A record was delivered; the next request may not start before `next_at`
    Armed { next_at: Instant },
    /// Terminal; all further demand is a no-op
    Closed,
}

/// A demand-driven source of [`PositionRecord`]s for one satellite.
///
/// Any fetch or parse failure is terminal: the source closes itself and the
/// error propagates to the caller. There are no retries.
///
/// # Examples
///
/// ```rust,no_run
/// use satstream::location::LocationSource;
/// use satstream::traits::Source;
///
/// # async fn run() -> satstream::error::Result<()> {
/// let mut source = LocationSource::builder().id(25544).build()?;
/// while let Some(record) = source.next().await? {
///     println!("{:?} {:?}", record.latitude(), record.longitude());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LocationSource {
    client: reqwest::Client,
    url: String,
    rate: Duration,
    state: PollState,
    cancel: CancellationToken,
}

impl LocationSource {
    /// Start building a source
    pub fn builder() -> LocationSourceBuilder {
        LocationSourceBuilder::new()
    }

    /// A handle that can close this source from outside the demand loop
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            cancel: self.cancel.clone(),
        }
    }

    /// Close the source. Idempotent.
    ///
    /// No further requests are issued and no timers are re-armed; the next
    /// demand call observes the terminal signal. Safe to call before any
    /// data has flowed or after the source already failed.
    pub fn close(&mut self) {
        if self.state != PollState::Closed {
            debug!(url = %self.url, "location source closed");
        }
        self.state = PollState::Closed;
        self.cancel.cancel();
    }

    /// Whether the source has been closed
    pub fn is_closed(&self) -> bool {
        self.state == PollState::Closed || self.cancel.is_cancelled()
    }
}

#[async_trait::async_trait]
impl Source for LocationSource {
    type Item = PositionRecord;

    async fn next(&mut self) -> Result<Option<PositionRecord>> {
        match self.state {
            PollState::Closed => return Ok(None),
            PollState::Idle => {
                debug!(url = %self.url, "demand received, issuing request immediately");
            }
            PollState::Armed { next_at } => {
                // Wait out the remainder of the rate interval. A deadline in
                // the past resolves immediately - a slow upstream never
                // produces a negative delay.
                let cancel = self.cancel.clone();
                let closed = tokio::select! {
                    _ = cancel.cancelled() => true,
                    _ = time::sleep_until(next_at) => false,
                };
                if closed {
                    self.state = PollState::Closed;
                    return Ok(None);
                }
            }
        }

        if self.cancel.is_cancelled() {
            self.state = PollState::Closed;
            return Ok(None);
        }

        let started = Instant::now();
        let fetched = {
            let cancel = self.cancel.clone();
            tokio::select! {
                _ = cancel.cancelled() => None,
                result = fetch_record(&self.client, &self.url) => Some(result),
            }
        };

        // Re-check after the suspension point: a close that raced the fetch
        // wins, and the fetched result is discarded.
        let result = match fetched {
            Some(result) if !self.cancel.is_cancelled() => result,
            _ => {
                self.state = PollState::Closed;
                return Ok(None);
            }
        };

        match result {
            Ok(record) => {
                // Rate limit against the request start, so request latency
                // does not accumulate drift between cycles.
                self.state = PollState::Armed {
                    next_at: started + self.rate,
                };
                Ok(Some(record))
            }
            Err(err) => {
                warn!(url = %self.url, error = %err, "request cycle failed, closing source");
                self.close();
                Err(err)
            }
        }
    }
}

async fn fetch_record(client: &reqwest::Client, url: &str) -> Result<PositionRecord> {
    debug!(%url, "fetching position");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::UpstreamStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(Error::EmptyResponse);
    }

    let record: PositionRecord = serde_json::from_slice(&body)?;
    debug!(
        latitude = ?record.latitude(),
        longitude = ?record.longitude(),
        "position received"
    );
    Ok(record)
}

/// Clonable handle that closes a [`LocationSource`] from outside the
/// demand loop, even while a fetch or a rate timer is pending.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    cancel: CancellationToken,
}

impl CloseHandle {
    /// Close the associated source. Idempotent.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}
