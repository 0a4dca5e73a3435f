//! Stateful per-record delta computation.

use tokio::time::Instant;
use tracing::trace;

use crate::error::Result;
use crate::record::{DeltaRecord, PositionRecord};
use crate::traits::Processor;

/// Attaches first-order rates of change to a stream of position records.
///
/// For each record after the first, `latitude_delta` and `longitude_delta`
/// are the field differences versus the immediately preceding record,
/// divided by the wall-clock seconds elapsed between arrivals. The first
/// record passes through with both fields `None`.
///
/// The processor is total: it never fails, holds no more than one record of
/// state, and forwards every record immediately. Two records arriving in
/// the same instant divide by zero; the resulting non-finite quotient is
/// forwarded unchanged rather than suppressed.
#[derive(Debug, Default)]
pub struct DeltaProcessor {
    last: Option<(PositionRecord, Instant)>,
}

impl DeltaProcessor {
    /// Create a processor with no prior record
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Processor for DeltaProcessor {
    type Input = PositionRecord;
    type Output = DeltaRecord;

    async fn process(&mut self, record: PositionRecord) -> Result<Vec<DeltaRecord>> {
        let now = Instant::now();

        let (latitude_delta, longitude_delta) = match &self.last {
            Some((prior, prior_at)) => {
                let elapsed = now.duration_since(*prior_at).as_secs_f64();
                // Missing fields contribute NaN, matching the passthrough
                // treatment of malformed-but-parseable upstream payloads.
                let lat = record.latitude().unwrap_or(f64::NAN);
                let lon = record.longitude().unwrap_or(f64::NAN);
                let prior_lat = prior.latitude().unwrap_or(f64::NAN);
                let prior_lon = prior.longitude().unwrap_or(f64::NAN);
                (
                    Some((lat - prior_lat) / elapsed),
                    Some((lon - prior_lon) / elapsed),
                )
            }
            None => (None, None),
        };

        trace!(?latitude_delta, ?longitude_delta, "delta computed");

        // Replace held state wholesale, even on the first record, to seed
        // the next computation.
        self.last = Some((record.clone(), now));

        Ok(vec![DeltaRecord {
            record,
            latitude_delta,
            longitude_delta,
        }])
    }
}
