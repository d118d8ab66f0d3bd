//! `roundtrip` command implementation.
//!
//! Transport self-test: every enabled record is encoded on the coordinating side,
//! decoded by a pool of concurrent workers and compared bit for bit with the original.

use std::sync::Arc;

use observability::{TransportStatsAggregator, TransportSummary};
use sensors::{Envelope, SensorSuite};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::load_suite;
use crate::cli::RoundtripArgs;
use crate::error::{CliError, Result};

/// Execute the `roundtrip` command
pub async fn run_roundtrip(args: &RoundtripArgs) -> Result<()> {
    let (suite, _) = load_suite(&args.config)?;
    suite.validate().into_result()?;

    let summary = roundtrip(suite, usize::from(args.workers)).await?;
    print!("{}", summary);

    if summary.failures > 0 {
        return Err(CliError::RoundTrip {
            failures: summary.failures,
            total: summary.round_trips + summary.failures,
        });
    }
    Ok(())
}

async fn roundtrip(suite: SensorSuite, workers: usize) -> Result<TransportSummary> {
    let envelopes = sensors::encode_suite(&suite)?;
    info!(
        payloads = envelopes.len(),
        workers, "dispatching payloads to decode workers"
    );

    let suite = Arc::new(suite);
    let mut shares: Vec<Vec<Envelope>> = (0..workers).map(|_| Vec::new()).collect();
    for (i, envelope) in envelopes.into_iter().enumerate() {
        shares[i % workers].push(envelope);
    }

    let mut tasks = JoinSet::new();
    for (worker, share) in shares.into_iter().enumerate() {
        if share.is_empty() {
            continue;
        }
        let suite = Arc::clone(&suite);
        tasks.spawn(async move { decode_share(worker, &suite, share) });
    }

    let mut total = TransportStatsAggregator::new();
    while let Some(joined) = tasks.join_next().await {
        let stats = joined.map_err(|e| CliError::task(e.to_string()))?;
        total.merge(stats);
    }
    Ok(total.summary())
}

fn decode_share(
    worker: usize,
    suite: &SensorSuite,
    share: Vec<Envelope>,
) -> TransportStatsAggregator {
    let mut stats = TransportStatsAggregator::new();
    for envelope in share {
        let header = envelope.header;
        match sensors::verify_payload(suite, &envelope.payload) {
            Ok((_, true)) => {
                debug!(
                    worker,
                    kind = %header.kind,
                    record = %header.record,
                    "payload round tripped"
                );
                stats.record_round_trip(header.kind, header.record, envelope.payload.len());
            }
            Ok((_, false)) => {
                error!(
                    worker,
                    kind = %header.kind,
                    record = %header.record,
                    "decoded record differs from the original"
                );
                stats.record_failure();
            }
            Err(e) => {
                error!(
                    worker,
                    kind = %header.kind,
                    record = %header.record,
                    error = %e,
                    "decode failed"
                );
                stats.record_failure();
            }
        }
    }
    stats
}
