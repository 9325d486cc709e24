//! # Metrics Reporter
//!
//! Publishes per-operation durations on the message bus. Metrics are
//! best-effort: publish failures are logged and dropped, and a reporter
//! built without a bus connection is a silent no-op (the degraded mode
//! used when bootstrap tolerates an unreachable bus).

use std::time::Duration;

use lib_common::connections::bus_redis::BusHandler;
use lib_common::utils::ids::unix_now;
use serde_json::json;
use tracing::warn;

const METRICS_SUBJECT: &str = "gateway-metrics";

#[derive(Debug)]
pub struct MetricsReporter {
    bus: Option<BusHandler>,
}

impl MetricsReporter {
    /// A reporter bound to a live bus connection.
    pub fn new(bus: BusHandler) -> Self {
        Self { bus: Some(bus) }
    }

    /// The degraded no-op reporter.
    pub fn disconnected() -> Self {
        Self { bus: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.bus.is_none()
    }

    /// Reports how long an orchestration operation took.
    pub async fn report_duration(&self, operation: &str, elapsed: Duration) {
        let Some(bus) = &self.bus else {
            return;
        };

        let payload = json!({
            "operation": operation,
            "duration_ms": elapsed.as_millis() as u64,
            "ts": unix_now(),
        });

        if let Err(err) = bus.publish(METRICS_SUBJECT, &payload.to_string()).await {
            warn!(error = %err, operation, "failed to publish duration metric");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn degraded_reporter_is_a_silent_noop() {
        let reporter = MetricsReporter::disconnected();
        assert!(reporter.is_degraded());

        // Must not panic or block.
        reporter
            .report_duration("download-all-auctions", Duration::from_millis(5))
            .await;
    }
}
