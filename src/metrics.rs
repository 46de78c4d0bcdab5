use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};

use crate::error::QueryPhase;

#[derive(Debug)]
pub struct QueryMetrics {
    attempts: Counter<u64>,
    failures: Counter<u64>,
    duration: Histogram<u64>,
}

impl QueryMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            attempts: meter.u64_counter("mcstatus_query_total").build(),
            failures: meter.u64_counter("mcstatus_query_fail_total").build(),
            duration: meter.u64_histogram("mcstatus_query_time_ms").build(),
        }
    }

    pub fn record_attempt(&self) {
        self.attempts.add(1, &[]);
    }

    pub fn record_failure(&self, phase: QueryPhase) {
        self.failures
            .add(1, &[KeyValue::new("phase", phase.as_str())]);
    }

    pub fn record_duration(&self, elapsed_ms: u64) {
        self.duration.record(elapsed_ms, &[]);
    }
}
