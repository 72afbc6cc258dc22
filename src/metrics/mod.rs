//! Metrics instrumentation
//!
//! Counters go through the [`metrics`] facade. Nothing is recorded until the
//! embedding application installs a recorder (Prometheus exporter, etc.).

pub mod counters;
pub mod labels;
