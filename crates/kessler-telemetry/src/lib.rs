//! # kessler-telemetry
//!
//! Telemetry for the contact engine. The effector emits structured
//! events (phase results, solver statistics, step rejections) into a
//! bounded buffer; sinks consume them on `flush`, aggregating per body
//! pair or forwarding to `tracing`.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{ContactEvent, EventKind};
pub use sinks::{EventSink, PairStats, PairStatsSink, TracingSink};
