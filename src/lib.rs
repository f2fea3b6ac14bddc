//! Bounded-memory sequence arbiter for redundant A/B line feeds.
//!
//! One logical, sequence-numbered stream arrives on several lines. The
//! [`SequenceArbiter`] accepts the first observation of each sequence number
//! and discards redundant copies, recovering late or out-of-order messages
//! within a fixed lookback window. Anomalies are reported through an
//! [`ErrorReportingPolicy`] rather than as errors.

pub mod arbiter;
pub mod config;
pub mod error;
pub mod policy;
pub mod sequence;

pub use arbiter::{AdvancerState, SequenceArbiter, MAX_LINES};
pub use config::{ArbiterConfig, Limits};
pub use error::{Error, Result};
pub use policy::{
    ArbiterEvent, ErrorReportingPolicy, EventCounts, EventPolicy, LoggingPolicy,
    NullErrorReportingPolicy, RecordingPolicy,
};
pub use sequence::SequenceNumber;
