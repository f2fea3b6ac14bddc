//! Error-reporting policies.
//!
//! The arbiter never fails a `validate` call for a domain anomaly. Duplicates,
//! gaps, fills and losses are surfaced through an [`ErrorReportingPolicy`]
//! instead, which callers wire to logging, metrics or nothing at all.
//! Callbacks run on the hot path, so implementations must not block.

use serde::{Deserialize, Serialize};

use crate::sequence::SequenceNumber;

/// Capability set the arbiter reports through. Every method defaults to a no-op.
pub trait ErrorReportingPolicy<S: SequenceNumber> {
    /// The same line re-sent a sequence it already confirmed.
    fn duplicate_on_line(&mut self, _line: usize, _sequence: S) {}

    /// A recoverable forward gap was opened and placeholders were created.
    fn gap(&mut self, _start: S, _length: S) {}

    /// A previously open placeholder was confirmed.
    fn gap_fill(&mut self, _sequence: S, _length: S) {}

    /// `slow_line`'s tracked slot was overwritten by `overrun_by_line`.
    fn line_position_overrun(&mut self, _slow_line: usize, _overrun_by_line: usize) {}

    /// A span of sequence numbers can never be confirmed.
    fn unrecoverable_gap(&mut self, _start: S, _length: S) {}

    /// `line` never confirmed `sequence` before its slot was evicted.
    fn unrecoverable_line_gap(&mut self, _line: usize, _sequence: S) {}

    /// The very first message was behind the first expected sequence.
    fn first_sequence_out_of_order(&mut self, _line: usize, _sequence: S) {}
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullErrorReportingPolicy;

impl<S: SequenceNumber> ErrorReportingPolicy<S> for NullErrorReportingPolicy {}

impl<S: SequenceNumber, P: ErrorReportingPolicy<S> + ?Sized> ErrorReportingPolicy<S> for &mut P {
    fn duplicate_on_line(&mut self, line: usize, sequence: S) {
        (**self).duplicate_on_line(line, sequence);
    }

    fn gap(&mut self, start: S, length: S) {
        (**self).gap(start, length);
    }

    fn gap_fill(&mut self, sequence: S, length: S) {
        (**self).gap_fill(sequence, length);
    }

    fn line_position_overrun(&mut self, slow_line: usize, overrun_by_line: usize) {
        (**self).line_position_overrun(slow_line, overrun_by_line);
    }

    fn unrecoverable_gap(&mut self, start: S, length: S) {
        (**self).unrecoverable_gap(start, length);
    }

    fn unrecoverable_line_gap(&mut self, line: usize, sequence: S) {
        (**self).unrecoverable_line_gap(line, sequence);
    }

    fn first_sequence_out_of_order(&mut self, line: usize, sequence: S) {
        (**self).first_sequence_out_of_order(line, sequence);
    }
}

/// Reports to both policies, left first.
impl<S, A, B> ErrorReportingPolicy<S> for (A, B)
where
    S: SequenceNumber,
    A: ErrorReportingPolicy<S>,
    B: ErrorReportingPolicy<S>,
{
    fn duplicate_on_line(&mut self, line: usize, sequence: S) {
        self.0.duplicate_on_line(line, sequence);
        self.1.duplicate_on_line(line, sequence);
    }

    fn gap(&mut self, start: S, length: S) {
        self.0.gap(start, length);
        self.1.gap(start, length);
    }

    fn gap_fill(&mut self, sequence: S, length: S) {
        self.0.gap_fill(sequence, length);
        self.1.gap_fill(sequence, length);
    }

    fn line_position_overrun(&mut self, slow_line: usize, overrun_by_line: usize) {
        self.0.line_position_overrun(slow_line, overrun_by_line);
        self.1.line_position_overrun(slow_line, overrun_by_line);
    }

    fn unrecoverable_gap(&mut self, start: S, length: S) {
        self.0.unrecoverable_gap(start, length);
        self.1.unrecoverable_gap(start, length);
    }

    fn unrecoverable_line_gap(&mut self, line: usize, sequence: S) {
        self.0.unrecoverable_line_gap(line, sequence);
        self.1.unrecoverable_line_gap(line, sequence);
    }

    fn first_sequence_out_of_order(&mut self, line: usize, sequence: S) {
        self.0.first_sequence_out_of_order(line, sequence);
        self.1.first_sequence_out_of_order(line, sequence);
    }
}

/// Forwards reports to the `log` facade.
///
/// Losses, duplicates and overruns go out at `warn`, gaps and fills at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPolicy;

impl<S: SequenceNumber> ErrorReportingPolicy<S> for LoggingPolicy {
    fn duplicate_on_line(&mut self, line: usize, sequence: S) {
        log::warn!("duplicate on line {line}: sequence {sequence}");
    }

    fn gap(&mut self, start: S, length: S) {
        log::debug!("gap opened at {start}, length {length}");
    }

    fn gap_fill(&mut self, sequence: S, length: S) {
        log::debug!("gap filled at {sequence}, length {length}");
    }

    fn line_position_overrun(&mut self, slow_line: usize, overrun_by_line: usize) {
        log::warn!("line {slow_line} overrun by line {overrun_by_line}");
    }

    fn unrecoverable_gap(&mut self, start: S, length: S) {
        log::warn!("unrecoverable gap at {start}, length {length}");
    }

    fn unrecoverable_line_gap(&mut self, line: usize, sequence: S) {
        log::warn!("line {line} never reported sequence {sequence}");
    }

    fn first_sequence_out_of_order(&mut self, line: usize, sequence: S) {
        log::warn!("first message on line {line} out of order: sequence {sequence}");
    }
}

/// One policy callback, as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ArbiterEvent<S> {
    DuplicateOnLine { line: usize, sequence: S },
    Gap { start: S, length: S },
    GapFill { sequence: S, length: S },
    LinePositionOverrun { slow_line: usize, overrun_by_line: usize },
    UnrecoverableGap { start: S, length: S },
    UnrecoverableLineGap { line: usize, sequence: S },
    FirstSequenceOutOfOrder { line: usize, sequence: S },
}

/// Adapts a closure receiving [`ArbiterEvent`]s into a policy.
pub struct EventPolicy<F> {
    sink: F,
}

impl<F> EventPolicy<F> {
    pub fn new(sink: F) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> F {
        self.sink
    }
}

impl<S, F> ErrorReportingPolicy<S> for EventPolicy<F>
where
    S: SequenceNumber,
    F: FnMut(ArbiterEvent<S>),
{
    fn duplicate_on_line(&mut self, line: usize, sequence: S) {
        (self.sink)(ArbiterEvent::DuplicateOnLine { line, sequence });
    }

    fn gap(&mut self, start: S, length: S) {
        (self.sink)(ArbiterEvent::Gap { start, length });
    }

    fn gap_fill(&mut self, sequence: S, length: S) {
        (self.sink)(ArbiterEvent::GapFill { sequence, length });
    }

    fn line_position_overrun(&mut self, slow_line: usize, overrun_by_line: usize) {
        (self.sink)(ArbiterEvent::LinePositionOverrun {
            slow_line,
            overrun_by_line,
        });
    }

    fn unrecoverable_gap(&mut self, start: S, length: S) {
        (self.sink)(ArbiterEvent::UnrecoverableGap { start, length });
    }

    fn unrecoverable_line_gap(&mut self, line: usize, sequence: S) {
        (self.sink)(ArbiterEvent::UnrecoverableLineGap { line, sequence });
    }

    fn first_sequence_out_of_order(&mut self, line: usize, sequence: S) {
        (self.sink)(ArbiterEvent::FirstSequenceOutOfOrder { line, sequence });
    }
}

/// Collects every report in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPolicy<S> {
    events: Vec<ArbiterEvent<S>>,
}

impl<S: SequenceNumber> RecordingPolicy<S> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[ArbiterEvent<S>] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<ArbiterEvent<S>> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn push(&mut self, event: ArbiterEvent<S>) {
        self.events.push(event);
    }
}

impl<S: SequenceNumber> ErrorReportingPolicy<S> for RecordingPolicy<S> {
    fn duplicate_on_line(&mut self, line: usize, sequence: S) {
        self.push(ArbiterEvent::DuplicateOnLine { line, sequence });
    }

    fn gap(&mut self, start: S, length: S) {
        self.push(ArbiterEvent::Gap { start, length });
    }

    fn gap_fill(&mut self, sequence: S, length: S) {
        self.push(ArbiterEvent::GapFill { sequence, length });
    }

    fn line_position_overrun(&mut self, slow_line: usize, overrun_by_line: usize) {
        self.push(ArbiterEvent::LinePositionOverrun {
            slow_line,
            overrun_by_line,
        });
    }

    fn unrecoverable_gap(&mut self, start: S, length: S) {
        self.push(ArbiterEvent::UnrecoverableGap { start, length });
    }

    fn unrecoverable_line_gap(&mut self, line: usize, sequence: S) {
        self.push(ArbiterEvent::UnrecoverableLineGap { line, sequence });
    }

    fn first_sequence_out_of_order(&mut self, line: usize, sequence: S) {
        self.push(ArbiterEvent::FirstSequenceOutOfOrder { line, sequence });
    }
}

/// Per-kind report counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub duplicate_on_line: u64,
    pub gaps: u64,
    pub gap_fills: u64,
    pub line_position_overruns: u64,
    pub unrecoverable_gaps: u64,
    /// Total length of every unrecoverable gap span.
    pub unrecoverable_sequences: u64,
    pub unrecoverable_line_gaps: u64,
    pub first_sequence_out_of_order: u64,
}

impl EventCounts {
    pub fn total(&self) -> u64 {
        self.duplicate_on_line
            + self.gaps
            + self.gap_fills
            + self.line_position_overruns
            + self.unrecoverable_gaps
            + self.unrecoverable_line_gaps
            + self.first_sequence_out_of_order
    }
}

impl<S: SequenceNumber> ErrorReportingPolicy<S> for EventCounts {
    fn duplicate_on_line(&mut self, _line: usize, _sequence: S) {
        self.duplicate_on_line += 1;
    }

    fn gap(&mut self, _start: S, _length: S) {
        self.gaps += 1;
    }

    fn gap_fill(&mut self, _sequence: S, _length: S) {
        self.gap_fills += 1;
    }

    fn line_position_overrun(&mut self, _slow_line: usize, _overrun_by_line: usize) {
        self.line_position_overruns += 1;
    }

    fn unrecoverable_gap(&mut self, _start: S, length: S) {
        self.unrecoverable_gaps += 1;
        self.unrecoverable_sequences = self.unrecoverable_sequences.saturating_add(length.to_u64());
    }

    fn unrecoverable_line_gap(&mut self, _line: usize, _sequence: S) {
        self.unrecoverable_line_gaps += 1;
    }

    fn first_sequence_out_of_order(&mut self, _line: usize, _sequence: S) {
        self.first_sequence_out_of_order += 1;
    }
}
