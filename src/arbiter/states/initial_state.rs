use super::{write_filled, AdvanceContext};
use crate::arbiter::slot::SequenceSlot;
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// First message since construction or reset.
///
/// A message behind the first expected sequence is rejected and the arbiter
/// keeps waiting for a valid first message. A message ahead of it opens a
/// gap from the first expected sequence, clipped to the recoverable bound.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let first_expected = ctx.limits.first_expected;
    if sequence < first_expected {
        *ctx.first_call = true;
        ctx.policy.first_sequence_out_of_order(line, sequence);
        return false;
    }
    *ctx.first_call = false;

    let bound = ctx.limits.largest_recoverable_gap;
    let mut start = first_expected;
    let mut gap = sequence.distance(first_expected);
    if gap > bound {
        let lost = gap.distance(bound);
        ctx.policy.unrecoverable_gap(start, lost);
        start = start.offset(lost);
        gap = bound;
    }
    if gap > S::default() {
        ctx.policy.gap(start, gap);
    }

    let lines = ctx.cache.lines();
    let mut position = 0;
    let mut next = start;
    while next < sequence {
        ctx.cache.history[position] = SequenceSlot::gap(lines, next);
        next = next.successor();
        position += 1;
    }

    write_filled(ctx, line, position, sequence);
    ctx.cache.head = line;
    true
}
