use super::{reclaim_slot, write_filled, AdvanceContext};
use crate::arbiter::slot::SequenceSlot;
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// Head jumps past its next expected sequence.
///
/// The skipped span becomes empty placeholders, clipped to the largest
/// recoverable gap. Everything beyond the bound is reported unrecoverable and
/// consumes no slots.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    ctx.cache.head = line;

    let bound = ctx.limits.largest_recoverable_gap;
    let mut start = ctx.cache.current(line).successor();
    let mut gap = sequence.distance(start);
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
    let mut position = ctx.cache.positions[line];
    let mut next = start;
    while next < sequence {
        position = ctx.cache.wrap_forward(position, 1);
        reclaim_slot(ctx, line, position);
        ctx.cache.history[position] = SequenceSlot::gap(lines, next);
        next = next.successor();
    }

    position = ctx.cache.wrap_forward(position, 1);
    reclaim_slot(ctx, line, position);
    write_filled(ctx, line, position, sequence);
    true
}
