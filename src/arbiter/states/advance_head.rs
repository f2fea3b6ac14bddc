use super::{reclaim_slot, write_filled, AdvanceContext};
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// Head's one-step advance. Always a new sequence, always accepted.
pub(super) fn advance<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    ctx.cache.head = line;
    let next = ctx.cache.next_position(line);
    reclaim_slot(ctx, line, next);
    write_filled(ctx, line, next, sequence);
    true
}
