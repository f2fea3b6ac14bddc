//! Transition handlers, one per [`AdvancerState`].
//!
//! Each handler fully resolves one `validate` call: it mutates the cache,
//! reports through the policy and returns whether the message is accepted.

mod advance_head;
mod advance_line;
mod gap_fill;
mod head_forward_gap_fill;
mod initial_state;
mod line_forward_gap_fill;

use super::cache::HistoryCache;
use super::slot::SequenceSlot;
use super::state::AdvancerState;
use crate::config::Limits;
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// Everything a handler borrows for the duration of one call.
pub(crate) struct AdvanceContext<'a, S, P> {
    pub cache: &'a mut HistoryCache<S>,
    pub policy: &'a mut P,
    pub limits: &'a Limits<S>,
    pub first_call: &'a mut bool,
}

#[inline]
pub(crate) fn advance<S, P>(
    state: AdvancerState,
    ctx: &mut AdvanceContext<'_, S, P>,
    line: usize,
    sequence: S,
) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    match state {
        AdvancerState::InitialState => initial_state::advance(ctx, line, sequence),
        AdvancerState::AdvanceHead => advance_head::advance(ctx, line, sequence),
        AdvancerState::AdvanceLine => advance_line::advance(ctx, line, sequence),
        AdvancerState::GapFill => gap_fill::advance(ctx, line, sequence),
        AdvancerState::HeadForwardGapFill => head_forward_gap_fill::advance(ctx, line, sequence),
        AdvancerState::LineForwardGapFill => line_forward_gap_fill::advance(ctx, line, sequence),
    }
}

#[inline]
fn one<S: SequenceNumber>() -> S {
    S::default().successor()
}

/// Prepare `index` to be overwritten by `line` advancing into it.
///
/// Any other line parked on `index` is reported as overrun and pushed one slot
/// past it. The outgoing slot is then checked for sequences that will now
/// never be confirmed.
fn reclaim_slot<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, index: usize)
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let relocated = ctx.cache.wrap_forward(index, 1);
    for slow_line in 0..ctx.cache.lines() {
        if slow_line != line && ctx.cache.positions[slow_line] == index {
            ctx.policy.line_position_overrun(slow_line, line);
            ctx.cache.positions[slow_line] = relocated;
        }
    }

    let outgoing = ctx.cache.history[index];
    if outgoing.complete() {
        return;
    }
    if outgoing.empty() {
        ctx.policy.unrecoverable_gap(outgoing.sequence(), one());
    } else {
        for missing in outgoing.reporters().missing() {
            ctx.policy.unrecoverable_line_gap(missing, outgoing.sequence());
        }
    }
}

/// Write the filled slot for `sequence` at `index` and move `line` onto it.
fn write_filled<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, index: usize, sequence: S)
where
    S: SequenceNumber,
{
    let lines = ctx.cache.lines();
    ctx.cache.history[index] = SequenceSlot::filled(lines, line, sequence);
    ctx.cache.positions[line] = index;
}

/// Record `line` as a reporter of the existing slot at `index`.
///
/// Accepts only when no line had reported the slot before.
fn confirm<S, P>(ctx: &mut AdvanceContext<'_, S, P>, line: usize, index: usize, sequence: S) -> bool
where
    S: SequenceNumber,
    P: ErrorReportingPolicy<S>,
{
    let slot = &mut ctx.cache.history[index];
    if slot.empty() {
        slot.insert(line);
        ctx.policy.gap_fill(sequence, one());
        return true;
    }
    if !slot.insert(line) {
        ctx.policy.duplicate_on_line(line, sequence);
    }
    false
}


#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::policy::ArbiterEvent;

    #[test]
    fn test_reclaim_reports_overrun_and_relocates() {
        let mut harness = Harness::seeded_head(2, 4, 0, 0);
        harness.cache.positions[1] = 1;
        {
            let mut ctx = AdvanceContext {
                cache: &mut harness.cache,
                policy: &mut harness.policy,
                limits: &harness.limits,
                first_call: &mut harness.first_call,
            };
            reclaim_slot(&mut ctx, 0, 1);
        }
        assert_eq!(harness.cache.positions[1], 2);
        assert_eq!(
            harness.policy.events(),
            &[ArbiterEvent::LinePositionOverrun { slow_line: 1, overrun_by_line: 0 }]
        );
    }

    #[test]
    fn test_reclaim_reports_lost_slots() {
        let mut harness = Harness::seeded_head(3, 4, 0, 0);
        harness.cache.history[1] = SequenceSlot::gap(3, 7);
        harness.cache.history[2] = SequenceSlot::filled(3, 1, 8);
        {
            let mut ctx = AdvanceContext {
                cache: &mut harness.cache,
                policy: &mut harness.policy,
                limits: &harness.limits,
                first_call: &mut harness.first_call,
            };
            reclaim_slot(&mut ctx, 0, 1);
            reclaim_slot(&mut ctx, 0, 2);
            // seeded slot: nothing to report
            reclaim_slot(&mut ctx, 0, 3);
        }
        assert_eq!(
            harness.policy.events(),
            &[
                ArbiterEvent::UnrecoverableGap { start: 7, length: 1 },
                ArbiterEvent::UnrecoverableLineGap { line: 0, sequence: 8 },
                ArbiterEvent::UnrecoverableLineGap { line: 2, sequence: 8 },
            ]
        );
    }

    #[test]
    fn test_dispatch_routes_initial_state() {
        let mut harness = Harness::new(1, 4, 0, 2);
        let accepted = {
            let mut ctx = AdvanceContext {
                cache: &mut harness.cache,
                policy: &mut harness.policy,
                limits: &harness.limits,
                first_call: &mut harness.first_call,
            };
            advance(AdvancerState::InitialState, &mut ctx, 0, 0)
        };
        assert!(accepted);
        assert!(!harness.first_call);
        assert_eq!(harness.cache.head(), Some(0));
    }
}
