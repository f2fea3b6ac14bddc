use super::cache::HistoryCache;
use super::state::classify;
use super::states::{self, AdvanceContext};
use crate::config::Limits;
use crate::policy::ErrorReportingPolicy;
use crate::sequence::SequenceNumber;

/// Classifies each report and dispatches it to its transition handler.
///
/// Owns the one-shot first-call flag; the cache and policy are borrowed per
/// call.
#[derive(Debug, Clone)]
pub struct Advancer<S> {
    limits: Limits<S>,
    first_call: bool,
}

impl<S: SequenceNumber> Advancer<S> {
    pub fn new(limits: Limits<S>) -> Self {
        Self {
            limits,
            first_call: true,
        }
    }

    pub fn reset(&mut self) {
        self.first_call = true;
    }

    /// True until the first message has been accepted.
    pub fn is_first_call(&self) -> bool {
        self.first_call
    }

    pub fn limits(&self) -> &Limits<S> {
        &self.limits
    }

    /// Advance `line` to `sequence`, returning whether the message is accepted.
    ///
    /// # Panics
    /// Panics if `line` is outside the cache's configured line range.
    pub fn advance<P>(
        &mut self,
        cache: &mut HistoryCache<S>,
        policy: &mut P,
        line: usize,
        sequence: S,
    ) -> bool
    where
        P: ErrorReportingPolicy<S>,
    {
        assert!(
            line < cache.lines(),
            "line index {line} out of range for {} lines",
            cache.lines()
        );

        if !self.first_call {
            cache.enrol(line);
        }
        let state = classify(cache, self.first_call, line, sequence);
        log::trace!("line {line} sequence {sequence}: {state:?}");

        let mut ctx = AdvanceContext {
            cache,
            policy,
            limits: &self.limits,
            first_call: &mut self.first_call,
        };
        states::advance(state, &mut ctx, line, sequence)
    }
}
