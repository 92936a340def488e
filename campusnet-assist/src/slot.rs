//! Per-operation call state.
//!
//! Every operation owns one [`CallSlot`]. A call moves the slot through
//! `Idle -> Requesting -> {Success, Failed} -> Idle`; while a call is in
//! flight the slot refuses a second one.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Phase of a call slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    Requesting,
    Success,
    Failed,
}

impl CallPhase {
    /// Whether `self -> next` is a legal transition. There is no retry edge.
    pub fn can_advance_to(self, next: CallPhase) -> bool {
        matches!(
            (self, next),
            (CallPhase::Idle, CallPhase::Requesting)
                | (CallPhase::Requesting, CallPhase::Success)
                | (CallPhase::Requesting, CallPhase::Failed)
                | (CallPhase::Success, CallPhase::Idle)
                | (CallPhase::Failed, CallPhase::Idle)
        )
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallPhase::Idle => "idle",
            CallPhase::Requesting => "requesting",
            CallPhase::Success => "success",
            CallPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Snapshot of a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallState {
    pub phase: CallPhase,
    /// Terminal phase of the most recent finished call
    pub last_result: Option<CallPhase>,
    /// Number of finished calls
    pub completed: u64,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            phase: CallPhase::Idle,
            last_result: None,
            completed: 0,
        }
    }
}

/// Non-reentrant call slot for one operation.
#[derive(Debug)]
pub struct CallSlot {
    name: &'static str,
    in_flight: AtomicBool,
    state: ArcSwap<CallState>,
}

impl CallSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: AtomicBool::new(false),
            state: ArcSwap::from_pointee(CallState::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<CallState> {
        self.state.load_full()
    }

    /// Whether a call is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the slot for one call; `None` while another call is in flight.
    pub fn try_begin(&self) -> Option<SlotGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.advance(CallPhase::Requesting);
        Some(SlotGuard {
            slot: self,
            finished: false,
        })
    }

    fn advance(&self, next: CallPhase) {
        let current = self.state.load();
        debug_assert!(
            current.phase.can_advance_to(next),
            "illegal transition {} -> {}",
            current.phase,
            next
        );
        tracing::trace!(slot = self.name, from = %current.phase, to = %next, "call transition");

        let mut state = CallState::clone(&current);
        state.phase = next;
        if matches!(next, CallPhase::Success | CallPhase::Failed) {
            state.last_result = Some(next);
            state.completed += 1;
        }
        self.state.store(Arc::new(state));
    }
}

/// Exclusive claim on a [`CallSlot`]. Dropping it unfinished counts as a
/// failed call.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    slot: &'a CallSlot,
    finished: bool,
}

impl SlotGuard<'_> {
    pub fn succeed(mut self) {
        self.finish(CallPhase::Success);
    }

    pub fn fail(mut self) {
        self.finish(CallPhase::Failed);
    }

    fn finish(&mut self, terminal: CallPhase) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.slot.advance(terminal);
        self.slot.advance(CallPhase::Idle);
        self.slot.in_flight.store(false, Ordering::Release);
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.finish(CallPhase::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use CallPhase::*;
        assert!(Idle.can_advance_to(Requesting));
        assert!(Requesting.can_advance_to(Success));
        assert!(Requesting.can_advance_to(Failed));
        assert!(Failed.can_advance_to(Idle));
        assert!(!Failed.can_advance_to(Requesting));
        assert!(!Idle.can_advance_to(Success));
    }

    #[test]
    fn test_slot_is_not_reentrant() {
        let slot = CallSlot::new("chat");
        let guard = slot.try_begin().unwrap();
        assert!(slot.is_busy());
        assert_eq!(slot.state().phase, CallPhase::Requesting);
        assert!(slot.try_begin().is_none());

        guard.succeed();
        let state = slot.state();
        assert_eq!(state.phase, CallPhase::Idle);
        assert_eq!(state.last_result, Some(CallPhase::Success));
        assert_eq!(state.completed, 1);
        assert!(slot.try_begin().is_some());
    }

    #[test]
    fn test_dropped_guard_counts_as_failure() {
        let slot = CallSlot::new("team");
        drop(slot.try_begin().unwrap());

        let state = slot.state();
        assert_eq!(state.phase, CallPhase::Idle);
        assert_eq!(state.last_result, Some(CallPhase::Failed));
        assert!(!slot.is_busy());
    }
}
