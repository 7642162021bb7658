//! Per-member cooldown tracking for the group horn.
//!
//! This is a minimum inter-event-gap limiter, not a token bucket: it permits
//! at most one accepted horn per cooldown window per member, with the window
//! sliding from the last accepted horn.

use std::collections::HashMap;

use super::value_object::MemberId;

/// Outcome of a cooldown acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// Horn accepted; the member's window restarts now
    Accepted,
    /// Horn rejected; the member must wait `retry_after_secs` (rounded up)
    Throttled { retry_after_secs: i64 },
}

/// Tracks the last accepted horn timestamp per member.
///
/// Pure data structure: callers supply `now` explicitly, which keeps the
/// logic deterministic under test. Shared access is the caller's concern
/// (the use cases wrap it in a mutex).
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_accepted: HashMap<MemberId, i64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept and record `now` if the member has no entry or the entry is at
    /// least `cooldown_ms` old; otherwise reject without mutating state.
    pub fn try_acquire(
        &mut self,
        member: &MemberId,
        now: i64,
        cooldown_ms: i64,
    ) -> CooldownDecision {
        if let Some(last) = self.last_accepted.get(member) {
            let elapsed = now - last;
            if elapsed < cooldown_ms {
                let remaining_ms = cooldown_ms - elapsed;
                return CooldownDecision::Throttled {
                    retry_after_secs: (remaining_ms + 999) / 1000,
                };
            }
        }
        self.last_accepted.insert(member.clone(), now);
        CooldownDecision::Accepted
    }

    /// Drop the member's entry so a reconnecting member can act immediately.
    /// No-op when no entry exists.
    pub fn release(&mut self, member: &MemberId) {
        self.last_accepted.remove(member);
    }

    /// Drop all entries older than `max_age_ms`. Bounds memory for members
    /// whose sessions vanished without an orderly close. Returns the number
    /// of entries removed.
    pub fn sweep(&mut self, now: i64, max_age_ms: i64) -> usize {
        let before = self.last_accepted.len();
        self.last_accepted.retain(|_, last| now - *last <= max_age_ms);
        before - self.last_accepted.len()
    }

    pub fn len(&self) -> usize {
        self.last_accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_accepted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> MemberId {
        MemberId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_first_acquire_is_accepted() {
        // given:
        let mut tracker = CooldownTracker::new();

        // when:
        let decision = tracker.try_acquire(&member("alice"), 10_000, 5_000);

        // then:
        assert_eq!(decision, CooldownDecision::Accepted);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_acquire_within_cooldown_is_throttled() {
        // given:
        let mut tracker = CooldownTracker::new();
        let alice = member("alice");
        tracker.try_acquire(&alice, 10_000, 5_000);

        // when: 1.2 s into a 5 s window
        let decision = tracker.try_acquire(&alice, 11_200, 5_000);

        // then: remaining 3.8 s rounds up to 4
        assert_eq!(
            decision,
            CooldownDecision::Throttled {
                retry_after_secs: 4
            }
        );
    }

    #[test]
    fn test_throttled_acquire_does_not_slide_window() {
        // given:
        let mut tracker = CooldownTracker::new();
        let alice = member("alice");
        tracker.try_acquire(&alice, 10_000, 5_000);

        // when: repeated rejected attempts
        tracker.try_acquire(&alice, 11_000, 5_000);
        tracker.try_acquire(&alice, 14_000, 5_000);

        // then: the window still ends 5 s after the accepted horn
        let decision = tracker.try_acquire(&alice, 15_000, 5_000);
        assert_eq!(decision, CooldownDecision::Accepted);
    }

    #[test]
    fn test_acquire_at_exact_cooldown_boundary_is_accepted() {
        // given:
        let mut tracker = CooldownTracker::new();
        let alice = member("alice");
        tracker.try_acquire(&alice, 10_000, 5_000);

        // when:
        let decision = tracker.try_acquire(&alice, 15_000, 5_000);

        // then:
        assert_eq!(decision, CooldownDecision::Accepted);
    }

    #[test]
    fn test_members_are_throttled_independently() {
        // given:
        let mut tracker = CooldownTracker::new();
        tracker.try_acquire(&member("alice"), 10_000, 5_000);

        // when:
        let decision = tracker.try_acquire(&member("bob"), 10_001, 5_000);

        // then:
        assert_eq!(decision, CooldownDecision::Accepted);
    }

    #[test]
    fn test_release_clears_cooldown() {
        // given:
        let mut tracker = CooldownTracker::new();
        let alice = member("alice");
        tracker.try_acquire(&alice, 10_000, 5_000);

        // when:
        tracker.release(&alice);

        // then: a fresh horn right away is accepted
        let decision = tracker.try_acquire(&alice, 10_001, 5_000);
        assert_eq!(decision, CooldownDecision::Accepted);
    }

    #[test]
    fn test_release_of_unknown_member_is_noop() {
        // given:
        let mut tracker = CooldownTracker::new();

        // when / then:
        tracker.release(&member("ghost"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_sweep_removes_only_stale_entries() {
        // given:
        let mut tracker = CooldownTracker::new();
        tracker.try_acquire(&member("old"), 1_000, 5_000);
        tracker.try_acquire(&member("fresh"), 50_000, 5_000);

        // when:
        let removed = tracker.sweep(61_500, 60_000);

        // then:
        assert_eq!(removed, 1);
        assert_eq!(tracker.len(), 1);
        let decision = tracker.try_acquire(&member("old"), 61_501, 5_000);
        assert_eq!(decision, CooldownDecision::Accepted);
    }
}
