//! GroupRegistry trait: the registry exclusively owns all group and member
//! state; sessions refer into it by identifier only.

use async_trait::async_trait;

use super::member::MemberState;
use super::value_object::{GroupName, MemberId};

/// Totals reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCounts {
    pub groups: usize,
    pub members: usize,
}

/// In-memory mapping of group name to its live member-state table.
///
/// None of these operations fail: malformed input is rejected before it
/// reaches the registry, and removals are idempotent. Implementations must
/// support concurrent access from many connection tasks plus the janitor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRegistry: Send + Sync {
    /// Create the group if absent (registration without state).
    async fn ensure_group(&self, group: &GroupName);

    /// Create the group if absent, insert or overwrite the member's state.
    async fn upsert_member(&self, group: &GroupName, state: MemberState);

    /// Last-known state of one member, if present.
    async fn get_member(&self, group: &GroupName, member: &MemberId) -> Option<MemberState>;

    /// Delete the member; an emptied group is deleted too. Idempotent.
    /// Returns whether the group still exists afterwards.
    async fn remove_member(&self, group: &GroupName, member: &MemberId) -> bool;

    /// Current member set of the group, order not significant. Empty for an
    /// absent group.
    async fn snapshot(&self, group: &GroupName) -> Vec<MemberState>;

    async fn group_exists(&self, group: &GroupName) -> bool;

    /// Every group with its snapshot, for the HTTP surface.
    async fn overview(&self) -> Vec<(GroupName, Vec<MemberState>)>;

    async fn counts(&self) -> RegistryCounts;

    /// Remove every member whose timestamp is strictly older than
    /// `cutoff_millis`; delete emptied groups. Returns the post-eviction
    /// snapshot (possibly empty) of each group that changed, so the janitor
    /// broadcasts exactly once per affected group.
    async fn evict_inactive(&self, cutoff_millis: i64) -> Vec<(GroupName, Vec<MemberState>)>;
}
