//! In-memory GroupRegistry implementation.
//!
//! A nested `HashMap` behind a single tokio mutex. Coarse locking is enough
//! at this scale: every operation touches the maps briefly and returns owned
//! snapshots, so no lock is ever held across a broadcast or any other await
//! point outside this module.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{GroupName, GroupRegistry, MemberId, MemberState, RegistryCounts};

/// In-memory registry: group name -> member id -> last-known state
#[derive(Default)]
pub struct InMemoryGroupRegistry {
    groups: Mutex<HashMap<GroupName, HashMap<MemberId, MemberState>>>,
}

impl InMemoryGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRegistry for InMemoryGroupRegistry {
    async fn ensure_group(&self, group: &GroupName) {
        let mut groups = self.groups.lock().await;
        if !groups.contains_key(group) {
            groups.insert(group.clone(), HashMap::new());
            tracing::info!("Group '{}' created", group.as_str());
        }
    }

    async fn upsert_member(&self, group: &GroupName, state: MemberState) {
        let mut groups = self.groups.lock().await;
        let members = groups.entry(group.clone()).or_default();
        members.insert(state.member_id.clone(), state);
    }

    async fn get_member(&self, group: &GroupName, member: &MemberId) -> Option<MemberState> {
        let groups = self.groups.lock().await;
        groups.get(group).and_then(|members| members.get(member)).cloned()
    }

    async fn remove_member(&self, group: &GroupName, member: &MemberId) -> bool {
        let mut groups = self.groups.lock().await;
        let Some(members) = groups.get_mut(group) else {
            return false;
        };
        members.remove(member);
        if members.is_empty() {
            groups.remove(group);
            tracing::info!("Empty group '{}' deleted", group.as_str());
            return false;
        }
        true
    }

    async fn snapshot(&self, group: &GroupName) -> Vec<MemberState> {
        let groups = self.groups.lock().await;
        groups
            .get(group)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn group_exists(&self, group: &GroupName) -> bool {
        let groups = self.groups.lock().await;
        groups.contains_key(group)
    }

    async fn overview(&self) -> Vec<(GroupName, Vec<MemberState>)> {
        let groups = self.groups.lock().await;
        groups
            .iter()
            .map(|(name, members)| (name.clone(), members.values().cloned().collect()))
            .collect()
    }

    async fn counts(&self) -> RegistryCounts {
        let groups = self.groups.lock().await;
        RegistryCounts {
            groups: groups.len(),
            members: groups.values().map(|members| members.len()).sum(),
        }
    }

    async fn evict_inactive(&self, cutoff_millis: i64) -> Vec<(GroupName, Vec<MemberState>)> {
        let mut groups = self.groups.lock().await;
        let mut changed = Vec::new();

        groups.retain(|name, members| {
            let before = members.len();
            members.retain(|member_id, state| {
                let stale = state.timestamp < cutoff_millis;
                if stale {
                    tracing::info!(
                        "Inactive member '{}' evicted from group '{}'",
                        member_id.as_str(),
                        name.as_str()
                    );
                }
                !stale
            });

            if members.len() != before {
                changed.push((name.clone(), members.values().cloned().collect()));
            }
            // A group registered but never populated is not the janitor's to
            // delete; disconnect cleanup handles it
            if members.is_empty() && before > 0 {
                tracing::info!("Empty group '{}' deleted", name.as_str());
                false
            } else {
                true
            }
        });

        changed
    }
}
