//! Fixed-table group directory

use agora_application::{GroupMembership, PermissionChecker};
use agora_domain::{GroupId, ProposalId, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Size and restrictions of one group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRoster {
    pub participants: i64,
    pub voters: i64,
    /// Members barred from ranking
    pub muted: HashSet<UserId>,
    /// Members barred from voting
    pub non_voters: HashSet<UserId>,
}

impl GroupRoster {
    /// A group where every member may rank and vote
    pub fn open(members: i64) -> Self {
        Self {
            participants: members,
            voters: members,
            ..Self::default()
        }
    }
}

/// Membership and permissions from an in-memory table.
///
/// Unknown groups have no members. Permission checks are per user; a user
/// muted in one group is muted in all of them.
#[derive(Default)]
pub struct StaticGroupDirectory {
    groups: RwLock<HashMap<GroupId, GroupRoster>>,
}

impl StaticGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(self, group: GroupId, roster: GroupRoster) -> Self {
        self.set_group(group, roster);
        self
    }

    /// Insert or replace a group
    pub fn set_group(&self, group: GroupId, roster: GroupRoster) {
        if let Ok(mut groups) = self.groups.write() {
            groups.insert(group, roster);
        }
    }

    fn lookup<T>(&self, group: GroupId, f: impl FnOnce(&GroupRoster) -> T) -> Option<T> {
        self.groups.read().ok()?.get(&group).map(f)
    }

    fn any_roster(&self, f: impl Fn(&GroupRoster) -> bool) -> bool {
        self.groups
            .read()
            .map(|groups| groups.values().any(f))
            .unwrap_or(false)
    }
}

#[async_trait]
impl GroupMembership for StaticGroupDirectory {
    async fn eligible_participants(&self, group: GroupId) -> i64 {
        self.lookup(group, |r| r.participants).unwrap_or(0)
    }

    async fn eligible_voters(&self, group: GroupId) -> i64 {
        self.lookup(group, |r| r.voters).unwrap_or(0)
    }
}

#[async_trait]
impl PermissionChecker for StaticGroupDirectory {
    async fn can_rank(&self, user: UserId, _proposal: ProposalId) -> bool {
        !self.any_roster(|r| r.muted.contains(&user))
    }

    async fn can_vote(&self, user: UserId, _proposal: ProposalId) -> bool {
        !self.any_roster(|r| r.non_voters.contains(&user))
    }
}
