//! Premade grouping types
//!
//! Transient output of the grouping engine: raw preference groups derived
//! from declarations, merged capacity-bounded clusters, and the per-member
//! agreement status. None of these are persisted; they are recomputed on
//! every render pass.

use serde::{Deserialize, Serialize};

use super::participant::ParticipantId;

/// How well a member's final cluster matches their original declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Every declared target is present in the cluster
    Ready,
    /// The member never declared preferences but was pulled in as a target
    Pending,
    /// More than one, but not all, declared targets are present
    Incomplete,
    /// At most one declared target is present
    Conflict,
    /// Reserved for moderator-forced exclusion; never produced today
    Denied,
}

impl MemberStatus {
    /// Sort rank for display within a cluster.
    pub fn display_rank(self) -> u8 {
        match self {
            MemberStatus::Ready => 0,
            MemberStatus::Pending => 1,
            MemberStatus::Incomplete => 2,
            MemberStatus::Conflict => 3,
            MemberStatus::Denied => 4,
        }
    }

    /// Short text marker used in rendered pages.
    pub fn marker(self) -> &'static str {
        match self {
            MemberStatus::Ready => "[OK]",
            MemberStatus::Pending => "[..]",
            MemberStatus::Incomplete => "[~]",
            MemberStatus::Conflict => "[!]",
            MemberStatus::Denied => "[X]",
        }
    }
}

/// One issuer's declared preference set: the issuer followed by all of
/// their targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPreferenceGroup {
    pub issuer: ParticipantId,
    /// `members[0]` is always the issuer
    pub members: Vec<ParticipantId>,
}

impl RawPreferenceGroup {
    /// The issuer's declared targets (everyone but the issuer).
    pub fn targets(&self) -> &[ParticipantId] {
        &self.members[1..]
    }
}

/// A member of a merged cluster together with their agreement status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
    pub participant: ParticipantId,
    pub status: MemberStatus,
}

/// A capacity-bounded team candidate produced by the clustering engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedGroup {
    pub members: Vec<GroupMember>,
}

impl MergedGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|m| m.participant == *id)
    }

    pub fn status_of(&self, id: &ParticipantId) -> Option<MemberStatus> {
        self.members
            .iter()
            .find(|m| m.participant == *id)
            .map(|m| m.status)
    }
}
