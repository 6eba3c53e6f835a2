//! Premade grouping engine
//!
//! Turns the directed premade declarations of a tournament into
//! capacity-bounded team candidates and classifies every member's
//! agreement with the result:
//!
//! 1. Build one raw preference group per issuer (issuer + targets),
//!    after dropping everything touched by an opt-out.
//! 2. Greedily merge the two clusters with the largest member overlap, as
//!    long as the merged size stays within capacity.
//! 3. Compare each member's final cluster against their original
//!    declaration and assign a status.
//!
//! The merge is a heuristic, not an optimal clustering; see the
//! function docs for the tie-break rules.

use std::collections::HashSet;

use crate::domain::entities::{
    GroupMember, MemberStatus, MergedGroup, ParticipantId, PremadeDeclaration, RawPreferenceGroup,
};

/// Build one raw preference group per issuer from the declaration list.
///
/// Opt-out markers remove their issuer from grouping entirely: every
/// declaration whose issuer or target opted out is discarded first. The
/// remaining declarations are folded into groups in declaration order,
/// `members[0]` being the issuer, duplicate targets dropped.
///
/// No size bound applies here: an issuer plus five targets yields a raw
/// group of six even when that exceeds team capacity. Capacity is only
/// enforced by the merge step.
pub fn build_preference_groups(declarations: &[PremadeDeclaration]) -> Vec<RawPreferenceGroup> {
    let opted_out: HashSet<ParticipantId> = declarations
        .iter()
        .filter(|d| d.is_opt_out())
        .map(|d| d.issuer)
        .collect();

    let mut groups: Vec<RawPreferenceGroup> = Vec::new();
    for declaration in declarations {
        let Some(target) = declaration.target else {
            continue;
        };
        if opted_out.contains(&declaration.issuer) || opted_out.contains(&target) {
            continue;
        }

        let index = match groups.iter().position(|g| g.issuer == declaration.issuer) {
            Some(index) => index,
            None => {
                groups.push(RawPreferenceGroup {
                    issuer: declaration.issuer,
                    members: vec![declaration.issuer],
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        if !group.members.contains(&target) {
            group.members.push(target);
        }
    }
    groups
}

/// Greedily merge preference groups into clusters bounded by `capacity`.
///
/// Each round scans every cluster pair, picks the pair with the largest
/// member intersection whose union stays within capacity, merges it and
/// repeats until no pair with a positive intersection fits. When several
/// pairs share the maximal intersection the first pair encountered in the
/// scan wins; clusters are scanned in insertion order and a merged
/// cluster re-enters at the end of the list. This tie-break is an
/// explicit design choice, not an accident.
///
/// Overlapping groups normally consolidate into one cluster; when the
/// capacity bound blocks that merge, a participant can remain visible in
/// more than one cluster (and is classified separately in each).
pub fn cluster_groups(
    groups: &[RawPreferenceGroup],
    capacity: usize,
) -> Vec<Vec<ParticipantId>> {
    let mut clusters: Vec<Vec<ParticipantId>> = groups.iter().map(|g| g.members.clone()).collect();

    while let Some((first, second)) = find_best_merge(&clusters, capacity) {
        // second > first, so removing second leaves first in place
        let b = clusters.remove(second);
        let a = clusters.remove(first);
        clusters.push(merge_clusters(a, b));
    }
    clusters
}

/// The pair of clusters with the largest positive intersection whose
/// merged size stays within capacity, or `None` when no merge applies.
fn find_best_merge(
    clusters: &[Vec<ParticipantId>],
    capacity: usize,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut best_overlap = 0;
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            let overlap = intersection_size(&clusters[i], &clusters[j]);
            if overlap > best_overlap
                && clusters[i].len() + clusters[j].len() - overlap <= capacity
            {
                best = Some((i, j));
                best_overlap = overlap;
            }
        }
    }
    best
}

fn intersection_size(a: &[ParticipantId], b: &[ParticipantId]) -> usize {
    a.iter().filter(|id| b.contains(id)).count()
}

/// Union preserving the first cluster's member order, then appending the
/// second cluster's members not already present.
fn merge_clusters(mut a: Vec<ParticipantId>, b: Vec<ParticipantId>) -> Vec<ParticipantId> {
    for id in b {
        if !a.contains(&id) {
            a.push(id);
        }
    }
    a
}

/// Classify every member of every cluster against their own raw
/// preference group.
///
/// A member without a group of their own is `Pending`. Otherwise, with
/// `selected` being the member's declared targets and `included` the
/// subset of those present in the final cluster: all present is `Ready`,
/// more than one present is `Incomplete`, and at most one present is
/// `Conflict`. `Denied` is reserved and never produced here.
fn classify(
    clusters: &[Vec<ParticipantId>],
    groups: &[RawPreferenceGroup],
) -> Vec<MergedGroup> {
    clusters
        .iter()
        .map(|cluster| {
            let members = cluster
                .iter()
                .map(|&participant| {
                    let status = match groups.iter().find(|g| g.issuer == participant) {
                        None => MemberStatus::Pending,
                        Some(group) => {
                            let selected = group.targets();
                            let included = selected
                                .iter()
                                .filter(|target| cluster.contains(target))
                                .count();
                            if included == selected.len() {
                                MemberStatus::Ready
                            } else if included > 1 {
                                MemberStatus::Incomplete
                            } else {
                                MemberStatus::Conflict
                            }
                        }
                    };
                    GroupMember {
                        participant,
                        status,
                    }
                })
                .collect();
            MergedGroup { members }
        })
        .collect()
}

/// One full grouping pass: build raw groups, merge, classify, and order
/// for display (clusters by descending size, members by status). The
/// display ordering is cosmetic and does not affect classification.
pub fn premade_grouping(
    declarations: &[PremadeDeclaration],
    capacity: usize,
) -> Vec<MergedGroup> {
    let groups = build_preference_groups(declarations);
    let clusters = cluster_groups(&groups, capacity);
    let mut merged = classify(&clusters, &groups);

    merged.sort_by(|a, b| b.len().cmp(&a.len()));
    for group in &mut merged {
        group.members.sort_by_key(|m| m.status.display_rank());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TEAM_CAPACITY;

    fn ids(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    fn declare(issuer: ParticipantId, targets: &[ParticipantId]) -> Vec<PremadeDeclaration> {
        targets
            .iter()
            .map(|&t| PremadeDeclaration::new(issuer, t))
            .collect()
    }

    fn membership(groups: &[MergedGroup]) -> Vec<Vec<ParticipantId>> {
        groups
            .iter()
            .map(|g| {
                let mut members: Vec<ParticipantId> =
                    g.members.iter().map(|m| m.participant).collect();
                members.sort_by_key(|id| id.0);
                members
            })
            .collect()
    }

    #[test]
    fn empty_declarations_yield_no_groups() {
        assert!(premade_grouping(&[], TEAM_CAPACITY).is_empty());
    }

    #[test]
    fn builder_folds_edges_per_issuer() {
        let p = ids(3);
        let mut declarations = declare(p[0], &[p[1], p[2]]);
        declarations.extend(declare(p[1], &[p[0]]));

        let groups = build_preference_groups(&declarations);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].issuer, p[0]);
        assert_eq!(groups[0].members, vec![p[0], p[1], p[2]]);
        assert_eq!(groups[1].members, vec![p[1], p[0]]);
    }

    #[test]
    fn builder_drops_everything_touched_by_opt_out() {
        let p = ids(3);
        let mut declarations = declare(p[0], &[p[1]]);
        declarations.extend(declare(p[1], &[p[2]]));
        declarations.push(PremadeDeclaration::opt_out(p[2]));

        let groups = build_preference_groups(&declarations);

        // p2 opted out: p1's edge towards p2 is dropped along with the
        // marker itself; p0 -> p1 survives.
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![p[0], p[1]]);
        assert!(groups.iter().all(|g| !g.members.contains(&p[2])));
    }

    #[test]
    fn opted_out_issuer_is_excluded_entirely() {
        let p = ids(3);
        let mut declarations = vec![PremadeDeclaration::opt_out(p[0])];
        declarations.extend(declare(p[1], &[p[0], p[2]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert!(merged.iter().all(|g| !g.contains(&p[0])));
    }

    #[test]
    fn mutual_pairs_form_two_clusters_all_ready() {
        // A<->B, C<->D => {A,B} and {C,D}, all four READY
        let p = ids(4);
        let mut declarations = declare(p[0], &[p[1]]);
        declarations.extend(declare(p[1], &[p[0]]));
        declarations.extend(declare(p[2], &[p[3]]));
        declarations.extend(declare(p[3], &[p[2]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert_eq!(merged.len(), 2);
        for group in &merged {
            assert_eq!(group.len(), 2);
            assert!(group.members.iter().all(|m| m.status == MemberStatus::Ready));
        }
        let members = membership(&merged);
        let mut expected_ab = vec![p[0], p[1]];
        expected_ab.sort_by_key(|id| id.0);
        assert!(members.contains(&expected_ab));
    }

    #[test]
    fn pulled_in_member_is_pending() {
        // A -> B,C; B -> A; C declares nothing => one cluster {A,B,C};
        // A READY (both present), B READY (only selection present),
        // C PENDING.
        let p = ids(3);
        let mut declarations = declare(p[0], &[p[1], p[2]]);
        declarations.extend(declare(p[1], &[p[0]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert_eq!(merged.len(), 1);
        let group = &merged[0];
        assert_eq!(group.len(), 3);
        assert_eq!(group.status_of(&p[0]), Some(MemberStatus::Ready));
        assert_eq!(group.status_of(&p[1]), Some(MemberStatus::Ready));
        assert_eq!(group.status_of(&p[2]), Some(MemberStatus::Pending));
    }

    #[test]
    fn oversized_raw_group_is_returned_unmerged() {
        // A -> B,C,D,E,F: six members exceed capacity five, but with a
        // single group the merge step never applies.
        let p = ids(6);
        let declarations = declare(p[0], &[p[1], p[2], p[3], p[4], p[5]]);

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 6);
        assert_eq!(merged[0].status_of(&p[0]), Some(MemberStatus::Ready));
    }

    #[test]
    fn capacity_blocks_merges_that_would_overflow() {
        // A -> B,C,D (4 members) and E -> F,G (3 members) share no
        // member; X -> A gives a positive overlap of one, but 4 + 2 - 1
        // puts it at five which fits, while E's group never merges.
        let p = ids(8);
        let mut declarations = declare(p[0], &[p[1], p[2], p[3]]);
        declarations.extend(declare(p[4], &[p[5], p[6]]));
        declarations.extend(declare(p[7], &[p[0]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        for group in &merged {
            // no cluster formed by merging may exceed capacity
            if group.len() > TEAM_CAPACITY {
                // only a raw group can be oversized, never a merge result
                panic!("merge produced an oversized cluster");
            }
        }
        // A's group absorbed X
        let a_group = merged.iter().find(|g| g.contains(&p[0])).unwrap();
        assert_eq!(a_group.len(), 5);
        assert!(a_group.contains(&p[7]));
    }

    #[test]
    fn overlapping_chains_consolidate_into_disjoint_clusters() {
        // A -> B,C; B -> C,D; D -> E collapse into one cluster, the
        // mutual pair F<->G into another; no member is shared.
        let p = ids(7);
        let mut declarations = declare(p[0], &[p[1], p[2]]);
        declarations.extend(declare(p[1], &[p[2], p[3]]));
        declarations.extend(declare(p[3], &[p[4]]));
        declarations.extend(declare(p[5], &[p[6]]));
        declarations.extend(declare(p[6], &[p[5]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert_eq!(merged.len(), 2);
        let mut seen = HashSet::new();
        for group in &merged {
            for member in &group.members {
                assert!(seen.insert(member.participant), "member in two clusters");
            }
        }
        assert_eq!(merged[0].len(), 5);
        assert_eq!(merged[1].len(), 2);
    }

    #[test]
    fn merges_never_exceed_capacity() {
        // dense preferences between eight players
        let p = ids(8);
        let mut declarations = Vec::new();
        for i in 0..8 {
            for j in 0..8 {
                if i != j && (i + j) % 3 == 0 {
                    declarations.push(PremadeDeclaration::new(p[i], p[j]));
                }
            }
        }

        let groups = build_preference_groups(&declarations);
        let raw: Vec<HashSet<ParticipantId>> = groups
            .iter()
            .map(|g| g.members.iter().copied().collect())
            .collect();
        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        for group in &merged {
            if group.len() > TEAM_CAPACITY {
                // only an untouched raw group may be oversized, never a
                // merge result
                let members: HashSet<ParticipantId> =
                    group.members.iter().map(|m| m.participant).collect();
                assert!(raw.contains(&members), "merge produced an oversized cluster");
            }
        }
    }

    #[test]
    fn clustering_is_idempotent_on_stable_input() {
        let p = ids(7);
        let mut declarations = declare(p[0], &[p[1], p[2]]);
        declarations.extend(declare(p[2], &[p[0], p[3]]));
        declarations.extend(declare(p[4], &[p[5]]));
        declarations.extend(declare(p[5], &[p[4], p[6]]));

        let first = membership(&premade_grouping(&declarations, TEAM_CAPACITY));
        let second = membership(&premade_grouping(&declarations, TEAM_CAPACITY));

        let sorted = |mut m: Vec<Vec<ParticipantId>>| {
            m.sort_by_key(|g| g.first().map(|id| id.0));
            m
        };
        assert_eq!(sorted(first), sorted(second));
    }

    #[test]
    fn member_with_no_selection_present_is_conflict() {
        // A -> B while B's own full group lives elsewhere: capacity
        // blocks the merge, so B also appears in A's pair cluster where
        // none of B's selections are present.
        let p = ids(6);
        let mut declarations = declare(p[0], &[p[1]]);
        declarations.extend(declare(p[1], &[p[2], p[3], p[4], p[5]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        let pair = merged.iter().find(|g| g.contains(&p[0])).unwrap();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair.status_of(&p[0]), Some(MemberStatus::Ready));
        assert_eq!(pair.status_of(&p[1]), Some(MemberStatus::Conflict));

        let own = merged
            .iter()
            .find(|g| g.contains(&p[2]))
            .unwrap();
        assert_eq!(own.status_of(&p[1]), Some(MemberStatus::Ready));
    }

    #[test]
    fn member_with_some_selections_present_is_incomplete() {
        // Z -> M,T1,T2,W fills a cluster that holds two of M's three
        // targets; M's own cluster cannot merge into it, so M shows as
        // INCOMPLETE there.
        let p = ids(6);
        let (z, m, t1, t2, w, t3) = (p[0], p[1], p[2], p[3], p[4], p[5]);
        let mut declarations = declare(z, &[m, t1, t2, w]);
        declarations.extend(declare(m, &[t1, t2, t3]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        let z_cluster = merged.iter().find(|g| g.contains(&z)).unwrap();
        assert_eq!(z_cluster.len(), 5);
        assert!(!z_cluster.contains(&t3));
        assert_eq!(z_cluster.status_of(&z), Some(MemberStatus::Ready));
        assert_eq!(z_cluster.status_of(&m), Some(MemberStatus::Incomplete));

        let m_cluster = merged.iter().find(|g| g.contains(&t3)).unwrap();
        assert_eq!(m_cluster.status_of(&m), Some(MemberStatus::Ready));
    }

    #[test]
    fn groups_sorted_by_descending_size_members_by_status() {
        let p = ids(6);
        // pair cluster and a pulled-in trio
        let mut declarations = declare(p[0], &[p[1]]);
        declarations.extend(declare(p[1], &[p[0]]));
        declarations.extend(declare(p[2], &[p[3], p[4]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert_eq!(merged.len(), 2);
        assert!(merged[0].len() >= merged[1].len());
        for group in &merged {
            let ranks: Vec<u8> = group
                .members
                .iter()
                .map(|m| m.status.display_rank())
                .collect();
            let mut sorted = ranks.clone();
            sorted.sort();
            assert_eq!(ranks, sorted);
        }
    }

    #[test]
    fn denied_is_never_produced() {
        let p = ids(5);
        let mut declarations = declare(p[0], &[p[1], p[2]]);
        declarations.extend(declare(p[3], &[p[4]]));

        let merged = premade_grouping(&declarations, TEAM_CAPACITY);

        assert!(merged
            .iter()
            .flat_map(|g| &g.members)
            .all(|m| m.status != MemberStatus::Denied));
    }
}
