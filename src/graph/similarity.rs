//! Co-vote counting for one year of divisions.
//!
//! Pairs are stored under a canonical key (smaller id first), so the count
//! for `(i, j)` and `(j, i)` is always the same entry.

use crate::models::{Division, MemberId, Side};
use std::collections::{BTreeMap, BTreeSet};

/// An unordered pair of distinct members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberPair {
    low: MemberId,
    high: MemberId,
}

impl MemberPair {
    /// Builds the canonical pair. Returns `None` when both ids are the same.
    pub fn new(a: MemberId, b: MemberId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> MemberId {
        self.low
    }

    pub fn second(&self) -> MemberId {
        self.high
    }
}

/// Substantive vote totals and pairwise agreement counts for one year.
#[derive(Debug, Clone, Default)]
pub struct CoVoteTally {
    /// Members with at least one recorded entry, substantive or not.
    recorded: BTreeSet<MemberId>,
    totals: BTreeMap<MemberId, u32>,
    common: BTreeMap<MemberPair, u32>,
    divisions: usize,
}

impl CoVoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies a sequence of divisions.
    pub fn from_divisions<'a, I>(divisions: I) -> Self
    where
        I: IntoIterator<Item = &'a Division>,
    {
        let mut tally = Self::new();
        for division in divisions {
            tally.record(division);
        }
        tally
    }

    /// Adds one division to the tally.
    pub fn record(&mut self, division: &Division) {
        self.divisions += 1;
        self.recorded.extend(division.votes.keys().copied());

        for side in [Side::Aye, Side::Nay] {
            let members = division.members_on(side);

            for member in &members {
                *self.totals.entry(*member).or_insert(0) += 1;
            }

            // members_on() is sorted, so (i, j) with i < j is already canonical
            for (i, low) in members.iter().enumerate() {
                for high in &members[i + 1..] {
                    if let Some(pair) = MemberPair::new(*low, *high) {
                        *self.common.entry(pair).or_insert(0) += 1;
                    }
                }
            }
        }
    }

    /// Number of divisions tallied.
    pub fn division_count(&self) -> usize {
        self.divisions
    }

    /// Number of members with any recorded entry.
    pub fn recorded_count(&self) -> usize {
        self.recorded.len()
    }

    /// Substantive votes cast by a member.
    pub fn total_votes(&self, member: MemberId) -> u32 {
        self.totals.get(&member).copied().unwrap_or(0)
    }

    /// Divisions on which both members cast the same substantive vote.
    pub fn common_votes(&self, a: MemberId, b: MemberId) -> u32 {
        MemberPair::new(a, b)
            .and_then(|pair| self.common.get(&pair).copied())
            .unwrap_or(0)
    }

    /// Members with at least one substantive vote, in id order.
    pub fn active_members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.totals
            .iter()
            .filter(|(_, total)| **total > 0)
            .map(|(id, _)| *id)
    }

    /// Pairs that agreed at least once, with their counts.
    pub fn agreeing_pairs(&self) -> impl Iterator<Item = (MemberPair, u32)> + '_ {
        self.common.iter().map(|(pair, count)| (*pair, *count))
    }

    /// Agreement normalised by the smaller of the two substantive totals.
    ///
    /// Returns 0.0 when either member has no substantive votes.
    pub fn similarity(&self, a: MemberId, b: MemberId) -> f64 {
        let smaller = self.total_votes(a).min(self.total_votes(b));
        if smaller == 0 {
            return 0.0;
        }
        f64::from(self.common_votes(a, b)) / f64::from(smaller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteCode;
    use chrono::NaiveDate;

    fn division(votes: &[(u32, VoteCode)]) -> Division {
        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        votes
            .iter()
            .fold(Division::new(date), |d, (id, code)| d.with_vote(MemberId(*id), *code))
    }

    #[test]
    fn test_member_pair_is_canonical() {
        let ab = MemberPair::new(MemberId(1), MemberId(2)).unwrap();
        let ba = MemberPair::new(MemberId(2), MemberId(1)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), MemberId(1));
        assert_eq!(ab.second(), MemberId(2));
        assert!(MemberPair::new(MemberId(3), MemberId(3)).is_none());
    }

    #[test]
    fn test_common_votes_symmetric() {
        let tally = CoVoteTally::from_divisions(&[
            division(&[(1, VoteCode::Aye), (2, VoteCode::Aye), (3, VoteCode::Nay)]),
            division(&[(1, VoteCode::Nay), (2, VoteCode::Nay), (3, VoteCode::Nay)]),
        ]);

        assert_eq!(tally.common_votes(MemberId(1), MemberId(2)), 2);
        assert_eq!(tally.common_votes(MemberId(2), MemberId(1)), 2);
        assert_eq!(tally.common_votes(MemberId(1), MemberId(3)), 1);
        assert_eq!(tally.common_votes(MemberId(3), MemberId(1)), 1);
    }

    #[test]
    fn test_non_substantive_codes_not_counted() {
        let tally = CoVoteTally::from_divisions(&[
            division(&[(1, VoteCode::Aye), (2, VoteCode::TellAye), (3, VoteCode::Both)]),
            division(&[(1, VoteCode::Absent), (2, VoteCode::Absent)]),
        ]);

        assert_eq!(tally.total_votes(MemberId(1)), 1);
        assert_eq!(tally.total_votes(MemberId(2)), 0);
        assert_eq!(tally.common_votes(MemberId(1), MemberId(2)), 0);
        assert_eq!(tally.active_members().collect::<Vec<_>>(), vec![MemberId(1)]);
        assert_eq!(tally.recorded_count(), 3);
        assert_eq!(tally.division_count(), 2);
    }

    #[test]
    fn test_identical_records_fully_similar() {
        let tally = CoVoteTally::from_divisions(&[
            division(&[(1, VoteCode::Aye), (2, VoteCode::Aye)]),
            division(&[(1, VoteCode::Nay), (2, VoteCode::Nay)]),
            division(&[(1, VoteCode::Aye), (2, VoteCode::Aye), (3, VoteCode::Nay)]),
        ]);

        assert_eq!(tally.similarity(MemberId(1), MemberId(2)), 1.0);
    }

    #[test]
    fn test_similarity_normalised_by_smaller_total() {
        // Member 2 only sat for one division and agreed with member 1 on it.
        let tally = CoVoteTally::from_divisions(&[
            division(&[(1, VoteCode::Aye), (2, VoteCode::Aye)]),
            division(&[(1, VoteCode::Nay)]),
            division(&[(1, VoteCode::Aye)]),
            division(&[(1, VoteCode::Nay)]),
        ]);

        assert_eq!(tally.total_votes(MemberId(1)), 4);
        assert_eq!(tally.total_votes(MemberId(2)), 1);
        assert_eq!(tally.similarity(MemberId(1), MemberId(2)), 1.0);
    }

    #[test]
    fn test_similarity_without_votes_is_zero() {
        let tally = CoVoteTally::from_divisions(&[division(&[(1, VoteCode::Aye)])]);
        assert_eq!(tally.similarity(MemberId(1), MemberId(9)), 0.0);
    }
}
