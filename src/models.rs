//! Data models for parliamentary voting records.
//!
//! This module contains the core data structures shared by the loaders,
//! the graph builder and the exporters: member identifiers, vote codes,
//! divisions and the member directory.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a member as used by the vote matrix columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mpid{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = std::num::ParseIntError;

    /// Accepts both the bare number (`"1234"`) and the column form (`"mpid1234"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("mpid").unwrap_or(s);
        digits.parse::<u32>().map(MemberId)
    }
}

impl MemberId {
    /// Returns true if a table header names a member column.
    pub fn is_column_header(header: &str) -> bool {
        header.trim().starts_with("mpid")
    }
}

/// Which side of a division a substantive vote was cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Aye,
    Nay,
}

/// A recorded vote code from the vote matrix.
///
/// Missing entries (the member did not sit at the time) are not a code;
/// they are simply absent from a [`Division`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteCode {
    /// Member sat but did not vote.
    Absent,
    /// Acted as a teller for the ayes.
    TellAye,
    /// Voted aye.
    Aye,
    /// Voted both ways (deliberate abstention).
    Both,
    /// Voted nay.
    Nay,
    /// Acted as a teller for the nays.
    TellNay,
    /// Any code outside the known vocabulary.
    Other(i32),
}

impl VoteCode {
    /// Numeric code used for missing records in the vote matrix.
    pub const MISSING: i32 = -9;

    /// Decode a numeric vote matrix code. Returns `None` for missing records.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::MISSING => None,
            0 => Some(VoteCode::Absent),
            1 => Some(VoteCode::TellAye),
            2 => Some(VoteCode::Aye),
            3 => Some(VoteCode::Both),
            4 => Some(VoteCode::Nay),
            5 => Some(VoteCode::TellNay),
            other => Some(VoteCode::Other(other)),
        }
    }

    /// The side of a substantive vote, or `None` for everything else.
    pub fn side(&self) -> Option<Side> {
        match self {
            VoteCode::Aye => Some(Side::Aye),
            VoteCode::Nay => Some(Side::Nay),
            _ => None,
        }
    }

    /// Returns true for a recorded aye or nay.
    #[allow(dead_code)] // Convenience over side()
    pub fn is_substantive(&self) -> bool {
        self.side().is_some()
    }
}

impl fmt::Display for VoteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteCode::Absent => write!(f, "absent"),
            VoteCode::TellAye => write!(f, "teller (aye)"),
            VoteCode::Aye => write!(f, "aye"),
            VoteCode::Both => write!(f, "both"),
            VoteCode::Nay => write!(f, "nay"),
            VoteCode::TellNay => write!(f, "teller (nay)"),
            VoteCode::Other(code) => write!(f, "code {}", code),
        }
    }
}

/// A single recorded vote event.
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    /// Date the division took place.
    pub date: NaiveDate,
    /// Division number within the session, if the table carries one.
    #[allow(dead_code)] // Carried from the matrix; not used by graph building
    pub number: Option<u32>,
    /// Recorded codes by member. Members without a record are absent.
    pub votes: BTreeMap<MemberId, VoteCode>,
}

impl Division {
    /// Creates a division with no recorded votes.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            number: None,
            votes: BTreeMap::new(),
        }
    }

    /// Calendar year of the division.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Records a vote, replacing any previous code for the member.
    #[allow(dead_code)] // Builder for tables assembled in code
    pub fn with_vote(mut self, member: MemberId, code: VoteCode) -> Self {
        self.votes.insert(member, code);
        self
    }

    /// Members who cast a substantive vote on the given side, in id order.
    pub fn members_on(&self, side: Side) -> Vec<MemberId> {
        self.votes
            .iter()
            .filter(|(_, code)| code.side() == Some(side))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Identity and party metadata for a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub surname: String,
    pub party: String,
}

impl Member {
    /// Deduplication label, e.g. `"Blair,T. (Lab)"`.
    ///
    /// Several ids may share a label when a member was registered twice.
    pub fn display_label(&self) -> String {
        let initial = self
            .first_name
            .trim()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();
        format!("{},{}. ({})", self.surname.trim(), initial, self.party.trim())
    }
}

/// Extract the party code from a display label's parenthesised suffix.
pub fn party_from_label(label: &str) -> Option<&str> {
    let start = label.find('(')? + 1;
    let rest = &label[start..];
    let end = rest.find(')').unwrap_or(rest.len());
    let party = &rest[..end];
    if party.is_empty() {
        None
    } else {
        Some(party)
    }
}

/// Lookup table from member id to member metadata.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: HashMap<MemberId, Member>,
}

impl MemberDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a member entry.
    pub fn insert(&mut self, member: Member) {
        self.members.insert(member.id, member);
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Member> for MemberDirectory {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut directory = Self::new();
        for member in iter {
            directory.insert(member);
        }
        directory
    }
}

/// A complete dataset: every division plus the member directory.
#[derive(Debug, Clone)]
pub struct VoteTable {
    /// Dataset identifier, e.g. `"2017"`.
    pub dataset: String,
    pub divisions: Vec<Division>,
    pub members: MemberDirectory,
}
