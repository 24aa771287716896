// src/job/group.rs

//! Packing jobs into display groups.
//!
//! A group holds at most one repeating job and at most two one-shot jobs.
//! The packing is a stable partition of the input, so the same job list
//! always yields the same `(group, slot)` keys.

use std::collections::VecDeque;
use std::fmt;

use super::Cadence;

/// Maximum repeating members per group.
pub const REPEATING_PER_GROUP: usize = 1;
/// Maximum one-shot members per group.
pub const NON_REPEATING_PER_GROUP: usize = 2;

/// Identity of a job's pane: group index plus slot index within the group.
///
/// Slots are numbered repeating members first, then one-shot members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub group: usize,
    pub slot: usize,
}

impl SlotKey {
    pub fn new(group: usize, slot: usize) -> Self {
        Self { group, slot }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.slot)
    }
}

/// One display unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    pub repeating: Vec<T>,
    pub non_repeating: Vec<T>,
}

impl<T> Group<T> {
    fn empty() -> Self {
        Self {
            repeating: Vec::new(),
            non_repeating: Vec::new(),
        }
    }

    /// Members in slot order.
    pub fn members(&self) -> impl Iterator<Item = &T> {
        self.repeating.iter().chain(self.non_repeating.iter())
    }

    /// `(slot index, member)` pairs in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &T)> {
        self.members().enumerate()
    }

    pub fn len(&self) -> usize {
        self.repeating.len() + self.non_repeating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to every member, keeping the layout.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Group<U> {
        Group {
            repeating: self.repeating.iter().map(&mut f).collect(),
            non_repeating: self.non_repeating.iter().map(&mut f).collect(),
        }
    }
}

/// Partition `jobs` into groups of ≤1 repeating + ≤2 one-shot jobs.
///
/// Relative input order is kept within each kind. An empty input yields no
/// groups.
pub fn group_jobs<T, I>(jobs: I) -> Vec<Group<T>>
where
    T: Cadence,
    I: IntoIterator<Item = T>,
{
    let (repeating, non_repeating): (VecDeque<T>, VecDeque<T>) =
        jobs.into_iter().partition(|job| job.is_repeating());
    let mut repeating = repeating;
    let mut non_repeating = non_repeating;

    let mut groups = Vec::new();
    while !repeating.is_empty() || !non_repeating.is_empty() {
        let mut group = Group::empty();

        for _ in 0..REPEATING_PER_GROUP {
            match repeating.pop_front() {
                Some(job) => group.repeating.push(job),
                None => break,
            }
        }
        for _ in 0..NON_REPEATING_PER_GROUP {
            match non_repeating.pop_front() {
                Some(job) => group.non_repeating.push(job),
                None => break,
            }
        }

        groups.push(group);
    }

    groups
}

/// Iterate over every member of `groups` with its slot key.
pub fn keyed<T>(groups: &[Group<T>]) -> impl Iterator<Item = (SlotKey, &T)> {
    groups.iter().enumerate().flat_map(|(group_idx, group)| {
        group
            .slots()
            .map(move |(slot, member)| (SlotKey::new(group_idx, slot), member))
    })
}
