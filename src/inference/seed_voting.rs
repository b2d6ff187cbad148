//! Majority vote over candidate containers
//!
//! Containers are counted by structural identity ([`NodeId`]), never by markup.
//! Counting keeps first-seen order so a tie goes to the container that was
//! voted for first.

use crate::domain::NodeId;

#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    counts: Vec<(NodeId, usize)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, container: NodeId) {
        match self.counts.iter_mut().find(|(id, _)| *id == container) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((container, 1)),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Candidates with their vote counts, in first-seen order
    pub fn counts(&self) -> &[(NodeId, usize)] {
        &self.counts
    }

    /// Container with the most votes; `None` when nothing was recorded.
    pub fn winner(&self) -> Option<(NodeId, usize)> {
        self.counts
            .iter()
            .copied()
            .fold(None, |best: Option<(NodeId, usize)>, candidate| match best {
                Some(current) if current.1 >= candidate.1 => Some(current),
                _ => Some(candidate),
            })
    }
}

impl FromIterator<NodeId> for VoteTally {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut tally = Self::new();
        for container in iter {
            tally.record(container);
        }
        tally
    }
}
