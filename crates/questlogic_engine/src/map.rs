//! The quest map and queries over its requirement graph.
//!
//! Edges are implicit: `a -> b` exists iff `b` is among `a`'s requested
//! quests. Every walk here uses an explicit stack, so graph size and chain
//! length are bounded only by memory.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use questlogic_foundation::{Error, QuestId, Result};

use crate::quest::Quest;

/// Quests keyed by id, in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Quest>", into = "Vec<Quest>")
)]
pub struct QuestMap {
    quests: BTreeMap<QuestId, Quest>,
}

impl QuestMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a quest, returning the one it replaced.
    pub fn insert(&mut self, quest: Quest) -> Option<Quest> {
        self.quests.insert(quest.id, quest)
    }

    /// Removes a quest.
    pub fn remove(&mut self, id: QuestId) -> Option<Quest> {
        self.quests.remove(&id)
    }

    /// Returns a quest.
    #[must_use]
    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.get(&id)
    }

    /// Returns a quest for modification.
    pub fn get_mut(&mut self, id: QuestId) -> Option<&mut Quest> {
        self.quests.get_mut(&id)
    }

    /// Returns true if the id is present.
    #[must_use]
    pub fn contains(&self, id: QuestId) -> bool {
        self.quests.contains_key(&id)
    }

    /// Number of quests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    /// Returns true if the map holds no quests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// All ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<QuestId> {
        self.quests.keys().copied().collect()
    }

    /// Iterates over quests in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.values()
    }

    /// Iterates mutably over quests in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Quest> {
        self.quests.values_mut()
    }

    // =========================================================================
    // Graph Queries
    // =========================================================================

    /// The requested quests of `id`, or `None` if it is not in the map.
    #[must_use]
    pub fn requested_quests(&self, id: QuestId) -> Option<BTreeSet<QuestId>> {
        self.get(id).map(Quest::requested_quests)
    }

    /// Quests that directly require `id`.
    #[must_use]
    pub fn dependents(&self, id: QuestId) -> BTreeSet<QuestId> {
        self.iter()
            .filter(|q| q.condition.references(id))
            .map(|q| q.id)
            .collect()
    }

    /// Every edge `(from, to)` in ascending order.
    #[must_use]
    pub fn edges(&self) -> Vec<(QuestId, QuestId)> {
        self.iter()
            .flat_map(|q| q.requested_quests().into_iter().map(move |to| (q.id, to)))
            .collect()
    }

    /// Edges whose target is not in the map.
    #[must_use]
    pub fn missing_references(&self) -> Vec<(QuestId, QuestId)> {
        self.edges()
            .into_iter()
            .filter(|(_, to)| !self.contains(*to))
            .collect()
    }

    /// Checks that every requested quest is present.
    ///
    /// # Errors
    /// Returns a structural invariant error naming the first dangling edge.
    pub fn validate_closed(&self) -> Result<()> {
        match self.missing_references().first() {
            None => Ok(()),
            Some((from, to)) => Err(Error::structural(format!(
                "quest {from} requires {to}, which is not in the map"
            ))),
        }
    }

    /// Every quest reachable from `id` through requirements, excluding `id`.
    #[must_use]
    pub fn requirement_closure(&self, id: QuestId) -> BTreeSet<QuestId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for next in self.successors(current) {
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen.remove(&id);
        seen
    }

    /// Ids ordered so that every quest comes after all quests it requires.
    ///
    /// References to quests outside the map are ignored.
    ///
    /// # Errors
    /// Returns a cycle error carrying the ids along the cycle.
    pub fn topological_order(&self) -> Result<Vec<QuestId>> {
        let mut order = Vec::with_capacity(self.len());
        let mut done: BTreeSet<QuestId> = BTreeSet::new();
        for root in self.quests.keys().copied() {
            if done.contains(&root) {
                continue;
            }
            let mut path = Path::default();
            let mut stack = vec![(root, false)];
            while let Some((node, finished)) = stack.pop() {
                if finished {
                    path.pop();
                    done.insert(node);
                    order.push(node);
                    continue;
                }
                if done.contains(&node) {
                    continue;
                }
                path.push(node);
                stack.push((node, true));
                for next in self.successors(node).into_iter().rev() {
                    if !self.contains(next) || done.contains(&next) {
                        continue;
                    }
                    path.check(next)?;
                    stack.push((next, false));
                }
            }
        }
        Ok(order)
    }

    /// The longest chain of requirements leading from `from` to `to`.
    ///
    /// The path includes both ends, so a direct edge alone gives two nodes.
    /// Returns `None` if `to` is not reachable. Ties go to the smaller id.
    ///
    /// # Errors
    /// Returns a cycle error if a cycle is met while searching.
    pub fn longest_path(&self, from: QuestId, to: QuestId) -> Result<Option<Vec<QuestId>>> {
        // For each visited node: length of its longest path to `to`, and the
        // next hop on that path.
        let mut best: BTreeMap<QuestId, Option<(usize, QuestId)>> = BTreeMap::new();
        let mut path = Path::default();
        let mut stack = vec![(from, false)];
        while let Some((node, finished)) = stack.pop() {
            if finished {
                path.pop();
                let choice = self
                    .successors(node)
                    .into_iter()
                    .filter_map(|next| {
                        let (n, _) = best.get(&next).copied().flatten()?;
                        Some((n + 1, next))
                    })
                    .max_by_key(|&(n, next)| (n, Reverse(next)));
                best.insert(node, choice);
                continue;
            }
            if best.contains_key(&node) {
                continue;
            }
            if node == to {
                best.insert(node, Some((1, to)));
                continue;
            }
            path.push(node);
            stack.push((node, true));
            for next in self.successors(node) {
                if best.contains_key(&next) {
                    continue;
                }
                path.check(next)?;
                stack.push((next, false));
            }
        }

        if best.get(&from).copied().flatten().is_none() {
            return Ok(None);
        }
        let mut chain = vec![from];
        let mut current = from;
        while current != to {
            match best.get(&current).copied().flatten() {
                Some((_, next)) => {
                    chain.push(next);
                    current = next;
                }
                None => return Err(Error::structural("broken longest-path chain")),
            }
        }
        Ok(Some(chain))
    }

    fn successors(&self, id: QuestId) -> BTreeSet<QuestId> {
        self.requested_quests(id).unwrap_or_default()
    }
}

/// The chain of nodes currently being expanded by a depth-first walk.
#[derive(Default)]
struct Path {
    order: Vec<QuestId>,
    members: BTreeSet<QuestId>,
}

impl Path {
    fn push(&mut self, id: QuestId) {
        self.order.push(id);
        self.members.insert(id);
    }

    fn pop(&mut self) {
        if let Some(id) = self.order.pop() {
            self.members.remove(&id);
        }
    }

    /// Fails if stepping to `next` would close a cycle.
    fn check(&self, next: QuestId) -> Result<()> {
        if !self.members.contains(&next) {
            return Ok(());
        }
        let at = self.order.iter().position(|&p| p == next).unwrap_or(0);
        let mut cycle = self.order[at..].to_vec();
        cycle.push(next);
        Err(Error::cycle(cycle))
    }
}

impl FromIterator<Quest> for QuestMap {
    fn from_iter<I: IntoIterator<Item = Quest>>(iter: I) -> Self {
        Self {
            quests: iter.into_iter().map(|q| (q.id, q)).collect(),
        }
    }
}

impl Extend<Quest> for QuestMap {
    fn extend<I: IntoIterator<Item = Quest>>(&mut self, iter: I) {
        self.quests.extend(iter.into_iter().map(|q| (q.id, q)));
    }
}

impl IntoIterator for QuestMap {
    type Item = Quest;
    type IntoIter = std::collections::btree_map::IntoValues<QuestId, Quest>;

    fn into_iter(self) -> Self::IntoIter {
        self.quests.into_values()
    }
}

impl From<Vec<Quest>> for QuestMap {
    fn from(quests: Vec<Quest>) -> Self {
        quests.into_iter().collect()
    }
}

impl From<QuestMap> for Vec<Quest> {
    fn from(map: QuestMap) -> Self {
        map.into_iter().collect()
    }
}
