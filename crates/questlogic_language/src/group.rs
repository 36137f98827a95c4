//! Logical expression trees over criteria.
//!
//! A [`LogicalGroup`] owns its children outright, so a tree has no sharing
//! and no cycles. Every traversal here walks an explicit stack instead of
//! recursing, which keeps deep programmatically-built trees safe.

use std::collections::BTreeSet;

use questlogic_foundation::QuestId;

use crate::criterion::Criterion;

/// How the children of a group combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Link {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
    /// Degenerate wrapper around exactly one child.
    None,
}

/// A child of a group: either a leaf predicate or a nested group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// A leaf predicate.
    Criterion(Criterion),
    /// A nested group.
    Group(LogicalGroup),
}

impl Node {
    /// Returns the criterion if this is a leaf.
    #[must_use]
    pub const fn as_criterion(&self) -> Option<&Criterion> {
        match self {
            Self::Criterion(c) => Some(c),
            Self::Group(_) => None,
        }
    }

    /// Returns the group if this is a nested group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&LogicalGroup> {
        match self {
            Self::Group(g) => Some(g),
            Self::Criterion(_) => None,
        }
    }
}

impl From<Criterion> for Node {
    fn from(criterion: Criterion) -> Self {
        Self::Criterion(criterion)
    }
}

impl From<LogicalGroup> for Node {
    fn from(group: LogicalGroup) -> Self {
        Self::Group(group)
    }
}

/// An AND/OR node of a start condition.
///
/// Invariant: a group linked with [`Link::None`] has exactly one child, and
/// a group with more than one child is linked with `And` or `Or`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalGroup {
    link: Link,
    children: Vec<Node>,
}

impl Default for LogicalGroup {
    fn default() -> Self {
        Self::empty()
    }
}

impl LogicalGroup {
    /// Creates a group, repairing the link if it contradicts the child count.
    #[must_use]
    pub fn new(link: Link, children: Vec<Node>) -> Self {
        let mut group = Self { link, children };
        group.normalize();
        group
    }

    /// The empty condition: an AND with no children (always satisfied).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            link: Link::And,
            children: Vec::new(),
        }
    }

    /// Creates an AND group.
    #[must_use]
    pub fn and(children: Vec<Node>) -> Self {
        Self::new(Link::And, children)
    }

    /// Creates an OR group.
    #[must_use]
    pub fn or(children: Vec<Node>) -> Self {
        Self::new(Link::Or, children)
    }

    /// Creates an AND of required-quest criteria.
    #[must_use]
    pub fn all_of(ids: impl IntoIterator<Item = QuestId>) -> Self {
        Self::and(
            ids.into_iter()
                .map(|id| Node::Criterion(Criterion::required_quest(id)))
                .collect(),
        )
    }

    /// Creates an OR of required-quest criteria.
    #[must_use]
    pub fn any_of(ids: impl IntoIterator<Item = QuestId>) -> Self {
        Self::or(
            ids.into_iter()
                .map(|id| Node::Criterion(Criterion::required_quest(id)))
                .collect(),
        )
    }

    /// Returns how the children combine.
    #[must_use]
    pub const fn link(&self) -> Link {
        self.link
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over the direct child groups.
    pub fn child_groups(&self) -> impl Iterator<Item = &LogicalGroup> {
        self.children.iter().filter_map(Node::as_group)
    }

    /// Returns every leaf of the tree, depth-first in source order.
    #[must_use]
    pub fn criteria(&self) -> Vec<&Criterion> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Criterion(c) => out.push(c),
                Node::Group(g) => stack.extend(g.children.iter().rev()),
            }
        }
        out
    }

    /// Returns the nesting depth (a group without child groups has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((group, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(group.child_groups().map(|g| (g, depth + 1)));
        }
        deepest
    }

    /// Quests this condition makes hard prerequisites.
    ///
    /// Union over all leaves of non-negated required-quest values; negated
    /// and valueless references never count.
    #[must_use]
    pub fn referenced_quest_ids(&self) -> BTreeSet<QuestId> {
        self.criteria()
            .into_iter()
            .filter_map(Criterion::prerequisite)
            .collect()
    }

    /// Returns true if `id` is a hard prerequisite anywhere in the tree.
    #[must_use]
    pub fn references(&self, id: QuestId) -> bool {
        self.criteria()
            .into_iter()
            .any(|c| c.prerequisite() == Some(id))
    }

    /// True if any reachable class criterion has a value.
    #[must_use]
    pub fn has_class_dependency(&self) -> bool {
        self.criteria().into_iter().any(Criterion::is_class_gate)
    }

    /// True if this is an OR whose alternatives include a class-gated one.
    #[must_use]
    pub fn is_class_cluster(&self) -> bool {
        self.link == Link::Or && self.has_class_dependency()
    }

    /// Quest ids reached through class-gated alternatives.
    ///
    /// Union of [`LogicalGroup::class_clusters`].
    #[must_use]
    pub fn class_cluster_ids(&self) -> BTreeSet<QuestId> {
        self.class_clusters().into_iter().flatten().collect()
    }

    /// Groups of quest ids that are class variants of one another.
    ///
    /// An OR group yields a single cluster: the ids of every class-dependent
    /// child group, where AND children contribute their whole id set and OR
    /// children are folded into the same disjunction. For AND or wrapper
    /// groups, each class-dependent OR child is a cluster of its own and each
    /// class-dependent AND child contributes its ids as one unit.
    #[must_use]
    pub fn class_clusters(&self) -> Vec<BTreeSet<QuestId>> {
        let mut clusters = Vec::new();
        let mut stack = vec![self];
        while let Some(group) = stack.pop() {
            if group.link == Link::Or {
                let ids = group.alternative_ids();
                if !ids.is_empty() {
                    clusters.push(ids);
                }
                continue;
            }
            for child in group.child_groups().filter(|g| g.has_class_dependency()) {
                if child.link == Link::Or {
                    stack.push(child);
                } else {
                    let ids = child.referenced_quest_ids();
                    if !ids.is_empty() {
                        clusters.push(ids);
                    }
                }
            }
        }
        clusters.sort();
        clusters.dedup();
        clusters
    }

    /// Ids of the class-dependent alternatives of an OR group.
    fn alternative_ids(&self) -> BTreeSet<QuestId> {
        let mut ids = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(group) = stack.pop() {
            for child in group.child_groups().filter(|g| g.has_class_dependency()) {
                if child.link == Link::Or {
                    stack.push(child);
                } else {
                    ids.extend(child.referenced_quest_ids());
                }
            }
        }
        ids
    }

    /// Removes direct children that mention any of `ids`.
    ///
    /// A direct required-quest criterion is dropped when its value is in
    /// `ids`. A child group is dropped as a whole when its prerequisites
    /// intersect `ids`, taking its unrelated leaves with it. Returns the
    /// number of children removed.
    pub fn remove(&mut self, ids: &BTreeSet<QuestId>) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Criterion(c) => !c.quest_id().is_some_and(|id| ids.contains(&id)),
            Node::Group(g) => g.referenced_quest_ids().is_disjoint(ids),
        });
        self.normalize();
        before - self.children.len()
    }

    /// Points every hard prerequisite in `from` at `to`, anywhere in the tree.
    ///
    /// Identical sibling criteria produced by the rewrite are collapsed.
    /// Returns the number of criteria rewritten.
    pub fn retarget(&mut self, from: &BTreeSet<QuestId>, to: QuestId) -> usize {
        let mut rewritten = 0;
        let mut stack: Vec<&mut LogicalGroup> = vec![self];
        while let Some(group) = stack.pop() {
            let mut touched = false;
            for node in &mut group.children {
                if let Node::Criterion(c) = node {
                    if c.prerequisite().is_some_and(|id| from.contains(&id)) {
                        *c = c.retargeted(to);
                        rewritten += 1;
                        touched = true;
                    }
                }
            }
            if touched {
                let mut seen: Vec<Criterion> = Vec::new();
                group.children.retain(|node| match node {
                    Node::Criterion(c) if seen.contains(c) => false,
                    Node::Criterion(c) => {
                        seen.push(*c);
                        true
                    }
                    Node::Group(_) => true,
                });
                group.normalize();
            }
            for node in &mut group.children {
                if let Node::Group(g) = node {
                    stack.push(g);
                }
            }
        }
        rewritten
    }

    /// Adds `id` as an additional hard prerequisite (a new conjunct).
    pub fn add_requirement(&mut self, id: QuestId) {
        if self.references(id) && self.link != Link::Or {
            return;
        }
        let criterion = Node::Criterion(Criterion::required_quest(id));
        if self.link == Link::Or && !self.is_empty() {
            let previous = std::mem::take(self);
            *self = Self::and(vec![Node::Group(previous), criterion]);
        } else {
            self.link = Link::And;
            self.children.push(criterion);
        }
    }

    /// Adds `id` as an additional alternative (a new disjunct).
    ///
    /// An OR left with a single child becomes an AND, matching how a
    /// one-quest condition is normally written.
    pub fn add_alternative(&mut self, id: QuestId) {
        let criterion = Node::Criterion(Criterion::required_quest(id));
        if self.is_empty() {
            self.link = Link::And;
            self.children.push(criterion);
            return;
        }
        if self.link != Link::Or {
            let previous = std::mem::take(self);
            *self = Self::or(vec![Node::Group(previous), criterion]);
            return;
        }
        if !self
            .children
            .iter()
            .any(|n| n.as_criterion().and_then(Criterion::prerequisite) == Some(id))
        {
            self.children.push(criterion);
        }
        if self.children.len() == 1 {
            self.link = Link::And;
        }
    }

    /// Repairs the link after the child list changed.
    fn normalize(&mut self) {
        if self.link == Link::None && self.children.len() != 1 {
            self.link = Link::And;
        }
    }
}
