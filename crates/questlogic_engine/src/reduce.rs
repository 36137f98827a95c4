//! Transitive reduction of the requirement graph.
//!
//! A direct edge `a -> b` is inferable when a longer chain also leads from
//! `a` to `b`; such edges are removed from `a`'s start condition.

use std::collections::BTreeSet;

use questlogic_foundation::{ErrorContext, QuestId, Result};

use crate::map::QuestMap;

/// What a reduction removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReductionReport {
    /// Edges that were checked.
    pub examined: usize,
    /// Inferable edges, as `(quest, removed requirement)`.
    pub removed: Vec<(QuestId, QuestId)>,
}

/// Removes prerequisite edges implied by longer chains.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitiveReducer;

impl TransitiveReducer {
    /// Creates a reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reduces `map` in place.
    ///
    /// Edges are visited in ascending `(from, to)` order against the graph
    /// as it stands, so an edge removed earlier no longer counts as a route.
    /// Removal uses [`LogicalGroup::remove`](questlogic_language::LogicalGroup::remove),
    /// which drops any sub-group mentioning the requirement as a whole.
    ///
    /// # Errors
    /// Returns a structural error if a requirement is missing from the map,
    /// or a cycle error if the graph is not acyclic. Nothing is modified in
    /// either case.
    pub fn reduce(&self, map: &mut QuestMap) -> Result<ReductionReport> {
        let context = || ErrorContext::new().with_frame("transitive reduction");
        map.validate_closed().map_err(|e| e.with_context(context()))?;
        map.topological_order()
            .map_err(|e| e.with_context(context()))?;

        let mut report = ReductionReport::default();
        for (from, to) in map.edges() {
            if !map.requested_quests(from).is_some_and(|r| r.contains(&to)) {
                continue;
            }
            report.examined += 1;
            let longest = map.longest_path(from, to)?.map_or(0, |p| p.len());
            if longest > 2 {
                if let Some(quest) = map.get_mut(from) {
                    quest.condition.remove(&BTreeSet::from([to]));
                }
                tracing::debug!(quest = %from, requirement = %to, longest, "removed inferable edge");
                report.removed.push((from, to));
            }
        }
        tracing::info!(
            examined = report.examined,
            removed = report.removed.len(),
            "transitive reduction"
        );
        Ok(report)
    }
}
