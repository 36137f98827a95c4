//! Class-cluster contraction.
//!
//! Many quests exist once per character class: the same step, gated by a
//! different class criterion. A quest whose condition is an OR over such
//! variants is a cluster root. Contraction keeps one representative variant
//! per cluster, deletes the rest, and points every reference at the
//! representative.
//!
//! A quest can depend on class variants without being a detected root
//! (for example an AND over a class-gated group). Each such target gets a
//! synthetic bridge quest so its cluster is merged too; bridges are removed
//! again once their cluster has been merged.

use std::collections::{BTreeMap, BTreeSet};

use questlogic_foundation::{Error, ErrorContext, ErrorKind, QuestId, Result};
use questlogic_language::LogicalGroup;

use crate::map::QuestMap;
use crate::quest::{Quest, QuestKind};

// =============================================================================
// Synthetic Ids
// =============================================================================

/// Hands out ids in the synthetic namespace.
///
/// Synthetic ids are a separate [`QuestId`] variant, so they can never equal
/// an id supplied by game content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticIdAllocator {
    next: u32,
}

impl Default for SyntheticIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticIdAllocator {
    /// Creates an allocator starting at `s1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Creates an allocator that skips every synthetic id already in `map`.
    #[must_use]
    pub fn for_map(map: &QuestMap) -> Self {
        let mut allocator = Self::new();
        allocator.reserve_past(map);
        allocator
    }

    /// Moves past every synthetic id in `map`.
    pub fn reserve_past(&mut self, map: &QuestMap) {
        let referenced = map.iter().flat_map(Quest::requested_quests);
        for id in map.ids().into_iter().chain(referenced) {
            if let QuestId::Synthetic(n) = id {
                self.next = self.next.max(n.saturating_add(1));
            }
        }
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    #[must_use]
    pub const fn peek(&self) -> QuestId {
        QuestId::Synthetic(self.next)
    }

    /// Returns a fresh synthetic id.
    ///
    /// # Errors
    /// Returns an internal error once the namespace is exhausted.
    pub fn allocate(&mut self) -> Result<QuestId> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(|| {
            Error::new(ErrorKind::Internal(
                "synthetic id namespace exhausted".to_string(),
            ))
        })?;
        Ok(QuestId::Synthetic(id))
    }
}

// =============================================================================
// Reports
// =============================================================================

/// One merged cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedCluster {
    /// The root (or bridge) the cluster was found through.
    pub root: QuestId,
    /// The variant that was kept.
    pub representative: QuestId,
    /// The variants that were deleted.
    pub merged: BTreeSet<QuestId>,
    /// True if the root was a synthetic bridge.
    pub via_bridge: bool,
}

/// What a contraction did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractionReport {
    /// Quests detected as cluster roots.
    pub roots: Vec<QuestId>,
    /// Bridge quests created (all removed again before returning).
    pub bridges: Vec<QuestId>,
    /// Clusters merged, in merge order.
    pub clusters: Vec<MergedCluster>,
    /// References rewritten to point at a representative.
    pub redirected: usize,
}

impl ContractionReport {
    /// Returns true if nothing was merged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of quests deleted by merging.
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.clusters.iter().map(|c| c.merged.len()).sum()
    }
}

// =============================================================================
// Contractor
// =============================================================================

/// Collapses class clusters into representatives.
#[derive(Clone, Debug, Default)]
pub struct ClusterContractor {
    allocator: SyntheticIdAllocator,
}

impl ClusterContractor {
    /// Creates a contractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contracts every class cluster in `map`.
    ///
    /// Roots are merged in ascending id order, then bridges. The kept
    /// representative is the smallest id of its cluster. Its condition is
    /// replaced by an AND of its own requirements; what the other variants
    /// required is dropped.
    ///
    /// Bridges are created whether or not any root was detected. Afterwards
    /// no quest depends on class variants, so contracting twice changes
    /// nothing the second time.
    ///
    /// # Errors
    /// Returns a structural error if the map is not closed before or after
    /// contraction.
    pub fn contract(&mut self, map: &mut QuestMap) -> Result<ContractionReport> {
        let context = || ErrorContext::new().with_frame("cluster contraction");
        map.validate_closed().map_err(|e| e.with_context(context()))?;
        self.allocator.reserve_past(map);

        let mut report = ContractionReport {
            roots: detect_roots(map),
            ..ContractionReport::default()
        };
        let bridges = self.add_bridges(map, &report.roots)?;
        report.bridges = bridges.keys().copied().collect();

        let mut merger = Merger::default();
        for &root in &report.roots {
            let Some(quest) = map.get(root) else { continue };
            let cluster = merger.live(map, quest.condition.class_cluster_ids(), root);
            if let Some(merged) = merger.merge_into_root(map, root, cluster) {
                report.clusters.push(merged);
            }
        }
        for (&bridge, (target, dependents)) in &bridges {
            map.remove(bridge);
            let target = merger.resolve(*target);
            let cluster: BTreeSet<QuestId> = dependents
                .iter()
                .filter_map(|&d| map.get(d))
                .flat_map(|d| d.condition.class_clusters())
                .filter(|unit| unit.contains(&target))
                .flatten()
                .collect();
            let cluster = merger.live(map, cluster, bridge);
            if let Some(merged) = merger.merge_through_bridge(map, bridge, dependents, cluster) {
                report.clusters.push(merged);
            }
        }
        report.redirected = merger.redirected;

        map.validate_closed().map_err(|e| e.with_context(context()))?;
        tracing::info!(
            roots = report.roots.len(),
            bridges = report.bridges.len(),
            merged = report.merged_count(),
            "cluster contraction"
        );
        Ok(report)
    }

    /// Creates one bridge per class-dependent target of quests outside every
    /// detected root's reach.
    fn add_bridges(
        &mut self,
        map: &mut QuestMap,
        roots: &[QuestId],
    ) -> Result<BTreeMap<QuestId, (QuestId, BTreeSet<QuestId>)>> {
        let mut already_detected: BTreeSet<QuestId> = roots.iter().copied().collect();
        for &root in roots {
            already_detected.extend(map.requested_quests(root).unwrap_or_default());
        }

        let mut dependents_of: BTreeMap<QuestId, BTreeSet<QuestId>> = BTreeMap::new();
        for quest in map.iter() {
            if already_detected.contains(&quest.id) || !quest.condition.has_class_dependency() {
                continue;
            }
            for target in quest.condition.class_cluster_ids() {
                dependents_of.entry(target).or_default().insert(quest.id);
            }
        }

        let mut bridges = BTreeMap::new();
        for (target, dependents) in dependents_of {
            let id = self.allocator.allocate()?;
            let bridge = Quest::new(
                id,
                format!("class variants of {target}"),
                LogicalGroup::any_of(dependents.iter().copied()),
            )
            .with_kind(QuestKind::Artificial { target });
            tracing::debug!(bridge = %id, %target, dependents = dependents.len(), "bridge");
            map.insert(bridge);
            bridges.insert(id, (target, dependents));
        }
        Ok(bridges)
    }
}

/// Quests whose condition is an OR over class-gated quest variants.
fn detect_roots(map: &QuestMap) -> Vec<QuestId> {
    map.iter()
        .filter(|q| q.condition.is_class_cluster() && !q.condition.class_cluster_ids().is_empty())
        .map(|q| q.id)
        .collect()
}

/// Merge bookkeeping shared by root and bridge merges.
#[derive(Default)]
struct Merger {
    /// Deleted variant -> the representative that replaced it.
    redirects: BTreeMap<QuestId, QuestId>,
    redirected: usize,
}

impl Merger {
    /// Follows redirects left by earlier merges.
    fn resolve(&self, mut id: QuestId) -> QuestId {
        while let Some(&next) = self.redirects.get(&id) {
            id = next;
        }
        id
    }

    /// Maps cluster ids through earlier merges and keeps those still present.
    fn live(&self, map: &QuestMap, cluster: BTreeSet<QuestId>, root: QuestId) -> BTreeSet<QuestId> {
        cluster
            .into_iter()
            .map(|id| self.resolve(id))
            .filter(|&id| id != root && map.contains(id))
            .collect()
    }

    fn merge_into_root(
        &mut self,
        map: &mut QuestMap,
        root: QuestId,
        cluster: BTreeSet<QuestId>,
    ) -> Option<MergedCluster> {
        let representative = self.collapse(map, &cluster)?;
        if let Some(quest) = map.get_mut(root) {
            quest.condition = LogicalGroup::all_of([representative]);
        }
        Some(self.finish(map, root, representative, cluster, false))
    }

    fn merge_through_bridge(
        &mut self,
        map: &mut QuestMap,
        bridge: QuestId,
        dependents: &BTreeSet<QuestId>,
        cluster: BTreeSet<QuestId>,
    ) -> Option<MergedCluster> {
        let representative = self.collapse(map, &cluster)?;
        for &dependent in dependents {
            if let Some(quest) = map.get_mut(dependent) {
                quest.condition.remove(&cluster);
                quest.condition.add_requirement(representative);
            }
        }
        Some(self.finish(map, bridge, representative, cluster, true))
    }

    /// Turns the smallest cluster member into the representative.
    fn collapse(&self, map: &mut QuestMap, cluster: &BTreeSet<QuestId>) -> Option<QuestId> {
        let representative = cluster.first().copied()?;
        let quest = map.get_mut(representative)?;
        let own: BTreeSet<QuestId> = quest
            .requested_quests()
            .difference(cluster)
            .copied()
            .collect();
        tracing::debug!(
            quest = %representative,
            before = %quest.condition,
            kept = own.len(),
            "representative keeps only its own requirements"
        );
        quest.condition = LogicalGroup::all_of(own);
        quest.kind = QuestKind::Substitute;
        Some(representative)
    }

    /// Deletes the other variants and redirects references to them.
    fn finish(
        &mut self,
        map: &mut QuestMap,
        root: QuestId,
        representative: QuestId,
        mut cluster: BTreeSet<QuestId>,
        via_bridge: bool,
    ) -> MergedCluster {
        cluster.remove(&representative);
        for &gone in &cluster {
            map.remove(gone);
            self.redirects.insert(gone, representative);
        }
        for quest in map.iter_mut() {
            self.redirected += quest.condition.retarget(&cluster, representative);
        }
        tracing::debug!(%root, %representative, merged = cluster.len(), via_bridge, "merged cluster");
        MergedCluster {
            root,
            representative,
            merged: cluster,
            via_bridge,
        }
    }
}
