use std::collections::BTreeSet;

/// The diff between the live key set and the desired key set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan<K: Ord> {
    /// Desired but not live
    pub to_create: BTreeSet<K>,
    /// Live but not desired
    pub to_delete: BTreeSet<K>,
    /// Live and desired
    pub to_keep: BTreeSet<K>,
}

/// What happens to one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction<'a, K> {
    Create(&'a K),
    Delete(&'a K),
    Keep(&'a K),
}

impl<K: Ord> Default for ReconciliationPlan<K> {
    fn default() -> Self {
        Self {
            to_create: BTreeSet::new(),
            to_delete: BTreeSet::new(),
            to_keep: BTreeSet::new(),
        }
    }
}

impl<K: Ord> ReconciliationPlan<K> {
    /// True when applying the plan would not change anything
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// One action per key of `existing ∪ desired`, in key order
    pub fn actions(&self) -> impl Iterator<Item = PlannedAction<'_, K>> {
        let mut actions: Vec<PlannedAction<'_, K>> = self
            .to_create
            .iter()
            .map(PlannedAction::Create)
            .chain(self.to_delete.iter().map(PlannedAction::Delete))
            .chain(self.to_keep.iter().map(PlannedAction::Keep))
            .collect();
        // The three sets are disjoint, so ordering by key is total
        actions.sort_by(|a, b| a.key().cmp(b.key()));
        actions.into_iter()
    }
}

impl<'a, K> PlannedAction<'a, K> {
    pub fn key(&self) -> &'a K {
        match *self {
            PlannedAction::Create(key) | PlannedAction::Delete(key) | PlannedAction::Keep(key) => {
                key
            }
        }
    }
}

/// Compute the minimal edit set turning `existing` into `desired`.
pub fn build_reconciliation_plan<K: Ord + Clone>(
    existing: &BTreeSet<K>,
    desired: &BTreeSet<K>,
) -> ReconciliationPlan<K> {
    let to_create: BTreeSet<K> = desired.difference(existing).cloned().collect();
    let to_delete: BTreeSet<K> = existing.difference(desired).cloned().collect();
    let to_keep: BTreeSet<K> = existing.difference(&to_delete).cloned().collect();

    ReconciliationPlan {
        to_create,
        to_delete,
        to_keep,
    }
}
