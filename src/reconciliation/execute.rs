use super::plan::{PlannedAction, ReconciliationPlan};
use super::snapshot::Snapshot;
use super::{SyncError, SyncMode, SyncTarget};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{info, warn};

/// Reported once per action, before the action is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncNotice<'a, K> {
    Creating(&'a K),
    Deleting { key: &'a K, identifier: &'a str },
    Keeping(&'a K),
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult<K> {
    pub mode: SyncMode,
    /// Keys created (or that would have been, in a dry run)
    pub created: Vec<K>,
    /// Keys deleted (or that would have been, in a dry run). A key held by
    /// several live records appears once, though each record was deleted.
    pub deleted: Vec<K>,
    pub kept: Vec<K>,
    /// Whether the live state was re-fetched and matched the desired state
    pub verified: bool,
}

/// Counts for the closing summary line. These count keys, not live records:
/// duplicate records removed under one key count as a single deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub created: usize,
    pub deleted: usize,
    pub kept: usize,
}

impl<K> ReconciliationResult<K> {
    fn new(mode: SyncMode) -> Self {
        Self {
            mode,
            created: Vec::new(),
            deleted: Vec::new(),
            kept: Vec::new(),
            verified: false,
        }
    }

    pub fn summary(&self) -> ReconciliationSummary {
        ReconciliationSummary {
            created: self.created.len(),
            deleted: self.deleted.len(),
            kept: self.kept.len(),
        }
    }
}

impl fmt::Display for ReconciliationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created {}, deleted {}, kept {}.",
            self.created, self.deleted, self.kept
        )
    }
}

/// Apply a plan to the remote side, one call at a time.
///
/// The first failing call aborts the run; anything applied before it stays
/// applied. Nothing is retried. In a dry run no mutating call is made.
pub async fn execute_reconciliation<T, F>(
    target: &T,
    scope: &str,
    snapshot: &Snapshot<T::Record, T::Key>,
    plan: &ReconciliationPlan<T::Key>,
    mode: SyncMode,
    mut on_notice: F,
) -> Result<ReconciliationResult<T::Key>, SyncError>
where
    T: SyncTarget,
    F: FnMut(SyncNotice<'_, T::Key>),
{
    let dry_run = mode.is_dry_run();

    let mut records_by_key: BTreeMap<T::Key, Vec<&T::Record>> = BTreeMap::new();
    for record in &snapshot.existing_records {
        records_by_key
            .entry(target.key(record))
            .or_default()
            .push(record);
    }

    let mut result = ReconciliationResult::new(mode);

    for action in plan.actions() {
        match action {
            PlannedAction::Create(key) => {
                on_notice(SyncNotice::Creating(key));

                if !dry_run {
                    target.create(scope, key).await?;
                    info!(scope = %scope, key = %key, "Created");
                }

                result.created.push(key.clone());
            }
            PlannedAction::Delete(key) => {
                let Some(records) = records_by_key.get(key) else {
                    warn!(scope = %scope, key = %key, "No live record to delete");
                    continue;
                };

                // Duplicate live records for one key are all removed
                for record in records {
                    let identifier = target.identifier(record);
                    on_notice(SyncNotice::Deleting {
                        key,
                        identifier: &identifier,
                    });

                    if !dry_run {
                        target.delete(scope, &identifier).await?;
                        info!(scope = %scope, key = %key, identifier = %identifier, "Deleted");
                    }
                }

                result.deleted.push(key.clone());
            }
            PlannedAction::Keep(key) => {
                on_notice(SyncNotice::Keeping(key));
                result.kept.push(key.clone());
            }
        }
    }

    if !dry_run && target.capabilities().verify_after_apply {
        verify(target, scope, &snapshot.desired_keys).await?;
        result.verified = true;
    }

    Ok(result)
}

/// Re-fetch the live state and require it to equal the desired keys
async fn verify<T: SyncTarget>(
    target: &T,
    scope: &str,
    desired_keys: &BTreeSet<T::Key>,
) -> Result<(), SyncError> {
    let live: BTreeSet<T::Key> = target
        .fetch_existing(scope)
        .await?
        .iter()
        .map(|record| target.key(record))
        .collect();

    if &live != desired_keys {
        return Err(SyncError::ConsistencyFault {
            expected: desired_keys.iter().map(ToString::to_string).collect(),
            actual: live.iter().map(ToString::to_string).collect(),
        });
    }

    info!(scope = %scope, count = live.len(), "Verified live state");
    Ok(())
}
