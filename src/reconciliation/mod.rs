//! Set reconciliation between a desired state file and the live remote state.
//!
//! Every syncable entity kind implements [`SyncTarget`]. The engine then runs
//! the same steps for all of them:
//! 1. Parse the desired state and fetch the live state ([`load_snapshot`])
//! 2. Diff the two key sets ([`build_reconciliation_plan`])
//! 3. Apply creates and deletes one at a time, unless dry-running
//!    ([`execute_reconciliation`])
//! 4. Re-fetch and compare, for kinds that support verification

mod execute;
mod plan;
mod snapshot;
mod target;

pub use execute::{execute_reconciliation, ReconciliationResult, ReconciliationSummary, SyncNotice};
pub use plan::{build_reconciliation_plan, PlannedAction, ReconciliationPlan};
pub use snapshot::{load_snapshot, read_desired_file, Snapshot};
pub use target::{SyncCapabilities, SyncMode, SyncTarget};

use crate::api::ApiError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// The desired state could not be read or understood
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid desired state: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Transport(#[from] ApiError),

    #[error("{0}")]
    MissingCredentials(String),

    #[error(
        "Remote state does not match the desired state after applying changes \
         (expected [{}], found [{}])",
        .expected.join(", "),
        .actual.join(", ")
    )]
    ConsistencyFault {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Load, diff, apply and (where supported) verify in one go.
///
/// `on_notice` is called once per planned action, in key order, before the
/// corresponding mutation is attempted.
pub async fn sync<T, F>(
    target: &T,
    scope: &str,
    desired_source: &str,
    mode: SyncMode,
    on_notice: F,
) -> Result<ReconciliationResult<T::Key>, SyncError>
where
    T: SyncTarget,
    F: FnMut(SyncNotice<'_, T::Key>),
{
    if !mode.is_dry_run() {
        target.ensure_can_apply()?;
    }

    let snapshot = load_snapshot(target, scope, desired_source).await?;
    let plan = build_reconciliation_plan(&snapshot.existing_keys, &snapshot.desired_keys);

    info!(
        scope = %scope,
        to_create = plan.to_create.len(),
        to_delete = plan.to_delete.len(),
        to_keep = plan.to_keep.len(),
        dry_run = mode.is_dry_run(),
        "Reconciliation plan built"
    );

    execute_reconciliation(target, scope, &snapshot, &plan, mode, on_notice).await
}
