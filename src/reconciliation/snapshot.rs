use super::{InputError, SyncError, SyncTarget};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Live and desired state of one scope, loaded before anything is applied
#[derive(Debug, Clone)]
pub struct Snapshot<R, K: Ord> {
    /// Full live records, needed to address deletions
    pub existing_records: Vec<R>,
    pub existing_keys: BTreeSet<K>,
    pub desired_keys: BTreeSet<K>,
}

/// Read a desired-state file
pub async fn read_desired_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse the desired state, then fetch the live state.
///
/// Parsing comes first so a broken file never causes any network traffic.
pub async fn load_snapshot<T: SyncTarget>(
    target: &T,
    scope: &str,
    desired_source: &str,
) -> Result<Snapshot<T::Record, T::Key>, SyncError> {
    let desired = target.parse_desired(desired_source)?;
    let desired_count = desired.len();
    let desired_keys: BTreeSet<T::Key> = desired.into_iter().collect();

    if desired_keys.len() != desired_count {
        debug!(
            duplicates = desired_count - desired_keys.len(),
            "Collapsed duplicate entries in desired state"
        );
    }

    let existing_records = target.fetch_existing(scope).await?;
    let mut existing_keys = BTreeSet::new();

    for record in &existing_records {
        let key = target.key(record);
        if existing_keys.contains(&key) {
            warn!(
                scope = %scope,
                key = %key,
                "Live state contains duplicate entries for the same key"
            );
        } else {
            existing_keys.insert(key);
        }
    }

    debug!(
        scope = %scope,
        existing = existing_keys.len(),
        desired = desired_keys.len(),
        "Loaded snapshot"
    );

    Ok(Snapshot {
        existing_records,
        existing_keys,
        desired_keys,
    })
}
