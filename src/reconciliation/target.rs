use super::{InputError, SyncError};
use crate::api::ApiError;
use async_trait::async_trait;
use std::fmt;

/// Whether mutations are actually sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Compute and report the diff only
    #[default]
    DryRun,
    /// Apply the diff
    WetRun,
}

impl SyncMode {
    pub fn is_dry_run(self) -> bool {
        self == SyncMode::DryRun
    }
}

/// Optional behavior an entity kind opts into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCapabilities {
    /// Re-fetch after a wet run and require the live keys to equal the
    /// desired keys exactly
    pub verify_after_apply: bool,
}

/// An entity kind that can be reconciled within a scope (a project).
///
/// Keys define identity: two records with equal keys are the same entity,
/// whatever their other fields say.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Full record as fetched from the remote side
    type Record: Send + Sync;
    /// Identity of a record; also the payload needed to create one
    type Key: Ord + Clone + fmt::Display + Send + Sync;

    fn capabilities(&self) -> SyncCapabilities;

    fn key(&self, record: &Self::Record) -> Self::Key;

    /// Server-side identifier used to address a deletion
    fn identifier(&self, record: &Self::Record) -> String;

    /// Parse desired-state text into keys. Duplicates are allowed.
    fn parse_desired(&self, source: &str) -> Result<Vec<Self::Key>, InputError>;

    /// Checked before a wet run starts loading anything
    fn ensure_can_apply(&self) -> Result<(), SyncError> {
        Ok(())
    }

    /// Every live record in the scope
    async fn fetch_existing(&self, scope: &str) -> Result<Vec<Self::Record>, ApiError>;

    async fn create(&self, scope: &str, key: &Self::Key) -> Result<(), ApiError>;

    async fn delete(&self, scope: &str, identifier: &str) -> Result<(), ApiError>;
}
