//! Maintainers (users) of a project.
//!
//! The desired state is plain text with one username per line. Reading goes
//! through the REST API; changes go through the dashboard.

use crate::api::{ApiClient, ApiError, DashboardClient};
use crate::reconciliation::{InputError, SyncCapabilities, SyncError, SyncTarget};
use async_trait::async_trait;

/// Parse one username per line. Surrounding whitespace is trimmed and blank
/// lines are skipped.
pub fn parse_desired_maintainers(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sorted usernames of a project's maintainers
pub async fn project_maintainers(
    client: &ApiClient,
    project_slug: &str,
) -> Result<Vec<String>, ApiError> {
    let project = client.project(project_slug).await?;
    let mut usernames: Vec<String> = project.users.into_iter().map(|u| u.username).collect();
    usernames.sort();
    Ok(usernames)
}

/// Maintainers of a project. Records and keys are both the username.
pub struct MaintainerTarget<'a> {
    api: &'a ApiClient,
    dashboard: Option<&'a DashboardClient>,
}

impl<'a> MaintainerTarget<'a> {
    pub fn new(api: &'a ApiClient, dashboard: Option<&'a DashboardClient>) -> Self {
        Self { api, dashboard }
    }

    fn dashboard(&self) -> Result<&'a DashboardClient, ApiError> {
        self.dashboard.ok_or(ApiError::MissingSession)
    }
}

#[async_trait]
impl SyncTarget for MaintainerTarget<'_> {
    type Record = String;
    type Key = String;

    fn capabilities(&self) -> SyncCapabilities {
        SyncCapabilities {
            verify_after_apply: true,
        }
    }

    fn key(&self, record: &String) -> String {
        record.clone()
    }

    fn identifier(&self, record: &String) -> String {
        record.clone()
    }

    fn parse_desired(&self, source: &str) -> Result<Vec<String>, InputError> {
        Ok(parse_desired_maintainers(source))
    }

    fn ensure_can_apply(&self) -> Result<(), SyncError> {
        if self.dashboard.is_none() {
            return Err(SyncError::MissingCredentials(
                "Changing maintainers needs a dashboard session. \
                 Pass --session-id or set RTD_SESSION_ID."
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch_existing(&self, scope: &str) -> Result<Vec<String>, ApiError> {
        project_maintainers(self.api, scope).await
    }

    async fn create(&self, scope: &str, key: &String) -> Result<(), ApiError> {
        self.dashboard()?.add_project_maintainer(scope, key).await
    }

    async fn delete(&self, scope: &str, identifier: &str) -> Result<(), ApiError> {
        self.dashboard()?
            .remove_project_maintainer(scope, identifier)
            .await
    }
}
