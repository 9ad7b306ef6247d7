//! URL redirects of a project.
//!
//! The desired state is a YAML list of mappings:
//!
//! ```yaml
//! - type: exact
//!   from_url: /old/
//!   to_url: /new/
//! - type: clean_url_to_html
//! ```

use crate::api::{ApiClient, ApiError, Redirect};
use crate::reconciliation::{InputError, SyncCapabilities, SyncTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a redirect. The server-assigned `pk` is not part
/// of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RedirectKey {
    #[serde(rename = "type")]
    pub redirect_type: String,
    #[serde(default)]
    pub from_url: Option<String>,
    #[serde(default)]
    pub to_url: Option<String>,
}

impl RedirectKey {
    pub fn new(redirect_type: &str, from_url: Option<&str>, to_url: Option<&str>) -> Self {
        Self {
            redirect_type: redirect_type.to_string(),
            from_url: from_url.map(str::to_string),
            to_url: to_url.map(str::to_string),
        }
    }
}

impl fmt::Display for RedirectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {}",
            self.redirect_type,
            self.from_url.as_deref().unwrap_or("-"),
            self.to_url.as_deref().unwrap_or("-")
        )
    }
}

/// Parse a YAML list of redirects.
///
/// An empty or null document is rejected; `[]` is the only way to ask for no
/// redirects at all.
pub fn parse_desired_redirects(source: &str) -> Result<Vec<RedirectKey>, InputError> {
    if source.trim().is_empty() {
        return Err(empty_document());
    }

    let redirects: Option<Vec<RedirectKey>> = serde_yaml::from_str(source)?;
    let Some(redirects) = redirects else {
        return Err(empty_document());
    };

    if let Some(redirect) = redirects.iter().find(|r| r.redirect_type.trim().is_empty()) {
        return Err(InputError::Invalid(format!(
            "redirect with empty type ({})",
            redirect
        )));
    }

    Ok(redirects)
}

fn empty_document() -> InputError {
    InputError::Invalid(
        "desired redirects file is empty; write `[]` to remove every redirect".to_string(),
    )
}

/// Redirects of a project, synced through the REST API. Not verified after
/// applying.
pub struct RedirectTarget<'a> {
    client: &'a ApiClient,
}

impl<'a> RedirectTarget<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SyncTarget for RedirectTarget<'_> {
    type Record = Redirect;
    type Key = RedirectKey;

    fn capabilities(&self) -> SyncCapabilities {
        SyncCapabilities {
            verify_after_apply: false,
        }
    }

    fn key(&self, record: &Redirect) -> RedirectKey {
        record.key()
    }

    fn identifier(&self, record: &Redirect) -> String {
        record.pk.to_string()
    }

    fn parse_desired(&self, source: &str) -> Result<Vec<RedirectKey>, InputError> {
        parse_desired_redirects(source)
    }

    async fn fetch_existing(&self, scope: &str) -> Result<Vec<Redirect>, ApiError> {
        let mut redirects = self.client.project_redirects(scope).await?;
        redirects.sort_by_key(Redirect::key);
        Ok(redirects)
    }

    async fn create(&self, scope: &str, key: &RedirectKey) -> Result<(), ApiError> {
        self.client.create_project_redirect(scope, key).await
    }

    async fn delete(&self, scope: &str, identifier: &str) -> Result<(), ApiError> {
        self.client.delete_project_redirect(scope, identifier).await
    }
}
