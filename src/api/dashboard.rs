use super::{check_status, join_segments, parse_base_url, ApiError};
use crate::config::RtdConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest::{redirect, Client, Method, Url};
use std::sync::Arc;
use tracing::debug;

const CSRF_FIELD: &str = "csrfmiddlewaretoken";

static INPUT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<input\b[^>]*>").unwrap());
static NAME_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bname\s*=\s*["']csrfmiddlewaretoken["']"#).unwrap());
static VALUE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bvalue\s*=\s*["']([^"']*)["']"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Add,
    Delete,
}

/// Client for the dashboard's maintainer pages.
///
/// There is no API for maintainers, so this submits the same forms the web
/// UI does, authenticated by the user's `sessionid` cookie.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: Url,
}

impl DashboardClient {
    /// Returns `Ok(None)` when no session id is configured.
    pub fn new(config: &RtdConfig) -> Result<Option<Self>, ApiError> {
        let Some(session_id) = config.session_id.as_deref() else {
            return Ok(None);
        };

        let base_url = parse_base_url(&config.dashboard_url)?;

        // The CSRF cookie is set by the site itself when the users page is
        // fetched, so the jar only needs to be seeded with the session.
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(&format!("sessionid={}; Path=/", session_id), &base_url);

        let http = Client::builder()
            .cookie_provider(jar)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Some(Self { http, base_url }))
    }

    pub async fn add_project_maintainer(
        &self,
        project_slug: &str,
        username: &str,
    ) -> Result<(), ApiError> {
        self.update_users(UserAction::Add, project_slug, username)
            .await
    }

    pub async fn remove_project_maintainer(
        &self,
        project_slug: &str,
        username: &str,
    ) -> Result<(), ApiError> {
        self.update_users(UserAction::Delete, project_slug, username)
            .await
    }

    async fn update_users(
        &self,
        action: UserAction,
        project_slug: &str,
        username: &str,
    ) -> Result<(), ApiError> {
        let users_url = join_segments(&self.base_url, &[project_slug, "users", ""])?;

        // The two forms disagree on the field name
        let (url, field) = match action {
            UserAction::Add => (users_url.clone(), "user"),
            UserAction::Delete => (
                join_segments(&self.base_url, &[project_slug, "users", "delete", ""])?,
                "username",
            ),
        };

        let token = self.csrf_token(&users_url).await?;

        debug!(%url, ?action, %username, "Submitting maintainers form");
        let response = self
            .http
            .post(url)
            .header(REFERER, users_url.as_str())
            .form(&[(field, username), (CSRF_FIELD, token.as_str())])
            .send()
            .await?;
        check_status(Method::POST, response).await?;

        Ok(())
    }

    async fn csrf_token(&self, page_url: &Url) -> Result<String, ApiError> {
        let response = self.http.get(page_url.clone()).send().await?;
        let response = check_status(Method::GET, response).await?;
        let html = response.text().await?;

        extract_csrf_token(&html).ok_or_else(|| ApiError::CsrfTokenMissing {
            url: page_url.to_string(),
        })
    }
}

/// Find the value of the `csrfmiddlewaretoken` hidden input in an HTML page
pub fn extract_csrf_token(html: &str) -> Option<String> {
    INPUT_TAG
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| NAME_ATTR.is_match(tag))
        .find_map(|tag| VALUE_ATTR.captures(tag))
        .map(|captures| captures[1].to_string())
        .filter(|token| !token.is_empty())
}
