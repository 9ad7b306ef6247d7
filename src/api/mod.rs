//! HTTP clients for the documentation host.
//!
//! [`ApiClient`] talks to the official, token-authenticated REST API (v3).
//! [`DashboardClient`] drives the cookie-authenticated web dashboard, which is
//! the only way to change a project's maintainers.

mod dashboard;
mod types;
mod v3;

pub use dashboard::{extract_csrf_token, DashboardClient};
pub use types::{Page, Project, ProjectLink, ProjectUrls, ProjectUser, Redirect};
pub use v3::ApiClient;

use reqwest::{Method, Response, StatusCode, Url};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed with {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Pagination of {url} returned {actual} results but reported {expected}")]
    IncompletePagination {
        url: String,
        expected: usize,
        actual: usize,
    },

    #[error("No CSRF token found on {url}; is the dashboard session id still valid?")]
    CsrfTokenMissing { url: String },

    #[error("No dashboard session id configured")]
    MissingSession,

    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

/// Parse a base URL, making sure it ends in a slash so relative joins keep
/// its last path segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Append percent-encoded path segments to a base URL. An empty final segment
/// yields a trailing slash.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn 4xx/5xx responses into [`ApiError::Status`], keeping the body for the
/// error message.
pub(crate) async fn check_status(method: Method, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            method,
            url,
            status,
            body,
        });
    }
    Ok(response)
}
