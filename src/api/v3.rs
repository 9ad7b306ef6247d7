use super::types::{Page, Project, Redirect};
use super::{check_status, join_segments, parse_base_url, ApiError};
use crate::config::RtdConfig;
use crate::redirects::RedirectKey;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("rtd-cli/", env!("CARGO_PKG_VERSION"));

/// Client for the REST API (v3).
///
/// Holds its own HTTP session; the token, when configured, is attached to
/// every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    page_size: u32,
}

impl ApiClient {
    pub fn new(config: &RtdConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|_| ApiError::InvalidHeader("Authorization"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: parse_base_url(&config.api_url)?,
            page_size: config.page_size.max(1),
        })
    }

    /// All projects visible to the token
    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        let url = join_segments(&self.base_url, &["projects", ""])?;
        self.get_all(url).await
    }

    /// A single project, including its maintainers (`users`)
    pub async fn project(&self, project_slug: &str) -> Result<Project, ApiError> {
        let url = join_segments(&self.base_url, &["projects", project_slug, ""])?;
        self.get_one(url).await
    }

    pub async fn project_redirects(&self, project_slug: &str) -> Result<Vec<Redirect>, ApiError> {
        let url = join_segments(&self.base_url, &["projects", project_slug, "redirects", ""])?;
        self.get_all(url).await
    }

    pub async fn create_project_redirect(
        &self,
        project_slug: &str,
        redirect: &RedirectKey,
    ) -> Result<(), ApiError> {
        let url = join_segments(&self.base_url, &["projects", project_slug, "redirects", ""])?;
        debug!(%url, %redirect, "Creating redirect");

        let response = self.http.post(url).json(redirect).send().await?;
        check_status(Method::POST, response).await?;
        Ok(())
    }

    pub async fn delete_project_redirect(
        &self,
        project_slug: &str,
        redirect_pk: &str,
    ) -> Result<(), ApiError> {
        let url = join_segments(
            &self.base_url,
            &["projects", project_slug, "redirects", redirect_pk, ""],
        )?;
        debug!(%url, "Deleting redirect");

        let response = self.http.delete(url).send().await?;
        check_status(Method::DELETE, response).await?;
        Ok(())
    }

    async fn get_one<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let response = check_status(Method::GET, response).await?;
        Ok(response.json().await?)
    }

    /// Drain a paginated collection by following `next` links until the end.
    /// The number of collected results must match the reported `count`.
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        let collection = url.to_string();
        let mut expected = None;
        let mut results = Vec::new();

        let limit = self.page_size.to_string();
        let mut request = self.http.get(url).query(&[("limit", limit.as_str())]);

        loop {
            let response = request.send().await?;
            let response = check_status(Method::GET, response).await?;
            let page: Page<T> = response.json().await?;

            expected.get_or_insert(page.count);
            results.extend(page.results);

            // `next` already carries the query string
            match page.next {
                Some(next) => {
                    let next = Url::parse(&next).map_err(|_| ApiError::InvalidUrl(next))?;
                    debug!(url = %next, "Following pagination");
                    request = self.http.get(next);
                }
                None => break,
            }
        }

        let expected = expected.unwrap_or_default();
        if results.len() != expected {
            return Err(ApiError::IncompletePagination {
                url: collection,
                expected,
                actual: results.len(),
            });
        }

        debug!(url = %collection, count = results.len(), "Fetched collection");
        Ok(results)
    }
}
