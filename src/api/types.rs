use crate::redirects::RedirectKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a paginated collection
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    // A plain `default` would add a `T: Default` bound
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUrls {
    pub documentation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to a parent project, as embedded in `subproject_of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub id: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUser {
    pub username: String,
}

/// A project as returned by the API. Fields we don't use are kept in `extra`
/// so JSON output shows the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub urls: ProjectUrls,
    #[serde(default)]
    pub subproject_of: Option<ProjectLink>,
    #[serde(default)]
    pub users: Vec<ProjectUser>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A live redirect record. Only `pk` and the key fields matter for syncing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    pub pk: u64,
    #[serde(rename = "type")]
    pub redirect_type: String,
    #[serde(default)]
    pub from_url: Option<String>,
    #[serde(default)]
    pub to_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Redirect {
    pub fn key(&self) -> RedirectKey {
        RedirectKey {
            redirect_type: self.redirect_type.clone(),
            from_url: self.from_url.clone(),
            to_url: self.to_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_deserializes_and_keeps_extra_fields() {
        let json = r#"{
            "pk": 42,
            "type": "exact",
            "from_url": "/old",
            "to_url": "/new",
            "http_status": 302,
            "created": "2022-03-15T17:27:21.853811Z",
            "modified": "2022-03-15T17:27:21Z"
        }"#;
        let redirect: Redirect = serde_json::from_str(json).unwrap();

        assert_eq!(redirect.pk, 42);
        assert_eq!(
            redirect.key(),
            RedirectKey::new("exact", Some("/old"), Some("/new"))
        );
        assert_eq!(redirect.extra.get("http_status"), Some(&Value::from(302)));
        assert!(redirect.created.is_some());
    }

    #[test]
    fn test_redirect_null_urls() {
        let json = r#"{"pk": 1, "type": "clean_url_to_html", "from_url": null}"#;
        let redirect: Redirect = serde_json::from_str(json).unwrap();
        assert!(redirect.from_url.is_none());
        assert!(redirect.to_url.is_none());
    }

    #[test]
    fn test_project_subproject_link() {
        let json = r#"{
            "id": 2,
            "name": "Child",
            "slug": "child",
            "urls": {"documentation": "https://child.readthedocs.io/en/latest/"},
            "subproject_of": {"id": 1, "name": "Parent"},
            "language": {"code": "en"}
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();

        assert_eq!(project.subproject_of.as_ref().map(|p| p.id), Some(1));
        assert!(project.users.is_empty());
        assert!(project.extra.contains_key("language"));
    }

    #[test]
    fn test_page_without_results() {
        let page: Page<Project> = serde_json::from_str(r#"{"count": 0, "next": null}"#).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }
}
