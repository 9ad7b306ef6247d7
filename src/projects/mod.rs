use crate::api::{ApiClient, ApiError, Project};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not find project {0:?}")]
    NotFound(String),
}

/// A top-level project and the subprojects attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTree<'a> {
    pub root: &'a Project,
    pub subprojects: Vec<&'a Project>,
}

/// Find a project by its display name (not its slug)
pub fn find_project<'a>(projects: &'a [Project], name: &str) -> Result<&'a Project, ProjectError> {
    projects
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ProjectError::NotFound(name.to_string()))
}

/// Fetch all projects and resolve one by name.
///
/// The whole list is always fetched: the API has no lookup by name.
pub async fn resolve_project(client: &ApiClient, name: &str) -> Result<Project, ProjectError> {
    let projects = client.projects().await?;
    find_project(&projects, name).cloned()
}

/// Group projects under their parents, keeping API order. Subprojects whose
/// parent is not visible are not shown.
pub fn project_trees(projects: &[Project]) -> Vec<ProjectTree<'_>> {
    let (roots, leaves): (Vec<&Project>, Vec<&Project>) =
        projects.iter().partition(|p| p.subproject_of.is_none());

    roots
        .into_iter()
        .map(|root| ProjectTree {
            root,
            subprojects: leaves
                .iter()
                .copied()
                .filter(|leaf| {
                    leaf.subproject_of
                        .as_ref()
                        .is_some_and(|parent| parent.id == root.id)
                })
                .collect(),
        })
        .collect()
}
