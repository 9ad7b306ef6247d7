pub mod api;
pub mod cli;
pub mod config;
pub mod maintainers;
pub mod projects;
pub mod reconciliation;
pub mod redirects;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, DashboardClient, Project, Redirect};
pub use config::{load_config, ConfigError, ConfigOverrides, RtdConfig};
pub use maintainers::{parse_desired_maintainers, project_maintainers, MaintainerTarget};
pub use projects::{find_project, project_trees, resolve_project, ProjectError, ProjectTree};
pub use reconciliation::{
    build_reconciliation_plan, execute_reconciliation, load_snapshot, sync, InputError,
    ReconciliationPlan, ReconciliationResult, ReconciliationSummary, SyncCapabilities, SyncError,
    SyncMode, SyncNotice, SyncTarget,
};
pub use redirects::{parse_desired_redirects, RedirectKey, RedirectTarget};
