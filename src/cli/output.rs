//! Plain-text and JSON rendering for the command line.

use crate::api::Project;
use crate::projects::ProjectTree;
use crate::reconciliation::{ReconciliationSummary, SyncNotice};
use crate::redirects::RedirectKey;
use colored::Colorize;
use serde::Serialize;

pub const DRY_RUN_NOTICE: &str = "No changes made in --dry-run mode. Pass --wet-run to apply them.";

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// `name <documentation url>`
pub fn render_project(project: &Project) -> String {
    format!("{} <{}>", project.name, project.urls.documentation)
}

pub fn render_project_trees(trees: &[ProjectTree<'_>]) -> String {
    let mut out = String::new();
    for tree in trees {
        out.push_str(&format!("{}\n", tree.root.name));
        let last = tree.subprojects.len().saturating_sub(1);
        for (i, sub) in tree.subprojects.iter().enumerate() {
            let branch = if i == last { "└──" } else { "├──" };
            out.push_str(&format!("{} {}\n", branch, sub.name));
        }
    }
    out
}

/// A titled three-column table of redirects
pub fn render_redirect_table<'a>(
    title: &str,
    rows: impl IntoIterator<Item = &'a RedirectKey>,
) -> String {
    const HEADERS: [&str; 3] = ["Type", "From URL", "To URL"];

    let rows: Vec<[&str; 3]> = rows
        .into_iter()
        .map(|r| {
            [
                r.redirect_type.as_str(),
                r.from_url.as_deref().unwrap_or(""),
                r.to_url.as_deref().unwrap_or(""),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str; 3]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", title.bold()));
    out.push_str(&format!("{}\n", line(&HEADERS)));
    let rule = widths.map(|w| "─".repeat(w));
    out.push_str(&format!("{}\n", line(&rule.each_ref().map(String::as_str))));
    for row in &rows {
        out.push_str(&format!("{}\n", line(row)));
    }
    out
}

/// Redirect notices: only changes are printed
pub fn render_redirect_notice(notice: &SyncNotice<'_, RedirectKey>) -> Option<String> {
    match notice {
        SyncNotice::Creating(key) => Some(format!("Creating: {}", key)),
        SyncNotice::Deleting { key, identifier } => {
            Some(format!("Deleting: {} (#{})", key, identifier))
        }
        SyncNotice::Keeping(_) => None,
    }
}

/// Maintainer notices: `+`, `-` or `•` per username
pub fn render_maintainer_notice(notice: &SyncNotice<'_, String>) -> String {
    match notice {
        SyncNotice::Creating(username) => format!("+ {}", username).green().to_string(),
        SyncNotice::Deleting { key, .. } => format!("- {}", key).red().to_string(),
        SyncNotice::Keeping(username) => format!("• {}", username),
    }
}

pub fn render_summary(summary: &ReconciliationSummary) -> String {
    summary.to_string().bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::project_trees;
    use serde_json::json;

    fn project(id: u64, name: &str, parent: Option<u64>) -> Project {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "slug": name,
            "urls": {"documentation": format!("https://{}.readthedocs.io/en/latest/", name)},
            "subproject_of": parent.map(|id| json!({"id": id})),
        }))
        .unwrap()
    }

    #[test]
    fn test_render_project() {
        let p = project(1, "docs", None);
        assert_eq!(render_project(&p), "docs <https://docs.readthedocs.io/en/latest/>");
    }

    #[test]
    fn test_render_project_trees() {
        let projects = vec![
            project(1, "parent", None),
            project(2, "child-a", Some(1)),
            project(3, "child-b", Some(1)),
            project(4, "solo", None),
        ];
        let rendered = render_project_trees(&project_trees(&projects));
        assert_eq!(rendered, "parent\n├── child-a\n└── child-b\nsolo\n");
    }

    #[test]
    fn test_render_redirect_table_aligns_columns() {
        colored::control::set_override(false);
        let rows = vec![
            RedirectKey::new("exact", Some("/a"), Some("/somewhere/else")),
            RedirectKey::new("clean_url_to_html", None, None),
        ];
        let rendered = render_redirect_table("Redirects", &rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Redirects");
        assert_eq!(lines[1], "Type               From URL  To URL");
        assert_eq!(lines[3], "exact              /a        /somewhere/else");
        assert_eq!(lines[4], "clean_url_to_html");
    }

    #[test]
    fn test_render_redirect_notice() {
        let key = RedirectKey::new("exact", Some("/old"), Some("/new"));
        assert_eq!(
            render_redirect_notice(&SyncNotice::Creating(&key)).as_deref(),
            Some("Creating: exact /old → /new")
        );
        assert_eq!(
            render_redirect_notice(&SyncNotice::Deleting {
                key: &key,
                identifier: "17"
            })
            .as_deref(),
            Some("Deleting: exact /old → /new (#17)")
        );
        assert_eq!(render_redirect_notice(&SyncNotice::Keeping(&key)), None);
    }

    #[test]
    fn test_render_maintainer_notice() {
        let name = "carol".to_string();
        assert!(render_maintainer_notice(&SyncNotice::Creating(&name)).contains("+ carol"));
        assert!(render_maintainer_notice(&SyncNotice::Deleting {
            key: &name,
            identifier: "carol"
        })
        .contains("- carol"));
        assert_eq!(render_maintainer_notice(&SyncNotice::Keeping(&name)), "• carol");
    }
}
