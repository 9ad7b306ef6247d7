//! Command line surface: argument definitions and command dispatch.

pub mod output;

use crate::api::{ApiClient, DashboardClient, Project};
use crate::config::{load_config, ConfigOverrides, RtdConfig};
use crate::maintainers::{project_maintainers, MaintainerTarget};
use crate::projects::{find_project, project_trees};
use crate::reconciliation::{read_desired_file, sync, SyncMode};
use crate::redirects::RedirectTarget;
use anyhow::{bail, Result};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// rtd - Read the Docs on the command line
#[derive(Parser, Debug)]
#[command(name = "rtd", author, version, about, long_about = None)]
pub struct Args {
    /// Output JSON instead of formatted text
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// API token
    #[arg(long, env = "RTD_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Dashboard `sessionid` cookie, needed to change maintainers
    #[arg(long, env = "RTD_SESSION_ID", hide_env_values = true, global = true)]
    pub session_id: Option<String>,

    /// Base URL of the REST API
    #[arg(long, env = "RTD_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Base URL of the dashboard
    #[arg(long, env = "RTD_DASHBOARD_URL", global = true, hide = true)]
    pub dashboard_url: Option<String>,

    /// Config file (default: ~/.rtd/config.json)
    #[arg(long, env = "RTD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List projects, or show one project by name
    Projects(ProjectsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ProjectsArgs {
    /// Project name
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Option<ProjectCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List or sync the project's redirects
    Redirects(EntityArgs),
    /// List or sync the project's maintainers
    Maintainers(EntityArgs),
}

#[derive(ClapArgs, Debug)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: Option<EntityCommand>,
}

#[derive(Subcommand, Debug)]
pub enum EntityCommand {
    /// Make the live state match a desired-state file
    Sync(SyncArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SyncArgs {
    /// File describing the desired state (YAML for redirects, one username
    /// per line for maintainers)
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Pretend to make changes (the default)
    #[arg(long, conflicts_with = "wet_run")]
    pub dry_run: bool,

    /// Actually make changes
    #[arg(long)]
    pub wet_run: bool,
}

impl SyncArgs {
    pub fn mode(&self) -> SyncMode {
        if self.wet_run {
            SyncMode::WetRun
        } else {
            SyncMode::DryRun
        }
    }
}

impl ProjectsArgs {
    /// `redirects` and `maintainers` only make sense for a named project
    fn check_name(&self) -> Result<()> {
        if self.name.is_none() && self.command.is_some() {
            bail!("a project name is required, e.g. `rtd projects <NAME> redirects`");
        }
        Ok(())
    }
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            dashboard_url: self.dashboard_url.clone(),
            token: self.token.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

/// Run a parsed command line
pub async fn run(args: Args) -> Result<()> {
    match &args.command {
        Command::Projects(projects_args) => projects_args.check_name()?,
    }

    let config = load_config(args.config.as_deref(), args.overrides()).await?;
    let client = ApiClient::new(&config)?;

    match &args.command {
        Command::Projects(projects_args) => {
            run_projects(&config, &client, projects_args, args.json).await
        }
    }
}

async fn run_projects(
    config: &RtdConfig,
    client: &ApiClient,
    args: &ProjectsArgs,
    json: bool,
) -> Result<()> {
    let projects = client.projects().await?;

    let Some(name) = args.name.as_deref() else {
        if json {
            println!("{}", output::to_json(&projects)?);
        } else {
            print!("{}", output::render_project_trees(&project_trees(&projects)));
        }
        return Ok(());
    };

    let project = find_project(&projects, name)?;
    debug!(name = %name, slug = %project.slug, "Resolved project");

    match &args.command {
        None => {
            if json {
                println!("{}", output::to_json(project)?);
            } else {
                println!("{}", output::render_project(project));
            }
            Ok(())
        }
        Some(ProjectCommand::Redirects(entity)) => match &entity.command {
            None => list_redirects(client, project, json).await,
            Some(EntityCommand::Sync(sync_args)) => sync_redirects(client, project, sync_args).await,
        },
        Some(ProjectCommand::Maintainers(entity)) => match &entity.command {
            None => list_maintainers(client, project, json).await,
            Some(EntityCommand::Sync(sync_args)) => {
                sync_maintainers(config, client, project, sync_args).await
            }
        },
    }
}

async fn list_redirects(client: &ApiClient, project: &Project, json: bool) -> Result<()> {
    let mut redirects = client.project_redirects(&project.slug).await?;
    redirects.sort_by_key(|r| r.key());

    if json {
        println!("{}", output::to_json(&redirects)?);
    } else {
        let keys: Vec<_> = redirects.iter().map(|r| r.key()).collect();
        print!("{}", output::render_redirect_table("Redirects", &keys));
    }
    Ok(())
}

async fn sync_redirects(client: &ApiClient, project: &Project, args: &SyncArgs) -> Result<()> {
    let source = read_desired_file(&args.file).await?;
    let target = RedirectTarget::new(client);
    let mode = args.mode();

    let result = sync(&target, &project.slug, &source, mode, |notice| {
        if let Some(line) = output::render_redirect_notice(&notice) {
            println!("{}", line);
        }
    })
    .await?;

    println!();
    print!("{}", output::render_redirect_table("Created", &result.created));
    println!();
    print!("{}", output::render_redirect_table("Deleted", &result.deleted));
    println!();
    println!("{}", output::render_summary(&result.summary()));
    print_dry_run_notice(mode);
    Ok(())
}

async fn list_maintainers(client: &ApiClient, project: &Project, json: bool) -> Result<()> {
    let maintainers = project_maintainers(client, &project.slug).await?;

    if json {
        println!("{}", output::to_json(&maintainers)?);
    } else {
        for username in &maintainers {
            println!("{}", username);
        }
    }
    Ok(())
}

async fn sync_maintainers(
    config: &RtdConfig,
    client: &ApiClient,
    project: &Project,
    args: &SyncArgs,
) -> Result<()> {
    let source = read_desired_file(&args.file).await?;
    let dashboard = DashboardClient::new(config)?;
    let target = MaintainerTarget::new(client, dashboard.as_ref());
    let mode = args.mode();

    let result = sync(&target, &project.slug, &source, mode, |notice| {
        println!("{}", output::render_maintainer_notice(&notice));
    })
    .await?;

    println!();
    println!("{}", output::render_summary(&result.summary()));
    print_dry_run_notice(mode);
    Ok(())
}

fn print_dry_run_notice(mode: SyncMode) {
    if mode.is_dry_run() {
        println!();
        println!("{}", output::DRY_RUN_NOTICE.magenta().bold());
    }
}
