use anyhow::{bail, Context, Result};

use crate::config::{self, ProjectMapping, TrackerConfig};
use crate::tracker::pivotal::PivotalClient;
use crate::tracker::stories::{self, ProjectMembership};

#[derive(Debug, PartialEq)]
pub struct InitArgs {
    pub token: String,
    pub api_base: Option<String>,
}

/// `story init --token <token> [--api-base <url>]`
pub fn handle_init(args: &[String]) -> Result<()> {
    let InitArgs { token, api_base } = parse_init_args(args)?;
    let mut cfg = config::load_config()?;
    cfg.tracker = Some(TrackerConfig {
        api_token: token,
        api_base,
    });
    config::save_config(&cfg)?;
    println!("Token saved. Run `story projects` to see your projects.");
    Ok(())
}

/// `story projects`: list the projects the token can see.
pub async fn handle_projects() -> Result<()> {
    let projects = fetch_projects().await?;
    let mappings = config::load_project_mappings()?;
    let current = mappings
        .get(&config::current_project_dir())
        .map(|m| m.project_id);

    if projects.is_empty() {
        println!("No projects visible to this token.");
    }
    for p in projects {
        let marker = if Some(p.project_id) == current { "*" } else { " " };
        println!("{marker} {:>10}  {}", p.project_id, p.project_name);
    }
    Ok(())
}

/// `story use <project-id>`: bind the current directory to a project.
pub async fn handle_use(args: &[String]) -> Result<()> {
    let project_id = parse_use_args(args)?;
    let projects = fetch_projects().await?;
    let Some(project) = projects.into_iter().find(|p| p.project_id == project_id) else {
        bail!("Project {project_id} not found. Run `story projects` to list yours.");
    };

    let dir = config::current_project_dir();
    let mapping = ProjectMapping {
        project_id,
        project_name: project.project_name,
    };
    config::save_project_mapping(&dir, &mapping)?;
    println!("{dir} now tracks {} ({project_id})", mapping.project_name);
    Ok(())
}

async fn fetch_projects() -> Result<Vec<ProjectMembership>> {
    let cfg = config::load_config()?;
    let token = cfg
        .api_token()
        .context("No tracker token. Run `story init --token <token>` first")?;
    let client = PivotalClient::new(token, cfg.api_base());
    stories::list_projects(&client)
        .await
        .context("Failed to list projects")
}

pub fn parse_init_args(args: &[String]) -> Result<InitArgs> {
    let mut token = None;
    let mut api_base = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--token" | "-t" => {
                i += 1;
                token = Some(args.get(i).context("Missing value for --token")?.clone());
            }
            "--api-base" => {
                i += 1;
                api_base = Some(args.get(i).context("Missing value for --api-base")?.clone());
            }
            other => bail!("Unexpected argument: {other}\n\nUsage: story init --token <token>"),
        }
        i += 1;
    }

    let token = token
        .filter(|t| !t.trim().is_empty())
        .context("Usage: story init --token <token>")?;
    Ok(InitArgs { token, api_base })
}

pub fn parse_use_args(args: &[String]) -> Result<u64> {
    match args {
        [id] => id
            .parse()
            .with_context(|| format!("Invalid project id: {id}")),
        _ => bail!("Usage: story use <project-id>"),
    }
}

pub fn print_help() {
    println!("story — terminal companion for the story on your current branch\n");
    println!("USAGE:");
    println!("  story                       Watch the story named by the current git branch");
    println!("  story init --token <token>  Save your tracker API token");
    println!("  story projects              List projects visible to the token");
    println!("  story use <project-id>      Track that project from this directory");
    println!();
    println!("Branches are matched by a trailing run of 8+ digits, e.g. feature/add-login-183456789.");
    println!();
    println!("KEYS:");
    println!("  tab/←/→ switch tab   ↑↓ select   s advance state   space toggle task");
    println!("  a add task   e edit task   d delete task   c comment   r refresh   q quit");
}
