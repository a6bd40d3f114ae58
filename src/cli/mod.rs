//
//  stash-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command-Line Interface
//!
//! Definitions for the `stash` binary, one subcommand per client operation.
//! Results are printed as JSON on stdout.
//!
//! ## Connection Settings
//!
//! Settings are resolved in this order, later sources winning:
//!
//! 1. The config file (`--config`, or the default location if present)
//! 2. Environment variables (`STASH_URL`, `STASH_USERNAME`, `STASH_PASSWORD`)
//! 3. Command-line flags (`--url`, `--username`, `--password`)
//!
//! ## Example
//!
//! ```bash
//! export STASH_URL=https://stash.example.com
//! stash --username admin --password secret branches PROJ app
//! stash create-repo PROJ app --exist-ok
//! stash raw PROJ app README.md --branch develop
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::api::server::has_repository;
use crate::api::{StashClient, StashError};
use crate::config::ClientConfig;
use crate::output::{write_json_to, write_raw_to};
use crate::{exit_codes, is_conflict, is_not_found};

#[derive(Parser, Debug)]
#[command(
    name = "stash",
    version,
    about = "Work with an Atlassian Stash server from the command line",
    propagate_version = true,
    after_help = "Use 'stash <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Connection options shared by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Server root URL, including any context path
    #[arg(long, global = true, env = "STASH_URL")]
    pub url: Option<String>,

    /// Basic auth username
    #[arg(long, short = 'u', global = true, env = "STASH_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, short = 'p', global = true, env = "STASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every repository visible to the caller
    Repos(ReposArgs),

    /// Show one repository
    Repo(RepoArgs),

    /// Create a git repository
    #[command(name = "create-repo")]
    CreateRepo(CreateRepoArgs),

    /// List branches of a repository
    Branches(RepoArgs),

    /// List tags of a repository
    Tags(RepoArgs),

    /// Delete a branch
    #[command(name = "delete-branch")]
    DeleteBranch(BranchArgs),

    /// Show branch restrictions of a repository
    Restrictions(RepoArgs),

    /// Restrict pushes to a branch to one user
    Restrict(RestrictArgs),

    /// Remove a branch restriction
    Unrestrict(UnrestrictArgs),

    /// Show the caller's effective branch permission
    Permissions(RepoArgs),

    /// List pull requests
    Prs(PrsArgs),

    /// Open a pull request
    #[command(name = "create-pr")]
    CreatePr(CreatePrArgs),

    /// Print a file's raw contents at a branch
    Raw(RawArgs),
}

#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Only print the repository with this clone URL
    #[arg(long)]
    pub clone_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Project key
    pub project: String,

    /// Repository slug
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct CreateRepoArgs {
    /// Project key
    pub project: String,

    /// Repository name
    pub name: String,

    /// Succeed without output if the repository already exists
    #[arg(long)]
    pub exist_ok: bool,
}

#[derive(Args, Debug)]
pub struct BranchArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Branch name or full ref
    pub branch: String,
}

#[derive(Args, Debug)]
pub struct RestrictArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Branch name or full ref
    pub branch: String,

    /// The only user allowed to push
    pub user: String,
}

#[derive(Args, Debug)]
pub struct UnrestrictArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Restriction id
    pub id: u64,

    /// Succeed if the restriction does not exist
    #[arg(long)]
    pub missing_ok: bool,
}

#[derive(Args, Debug)]
pub struct PrsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// OPEN, MERGED, DECLINED or ALL
    #[arg(long, short = 's', default_value = "OPEN")]
    pub state: String,
}

#[derive(Args, Debug)]
pub struct CreatePrArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[arg(long, short = 't')]
    pub title: String,

    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Source branch
    #[arg(long)]
    pub from: String,

    /// Target branch
    #[arg(long)]
    pub to: String,

    /// Reviewer username; repeat for several
    #[arg(long = "reviewer", short = 'r')]
    pub reviewers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RawArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// File path within the repository
    pub path: String,

    #[arg(long, short = 'b', default_value = "master")]
    pub branch: String,
}

impl GlobalOptions {
    /// Resolves the effective settings from the config file and overrides.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_from(path)?,
            None => ClientConfig::load()?,
        };

        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(username) = &self.username {
            config.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }

        if config.base_url.is_empty() {
            anyhow::bail!("No server URL. Pass --url, set STASH_URL or add base_url to the config file");
        }
        Ok(config)
    }

    fn client(&self) -> Result<StashClient> {
        let config = self.client_config()?;
        StashClient::from_config(&config)
            .with_context(|| format!("Cannot create a client for {}", config.base_url))
    }
}

impl Cli {
    /// Runs the selected command, writing its result to `out`.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let client = self.global.client()?;
        tracing::debug!("Using {:?}", client);

        match &self.command {
            Commands::Repos(args) => {
                let repositories = client.get_repositories()?;
                match &args.clone_url {
                    Some(url) => match has_repository(&repositories, url) {
                        Some(repo) => write_json_to(out, repo),
                        None => anyhow::bail!("No repository with clone URL {}", url),
                    },
                    None => {
                        let mut repositories: Vec<_> = repositories.into_values().collect();
                        repositories.sort_by_key(|repo| repo.id);
                        write_json_to(out, &repositories)
                    }
                }
            }
            Commands::Repo(args) => write_json_to(out, &client.get_repository(&args.project, &args.slug)?),
            Commands::CreateRepo(args) => match client.create_repository(&args.project, &args.name) {
                Ok(repo) => write_json_to(out, &repo),
                Err(e) if args.exist_ok && is_conflict(Some(&e)) => {
                    tracing::info!("Repository {}/{} already exists", args.project, args.name);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
            Commands::Branches(args) => {
                let mut branches: Vec<_> = client.get_branches(&args.project, &args.slug)?.into_values().collect();
                branches.sort_by(|a, b| a.display_id.cmp(&b.display_id));
                write_json_to(out, &branches)
            }
            Commands::Tags(args) => {
                let mut tags: Vec<_> = client.get_tags(&args.project, &args.slug)?.into_values().collect();
                tags.sort_by(|a, b| a.display_id.cmp(&b.display_id));
                write_json_to(out, &tags)
            }
            Commands::DeleteBranch(args) => {
                client.delete_branch(&args.repo.project, &args.repo.slug, &args.branch)?;
                Ok(())
            }
            Commands::Restrictions(args) => {
                write_json_to(out, &client.get_branch_restrictions(&args.project, &args.slug)?)
            }
            Commands::Restrict(args) => {
                let restriction =
                    client.create_branch_restriction(&args.repo.project, &args.repo.slug, &args.branch, &args.user)?;
                write_json_to(out, &restriction)
            }
            Commands::Unrestrict(args) => {
                match client.delete_branch_restriction(&args.repo.project, &args.repo.slug, args.id) {
                    Err(e) if args.missing_ok && is_not_found(Some(&e)) => Ok(()),
                    result => Ok(result?),
                }
            }
            Commands::Permissions(args) => {
                write_json_to(out, &client.get_branch_permissions(&args.project, &args.slug)?)
            }
            Commands::Prs(args) => {
                let prs = client.get_pull_requests(&args.repo.project, &args.repo.slug, &args.state)?;
                write_json_to(out, &prs)
            }
            Commands::CreatePr(args) => {
                let reviewers: Vec<&str> = args.reviewers.iter().map(String::as_str).collect();
                let pr = client.create_pull_request(
                    &args.repo.project,
                    &args.repo.slug,
                    &args.title,
                    &args.description,
                    &args.from,
                    &args.to,
                    &reviewers,
                )?;
                write_json_to(out, &pr)
            }
            Commands::Raw(args) => {
                let data = client.get_raw_file(&args.repo.project, &args.repo.slug, &args.path, &args.branch)?;
                write_raw_to(out, &data)
            }
        }
    }
}

/// Maps a command failure onto the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let Some(stash) = err.chain().find_map(|e| e.downcast_ref::<StashError>()) else {
        return exit_codes::ERROR;
    };
    if is_not_found(Some(stash)) {
        return exit_codes::NOT_FOUND;
    }
    if is_conflict(Some(stash)) {
        return exit_codes::CONFLICT;
    }

    match stash.status() {
        Some(401) | Some(403) => exit_codes::AUTH_ERROR,
        _ => exit_codes::ERROR,
    }
}
