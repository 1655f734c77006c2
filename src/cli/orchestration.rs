//! Main workflow orchestration logic
//!
//! Separates CLI argument parsing from the describe pipeline so the
//! workflow can be driven programmatically and tested without clap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::cli::output::OutputTarget;
use crate::config::{self, Config};
use crate::domain::{self, generate_version, DescribeResult, GenerateVersionOptions, TagIndex};
use crate::git::{Git2Repository, Repository};

/// Arguments for the describe workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescribeWorkflowArgs {
    /// Git worktree directory
    pub dir: PathBuf,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Settings given on the command line; they win over the config file
    pub overrides: Config,

    /// Output target argument (`-`, a path, or `$ENV_VAR`)
    pub output: Option<String>,
}

/// Result of a successful describe workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The generated version line
    pub version: String,

    /// Where it was written
    pub target: OutputTarget,
}

/// Build the tag index and find the nearest tag to HEAD
pub fn describe_repository<R: Repository + ?Sized>(repo: &R) -> crate::Result<DescribeResult> {
    let tags = TagIndex::build(repo)?;
    domain::describe(repo, &tags)
}

/// Describe `repo` and generate its version string
pub fn generate_for<R: Repository + ?Sized>(
    repo: &R,
    options: &GenerateVersionOptions,
    now: DateTime<Utc>,
) -> Result<String> {
    let described = describe_repository(repo).context("unable to describe commit")?;
    info!(
        tag = described.tag_name.as_deref().unwrap_or("<none>"),
        distance = described.distance,
        head = %described.head,
        "described head"
    );

    generate_version(
        described.tag_name.as_deref(),
        described.distance,
        &described.head_id(),
        now,
        options,
    )
    .context("unable to generate version")
}

/// Open the repository at `dir` and generate its version string
pub fn run(dir: &Path, options: &GenerateVersionOptions, now: DateTime<Utc>) -> Result<String> {
    let repo = Git2Repository::open(dir).context("unable to open git repository")?;
    generate_for(&repo, options, now)
}

/// Full workflow: resolve settings, generate the version, write it out
///
/// Orchestrates:
/// 1. Load the config file and layer command-line overrides on top
/// 2. Resolve the output target (before any work, so a bad target fails fast)
/// 3. Describe the repository and generate the version
/// 4. Write the version line to the target
pub fn run_describe_workflow(
    args: DescribeWorkflowArgs,
    now: DateTime<Utc>,
) -> Result<WorkflowResult> {
    let file_config = config::load_config(args.config_path.as_deref(), &args.dir)
        .context("unable to load configuration")?;
    let options = args
        .overrides
        .overlay(file_config)
        .to_options()
        .context("invalid configuration")?;

    let target = OutputTarget::resolve(args.output.as_deref())?;
    let version = run(&args.dir, &options, now)?;
    target
        .write_line(&version)
        .with_context(|| format!("unable to write version to {}", target))?;

    Ok(WorkflowResult { version, target })
}
