use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_describe_semver::cli::{self, DescribeWorkflowArgs};
use git_describe_semver::config::Config;
use git_describe_semver::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-describe-semver",
    about = "Derive a semantic version from the nearest semver tag of a git checkout"
)]
struct Args {
    #[arg(long, default_value = ".", help = "The git worktree directory")]
    dir: PathBuf,

    #[arg(long, help = "Version to fall back to should there be no tag")]
    fallback: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Drop prefix (e.g. 'v') from output"
    )]
    drop_prefix: Option<bool>,

    #[arg(long, help = "Suffix to add to prereleases")]
    prerelease_suffix: Option<String>,

    #[arg(long, help = "Prefix to use as start of prerelease [default: dev]")]
    prerelease_prefix: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Use timestamp instead of commit count for prerelease"
    )]
    prerelease_timestamped: Option<bool>,

    #[arg(
        long,
        value_parser = ["none", "patch", "minor", "major"],
        help = "Release level to bump the described version to"
    )]
    next_release: Option<String>,

    #[arg(long, help = "Format of output, '<version>' is replaced by the version")]
    format: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Print version information")]
    version: bool,

    #[arg(help = "Output file, '-' for stdout or '$VAR' for the file named by VAR")]
    output: Option<String>,
}

impl Args {
    fn into_workflow_args(self) -> DescribeWorkflowArgs {
        let overrides = Config {
            fallback: self.fallback,
            drop_prefix: self.drop_prefix,
            prerelease_prefix: self.prerelease_prefix,
            prerelease_suffix: self.prerelease_suffix,
            prerelease_timestamped: self.prerelease_timestamped,
            next_release: self.next_release,
            format: self.format,
        };

        DescribeWorkflowArgs {
            dir: self.dir,
            config_path: self.config,
            overrides,
            output: self.output,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.version {
        println!("git-describe-semver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Err(e) = cli::run_describe_workflow(args.into_workflow_args(), Utc::now()) {
        ui::display_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
