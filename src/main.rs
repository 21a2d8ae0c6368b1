use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use versionkit::changelog::MarkdownChangelog;
use versionkit::cli::{run_workflow, Command, WorkflowArgs};
use versionkit::config;
use versionkit::domain::{CounterMode, PreReleaseTag, ReleasePart, Transition};
use versionkit::source::SourceSet;
use versionkit::ui;

#[derive(Parser)]
#[command(
    name = "bump-version",
    about = "Bump version (SemVer discipline, PEP 440 encoding)",
    version
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Project root containing the version files")]
    root: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Release part accepted by `bump`
#[derive(Clone, Copy, ValueEnum)]
enum PartArg {
    Major,
    Minor,
    Patch,
}

impl From<PartArg> for ReleasePart {
    fn from(part: PartArg) -> Self {
        match part {
            PartArg::Major => ReleasePart::Major,
            PartArg::Minor => ReleasePart::Minor,
            PartArg::Patch => ReleasePart::Patch,
        }
    }
}

/// Pre-release tag accepted by `prerelease`
#[derive(Clone, Copy, ValueEnum)]
enum TagArg {
    #[value(name = "a", alias = "alpha")]
    Alpha,
    #[value(name = "b", alias = "beta")]
    Beta,
    #[value(name = "rc")]
    Rc,
}

impl From<TagArg> for PreReleaseTag {
    fn from(tag: TagArg) -> Self {
        match tag {
            TagArg::Alpha => PreReleaseTag::Alpha,
            TagArg::Beta => PreReleaseTag::Beta,
            TagArg::Rc => PreReleaseTag::ReleaseCandidate,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate current version (PEP 440 canonical, no +local)
    Check,

    /// Set exact version (must be canonical PEP 440)
    Set {
        version: String,
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },

    /// Strip any pre/dev/post to finalize a release
    Finalize {
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },

    /// Bump release part and clear pre/dev/post
    Bump {
        #[arg(value_enum)]
        part: PartArg,
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },

    /// Start or bump a pre-release (a/b/rc)
    Prerelease {
        #[arg(value_enum, help = "Pre-release tag (a/b/rc)")]
        tag: TagArg,
        #[arg(long, help = "Start at <tag>1 regardless of current pre")]
        start: bool,
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },

    /// Set or bump a dev release (.devN)
    Dev {
        #[arg(long, value_name = "N", allow_negative_numbers = true, help = "Set dev number to N")]
        set: Option<i64>,
        #[arg(long, help = "Increment dev number")]
        bump: bool,
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },

    /// Set or bump a post release (.postN)
    Post {
        #[arg(long, value_name = "N", allow_negative_numbers = true, help = "Set post number to N")]
        set: Option<i64>,
        #[arg(long, help = "Increment post number")]
        bump: bool,
        #[arg(long, help = "Preview without writing")]
        dry_run: bool,
    },
}

impl Commands {
    /// Validate flags and map onto a workflow command
    fn into_workflow(self) -> versionkit::Result<WorkflowArgs> {
        let (command, dry_run) = match self {
            Commands::Check => (Command::Check, false),
            Commands::Set { version, dry_run } => (Command::Set { version }, dry_run),
            Commands::Finalize { dry_run } => (Command::Apply(Transition::Finalize), dry_run),
            Commands::Bump { part, dry_run } => {
                (Command::Apply(Transition::Bump(part.into())), dry_run)
            }
            Commands::Prerelease {
                tag,
                start,
                dry_run,
            } => (
                Command::Apply(Transition::Prerelease {
                    tag: tag.into(),
                    start,
                }),
                dry_run,
            ),
            Commands::Dev { set, bump, dry_run } => (
                Command::Apply(Transition::Dev(CounterMode::from_flags(set, bump, "dev")?)),
                dry_run,
            ),
            Commands::Post { set, bump, dry_run } => (
                Command::Apply(Transition::Post(CounterMode::from_flags(
                    set, bump, "post",
                )?)),
                dry_run,
            ),
        };
        Ok(WorkflowArgs { command, dry_run })
    }
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,versionkit=info".to_string(),
            2 => "warn,versionkit=debug".to_string(),
            _ => "debug,versionkit=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Flag validation happens before anything is read or written
    let workflow = args.command.into_workflow()?;

    let config = config::load_config(args.config.as_deref()).context("loading configuration")?;
    let root = args.root.unwrap_or_else(|| config.project.root.clone());

    let sources = SourceSet::from_kinds(&root, &config.project.sources);
    let changelog = MarkdownChangelog::new(config.changelog_path(&root))
        .with_placeholder(config.changelog.placeholder.clone())
        .enabled(config.changelog.enabled);

    let result = run_workflow(&workflow, &sources, &changelog)?;
    ui::report(&workflow.command, &result, workflow.dry_run);
    Ok(())
}
