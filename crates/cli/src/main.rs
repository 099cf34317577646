//! Builds and maintains a release repository for self-updating clients.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use depot_core::{RepoConfig, RetentionPolicy};
use depot_engine::{Confirm, IngestOptions, PruneOptions};
use depot_storage::FilesystemBackend;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "depotctl")]
#[command(about = "Builds a release repository for self-updating clients")]
#[command(version)]
struct Cli {
    /// The path to a repo
    #[arg(long, env = "DEPOT_REPO", value_parser = existing_dir)]
    repo: PathBuf,

    /// Config file path
    #[arg(long, env = "DEPOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a release to the repo
    AddRelease(AddReleaseArgs),
    /// Prune releases from the repo
    #[command(after_help = "You cannot use both --max-age and --max-releases, only set one.")]
    Prune(PruneArgs),
}

#[derive(Args)]
struct AddReleaseArgs {
    /// Path to the goreleaser dist folder
    #[arg(long, value_parser = existing_dir)]
    release: PathBuf,
    /// Notes about this release
    #[arg(long, default_value = "")]
    notes: String,
    /// Mark the release as a draft
    #[arg(long, default_value_t = false)]
    draft: bool,
    /// Mark the release as a prerelease
    #[arg(long, default_value_t = false)]
    prerelease: bool,
    /// Include binary artifacts
    #[arg(long, default_value_t = false)]
    include_binary: bool,
    /// Replace an existing release with the same version without asking
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Exact publish time (RFC 3339) instead of the metadata date
    #[arg(long, value_parser = parse_timestamp)]
    published_at: Option<OffsetDateTime>,
    /// Use the current time for published at instead of the metadata date
    #[arg(long, default_value_t = false)]
    published_at_now: bool,
}

#[derive(Args)]
struct PruneArgs {
    /// Delete releases older than this (e.g. 216h, 30days)
    #[arg(long, value_parser = parse_duration)]
    max_age: Option<time::Duration>,
    /// Maximum number of releases to keep
    #[arg(long)]
    max_releases: Option<usize>,
    /// Just log the result without actually pruning
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let now = OffsetDateTime::now_utc();
    let config = load_repo_config(cli.config.as_deref())?;

    match cli.command {
        Commands::AddRelease(args) => handle_add_release(&cli.repo, &config, args, now).await,
        Commands::Prune(args) => handle_prune(&cli.repo, &config, args, now).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn handle_add_release(
    repo: &Path,
    config: &RepoConfig,
    args: AddReleaseArgs,
    now: OffsetDateTime,
) -> Result<()> {
    let store = FilesystemBackend::new(repo)
        .await
        .with_context(|| format!("failed to open repo {}", repo.display()))?;

    let options = IngestOptions {
        release_dir: args.release,
        notes: args.notes,
        draft: args.draft,
        prerelease: args.prerelease,
        include_binary: args.include_binary,
        force: args.force,
        published_at: args.published_at,
        published_at_now: args.published_at_now,
        now,
    };

    let report = depot_engine::add_release(&store, config, &options, &StdinConfirm)
        .await
        .context("failed to add release")?;

    println!(
        "Added release {} (id {}) with {} asset(s)",
        report.tag, report.release_id, report.assets
    );
    if !report.skipped.is_empty() {
        println!("Skipped: {}", report.skipped.join(", "));
    }
    Ok(())
}

async fn handle_prune(
    repo: &Path,
    config: &RepoConfig,
    args: PruneArgs,
    now: OffsetDateTime,
) -> Result<()> {
    let policy = RetentionPolicy::from_limits(args.max_age, args.max_releases)?;
    let store = FilesystemBackend::new(repo)
        .await
        .with_context(|| format!("failed to open repo {}", repo.display()))?;

    let options = PruneOptions {
        policy,
        dry_run: args.dry_run,
        now,
    };
    let report = depot_engine::prune(&store, config, &options)
        .await
        .context("failed to prune repo")?;

    if report.dry_run {
        println!("Would prune {} release(s)", report.pruned.len());
    } else {
        println!("Pruned {} release(s)", report.pruned.len());
    }
    Ok(())
}

/// Load repo layout settings from an optional TOML file and `DEPOT_` env vars.
/// A config path that does not exist yields the defaults.
fn load_repo_config(path: Option<&Path>) -> Result<RepoConfig> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("DEPOT_").ignore(&["repo", "config"]));

    let config: RepoConfig = figment
        .extract()
        .map_err(|err| anyhow::anyhow!(err).context("failed to load configuration"))?;
    config.validate()?;
    Ok(config)
}

/// Reads y/n answers from stdin, asking again on anything else.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let stdin = std::io::stdin();
        ask(prompt, &mut stdin.lock(), &mut std::io::stdout())
    }
}

fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    loop {
        let _ = write!(output, "{prompt} [y/n]: ");
        let _ = output.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => {
                let _ = writeln!(output, "Invalid answer.");
            }
        }
    }
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("directory does not exist: {value}"))
    }
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("expected RFC 3339 time: {e}"))
}

fn parse_duration(value: &str) -> Result<time::Duration, String> {
    let duration = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    time::Duration::try_from(duration).map_err(|e| e.to_string())
}
