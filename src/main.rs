use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use web_deployer::fs::DiskFs;
use web_deployer::{BuildConfig, BuildPipeline, DeployError, OverwritePolicy};

#[derive(Parser, Debug)]
#[command(name = "web-deployer")]
#[command(about = "Copy a static site into its deploy directory", long_about = None)]
struct Args {
    /// JSON config file (defaults apply to any missing field)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Source tree root (default: web/dev)
    #[arg(short = 'i', long)]
    input: Option<String>,

    /// Deploy tree root (default: web/deploy)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Path to exclude, relative to the input root (can be specified multiple times,
    /// replaces the configured list)
    #[arg(short = 'x', long = "exclude")]
    excludes: Vec<String>,

    /// Keep files that already exist in the deploy tree
    #[arg(long)]
    skip_existing: bool,

    /// Only log what would be copied
    #[arg(long)]
    dry_run: bool,

    /// Skip the post-copy verification
    #[arg(long)]
    no_verify: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Deploy failed: {:#}", e);
            let code = e
                .downcast_ref::<DeployError>()
                .map(DeployError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let path = shellexpand::tilde(path);
            log::info!("Loading config from {}", path);
            BuildConfig::load(PathBuf::from(path.as_ref()).as_path())?
        }
        None => BuildConfig::default(),
    };

    // Expand ~ in paths
    if let Some(input) = &args.input {
        config.input_path = PathBuf::from(shellexpand::tilde(input).as_ref());
    }
    if let Some(output) = &args.output {
        config.output_path = PathBuf::from(shellexpand::tilde(output).as_ref());
    }

    if !args.excludes.is_empty() {
        config = config.with_excludes(args.excludes);
    }
    if args.skip_existing {
        config = config.with_overwrite(OverwritePolicy::Skip);
    }
    if args.dry_run {
        config = config.with_dry_run(true);
    }
    if args.no_verify {
        config = config.with_verify(false);
    }

    let pipeline = BuildPipeline::new(config, DiskFs::new());
    let report = pipeline.run()?;

    log::info!("{}", report.copy.format("[DEPLOY]"));
    if let Some(verified) = report.verified {
        log::info!("✅ Verified {} file(s) in {:?}", verified, pipeline.config().output_path);
    }

    Ok(())
}
