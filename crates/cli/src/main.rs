mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vore_lib::dist::Platform;

use cmd::RunOptions;

/// vore - build, package and ship LÖVE games
#[derive(Parser)]
#[command(name = "vore")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project directory (defaults to the current directory)
  #[arg(short = 'C', long, global = true, default_value = ".")]
  project_dir: PathBuf,

  /// Maximum number of tasks running at once
  #[arg(short, long, global = true)]
  jobs: Option<usize>,

  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write a default config.json listing every external tool
  Init {
    /// Overwrite an existing config.json
    #[arg(short, long)]
    force: bool,
  },

  /// Transpile source assets into build/
  Build,

  /// Remove build/, packaged archives and platform staging directories
  Clean,

  /// Build, then launch the game
  Run,

  /// Build, then rebuild whenever a source file changes
  Watch,

  /// Build and package the game archive
  Pack,

  /// Produce distributables (win, mac, linux; all when omitted)
  Dist { platform: Option<Platform> },

  /// Push distributables to itch.io (win, mac, linux; all when omitted)
  Publish { platform: Option<Platform> },

  /// Show the execution waves of a target without running it
  Plan {
    #[arg(default_value = "build")]
    target: String,
  },
}

fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn default_jobs() -> usize {
  std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let options = RunOptions {
    project_dir: cli.project_dir,
    jobs: cli.jobs.unwrap_or_else(default_jobs).max(1),
  };

  match cli.command {
    Commands::Init { force } => cmd::cmd_init(&options.project_dir, force),
    Commands::Build => cmd::cmd_build(&options),
    Commands::Clean => cmd::cmd_clean(&options.project_dir),
    Commands::Run => cmd::cmd_run(&options),
    Commands::Watch => cmd::cmd_watch(&options),
    Commands::Pack => cmd::cmd_pack(&options),
    Commands::Dist { platform } => cmd::cmd_dist(&options, platform),
    Commands::Publish { platform } => cmd::cmd_publish(&options, platform),
    Commands::Plan { target } => cmd::cmd_plan(&options.project_dir, &target),
  }
}
