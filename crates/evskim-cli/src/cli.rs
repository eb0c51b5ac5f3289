use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "evskim developers",
    version,
    about = "evskim - skim collider event files down to events with a low-mass dimuon pair, keeping a summary of generator weight signs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Skim every input directory into its own numbered output container.
    Skim(SkimArgs),
    /// Print the header, size and weight summary of an event container.
    Inspect(InspectArgs),
}

/// Arguments for the `skim` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SkimArgs {
    // --- Inputs and outputs ---
    /// Input directories. Each directory is one group and yields one output file.
    #[arg(short, long = "input-dirs", required = true, num_args(1..), value_name = "DIR")]
    pub input_dirs: Vec<PathBuf>,

    /// Output directory; containers are written as <DIR>/skimFile<N>.evs.
    #[arg(short, long = "output-name", required = true, value_name = "DIR")]
    pub output_name: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a per-group CSV report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    // --- Run flags ---
    /// Inputs are simulated samples carrying generator weights.
    #[arg(long)]
    pub mc: bool,

    /// Simulated inputs carry the six scale-variation weights.
    #[arg(long)]
    pub lhe: bool,

    /// Forward every event without applying the dimuon selection.
    #[arg(short = 'd', long = "disable-cuts")]
    pub disable_cuts: bool,

    /// Data-taking era of the inputs (2016, 2017 or 2018).
    #[arg(long, value_name = "ERA")]
    pub era: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S selection.mass-max=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// The container to inspect.
    #[arg(required = true, value_name = "PATH")]
    pub file: PathBuf,

    /// Also print the first N records.
    #[arg(short = 'n', long, value_name = "N", default_value_t = 0)]
    pub head: u64,
}
