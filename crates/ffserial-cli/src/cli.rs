use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use ffserial::forces::torch::GlobalParameter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The ffserial Developers",
    version,
    about = "ffserial CLI - create, inspect and validate serialized force-field plugin documents.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a TorchForce from arguments and configuration, and write its document.
    Create(CreateArgs),
    /// Load a document and print the force it describes.
    Inspect(InspectArgs),
    /// Verify that a document survives a load/save cycle unchanged.
    Check(CheckArgs),
}

/// Arguments for the `create` subcommand.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to the serialized model file referenced by the force.
    #[arg(short, long, required = true, value_name = "FILE")]
    pub model: String,

    /// Path for the output document.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Force group the force is assigned to (0-31).
    #[arg(short = 'g', long, value_name = "INT")]
    pub force_group: Option<i64>,

    /// Mark the model as using periodic boundary conditions.
    #[arg(long)]
    pub uses_periodic: bool,

    /// Mark the model as returning forces in addition to the energy.
    #[arg(long)]
    pub outputs_forces: bool,

    /// Add a global parameter. Can be used multiple times. Example: -P k=1.5
    #[arg(short = 'P', long = "param", value_name = "NAME=DEFAULT", value_parser = parser::parse_global_parameter)]
    pub params: Vec<GlobalParameter>,

    /// Read additional global parameters from a CSV file with a `name,default` header.
    #[arg(long, value_name = "PATH")]
    pub params_csv: Option<PathBuf>,

    /// Name of the document's root element.
    #[arg(long, value_name = "NAME")]
    pub root_name: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S force.force-group=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the document to read.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the document to verify.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,
}
