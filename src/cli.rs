//! Command-line interface
//!
//! [`execute`] parses an argument list, runs the requested check and
//! renders the outcome to the given writers. It returns the process exit
//! code instead of exiting, so the whole command surface can be driven
//! in-process.
//!
//! Exit codes: `0` pass, `1` fail, `2` usage or environment error.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::check::SchemaChecker;
use crate::config::CurioConfig;
use crate::error::{CheckError, Result};
use crate::level::{CompatibilityLevel, ValidityLevel};
use crate::output;
use crate::registry::SchemaTypeRegistry;

/// Exit code for usage and environment errors
pub const EXIT_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "lil-curio")]
#[command(
    version,
    about = "Schema validation and compatibility checks",
    propagate_version = true
)]
pub struct Cli {
    /// Additional configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a schema file
    Validate {
        file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Validity level: none, syntax_only, full
        #[arg(short, long)]
        level: Option<ValidityLevel>,
    },

    /// Check a proposed schema against existing versions (last file is the proposed one)
    Compatibility {
        /// Existing versions, oldest first, then the proposed version
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,

        /// Compatibility level, e.g. backward or full-transitive
        #[arg(short, long)]
        level: Option<CompatibilityLevel>,
    },

    /// Check a working-tree schema against its version in git
    Diff {
        file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Compatibility level, e.g. backward or full-transitive
        #[arg(short, long)]
        level: Option<CompatibilityLevel>,

        /// Revision to compare against (default HEAD)
        #[arg(long = "ref", value_name = "REV")]
        revision: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Schema type: json, avro, protobuf
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    schema_type: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Parse `args` (including the program name) and run the command.
pub fn execute<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    let Some(command) = cli.command else {
        let usage = Cli::command().render_help().to_string();
        return match out.write_all(usage.as_bytes()) {
            Ok(()) => 0,
            Err(_) => EXIT_ERROR,
        };
    };

    match run(command, cli.config.as_deref(), out, err) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            let message = match &e {
                CheckError::RevisionContentUnavailable { .. } => {
                    format!("Error: {}\nIs this file tracked by git?\n", e)
                }
                _ => format!("Error: {}\n", e),
            };
            let _ = err.write_all(message.as_bytes());
            EXIT_ERROR
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    let rendered = e.render().to_string();
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = out.write_all(rendered.as_bytes());
            0
        }
        _ => {
            let _ = err.write_all(rendered.as_bytes());
            EXIT_ERROR
        }
    }
}

fn run(
    command: Commands,
    config_path: Option<&Path>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    let config = CurioConfig::load_from(config_path)?;
    let checker =
        SchemaChecker::new(SchemaTypeRegistry::global()).with_rules(config.rules.clone());

    let (outcome, json) = match command {
        Commands::Validate { file, common, level } => {
            let schema_type = schema_type(&common, &config)?;
            let level = level.unwrap_or(config.defaults.validity_level);
            let outcome = checker.validate(&file, &schema_type, level)?;
            (outcome, common.json)
        }
        Commands::Compatibility { mut files, common, level } => {
            let schema_type = schema_type(&common, &config)?;
            let level = level.unwrap_or(config.defaults.compatibility_level);
            let proposed = files.pop().unwrap_or_default();
            let outcome = checker.check_compatibility(&files, &proposed, &schema_type, level)?;
            (outcome, common.json)
        }
        Commands::Diff {
            file,
            common,
            level,
            revision,
        } => {
            let schema_type = schema_type(&common, &config)?;
            let level = level.unwrap_or(config.defaults.compatibility_level);
            let revision = revision.unwrap_or_else(|| config.defaults.git_ref.clone());
            let resolver = config.git.resolver();
            let outcome = checker.diff(&file, Some(&revision), &schema_type, level, &resolver)?;
            (outcome, common.json)
        }
    };

    output::create(json || config.defaults.json).print(&outcome, out, err)?;
    Ok(outcome.exit_code())
}

fn schema_type(common: &CommonArgs, config: &CurioConfig) -> Result<String> {
    common
        .schema_type
        .clone()
        .or_else(|| config.defaults.schema_type.clone())
        .ok_or(CheckError::MissingSchemaType)
}
