//! `configforge` CLI: validate, convert and merge configuration files.
//!
//! ## Usage
//!
//! ```sh
//! # Check syntax, or validate against a schema (any supported format)
//! configforge validate app.yaml
//! configforge validate app.yaml --schema app.schema.json --strict
//!
//! # Convert between formats (target inferred from the output extension)
//! configforge convert app.toml -o app.json
//! configforge convert app.ini --format yaml --typed-ini
//!
//! # Merge left to right; later files win
//! configforge merge base.yaml prod.toml -o app.json --strategy deep
//! ```
//!
//! Exit codes: 0 success, 2 usage, 3 input missing or unreadable, 4 parse
//! failure, 5 validation failure, 6 serialize failure, 7 merge failure,
//! 8 invalid schema, 9 write failure, 10 unknown format.

mod failure;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configforge_core::format::ini;
use configforge_core::{
    merge_documents, validate, Document, Format, FormatAdapter, MergeOptions, MergeStrategy,
    Schema, SerializeOptions, UnknownFormat, UnknownStrategy,
};
use failure::Failure;
use rayon::prelude::*;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "configforge",
    version,
    about = "Validate, convert and merge JSON/YAML/TOML/INI configuration files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level; overrides the CONFIGFORGE_LOG environment variable
    #[arg(long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file, optionally against a schema
    Validate {
        /// Configuration file to validate
        config: PathBuf,
        /// Schema file (any supported format)
        #[arg(short, long)]
        schema: Option<PathBuf>,
        /// Reject keys the schema does not declare when it sets additionalProperties: false
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Convert a configuration file to another format
    Convert {
        /// Input file
        input_file: PathBuf,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Merge configuration files left to right; later files take precedence
    Merge {
        /// Input files, lowest precedence first
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Merge strategy (deep, shallow, override)
        #[arg(long, default_value = "deep", value_parser = parse_strategy)]
        strategy: MergeStrategy,
        /// Fail when a value would be replaced by one of a different type
        #[arg(long)]
        strict_types: bool,
        /// Skip inputs that cannot be read or parsed instead of aborting
        #[arg(long)]
        keep_going: bool,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input format (json, yaml, toml, ini); inferred from the extension if omitted
    #[arg(long, value_parser = parse_format)]
    from: Option<Format>,
    /// Infer bools and numbers from INI values instead of reading strings
    #[arg(long)]
    typed_ini: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (json, yaml, toml, ini); inferred from the output extension if omitted
    #[arg(short, long, value_parser = parse_format)]
    format: Option<Format>,
    /// Pretty-print the output (default)
    #[arg(long, overrides_with = "no_pretty")]
    pretty: bool,
    /// Write the most compact layout the format allows
    #[arg(long, overrides_with = "pretty")]
    no_pretty: bool,
    /// Spaces per indentation level, where the format allows it
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

impl OutputArgs {
    fn options(&self) -> SerializeOptions {
        SerializeOptions {
            // --pretty and --no-pretty override each other; the last one given wins.
            pretty: self.pretty || !self.no_pretty,
            indent: self.indent,
        }
    }

    /// `--format`, else the output extension, else `fallback`.
    fn target(&self, output: Option<&Path>, fallback: Option<Format>) -> Option<Format> {
        self.format
            .or_else(|| output.and_then(Format::from_path))
            .or(fallback)
    }
}

fn parse_format(s: &str) -> std::result::Result<Format, UnknownFormat> {
    s.parse()
}

fn parse_strategy(s: &str) -> std::result::Result<MergeStrategy, UnknownStrategy> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_level.as_deref());

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            let code = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<Failure>())
                .map_or(1, Failure::exit_code);
            ExitCode::from(code)
        }
    }
}

/// `--verbose` beats `--log-level`, which beats `CONFIGFORGE_LOG`; default `info`.
fn init_logging(verbose: bool, level: Option<&str>) {
    let filter = match (verbose, level) {
        (true, _) => EnvFilter::new("debug"),
        (false, Some(level)) => EnvFilter::new(level),
        (false, None) => {
            EnvFilter::try_from_env("CONFIGFORGE_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate {
            config,
            schema,
            strict,
            input,
        } => {
            let doc = load_document(&config, &input)?;
            let Some(schema_path) = schema else {
                tracing::info!("{} is well-formed {}", config.display(), doc.format());
                return Ok(());
            };
            let schema = load_schema(&schema_path)?;
            if strict {
                tracing::info!("using strict validation");
            }
            let errors = validate(doc.value(), &schema, strict);
            if !errors.is_empty() {
                for error in &errors {
                    println!("{error}");
                }
                return Err(Failure::Invalid {
                    path: config,
                    count: errors.len(),
                }
                .into());
            }
            tracing::info!("{} is valid", config.display());
        }
        Commands::Convert {
            input_file,
            output,
            input,
            out,
        } => {
            let doc = load_document(&input_file, &input)?;
            let target = out
                .target(output.as_deref(), None)
                .ok_or_else(|| Failure::UnknownFormat {
                    path: output.clone().unwrap_or_else(|| PathBuf::from("-")),
                })?;
            tracing::debug!(from = %doc.format(), to = %target, pretty = !out.no_pretty, "converting");
            let text = doc
                .serialize(target, &out.options())
                .map_err(Failure::from)
                .with_context(|| format!("converting {} to {target}", input_file.display()))?;
            write_output(output.as_deref(), &text)?;
            tracing::info!("converted {} to {target}", input_file.display());
        }
        Commands::Merge {
            inputs,
            output,
            strategy,
            strict_types,
            keep_going,
            input,
            out,
        } => {
            tracing::info!("merging {} files using {strategy} strategy", inputs.len());
            let docs = load_all(&inputs, &input, keep_going)?;
            let options = MergeOptions::new(strategy).strict_types(strict_types);
            let merged = merge_documents(docs, options).map_err(Failure::from)?;
            // Without an explicit target, write the format of the last input.
            let target = out
                .target(output.as_deref(), Some(merged.format()))
                .unwrap_or(merged.format());
            let text = merged.serialize(target, &out.options()).map_err(Failure::from)?;
            write_output(output.as_deref(), &text)?;
            match &output {
                Some(path) => tracing::info!("merge complete, output written to {}", path.display()),
                None => tracing::info!("merge complete"),
            }
        }
    }
    Ok(())
}

/// Parse every input in parallel, keeping the caller's order.
///
/// Policy: the first input that cannot be read or parsed aborts the merge,
/// unless `keep_going` is set, in which case it is skipped with a warning.
fn load_all(paths: &[PathBuf], input: &InputArgs, keep_going: bool) -> Result<Vec<Document>> {
    let loaded: Vec<_> = paths
        .par_iter()
        .map(|path| load_document(path, input))
        .collect();

    let mut docs = Vec::with_capacity(loaded.len());
    for (path, result) in paths.iter().zip(loaded) {
        match result {
            Ok(doc) => {
                tracing::debug!("input file: {} ({})", path.display(), doc.format());
                docs.push(doc);
            }
            Err(err) if keep_going => tracing::warn!("skipping {}: {err}", path.display()),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(docs)
}

fn load_document(path: &Path, input: &InputArgs) -> std::result::Result<Document, Failure> {
    let text = read_file(path)?;
    let format = input
        .from
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| Failure::UnknownFormat {
            path: path.to_path_buf(),
        })?;
    let adapter: &dyn FormatAdapter = if input.typed_ini && format == Format::Ini {
        &ini::TYPED
    } else {
        format.adapter()
    };
    let doc = Document::parse_with(&text, adapter).map_err(|error| Failure::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(doc.with_origin(path))
}

fn load_schema(path: &Path) -> std::result::Result<Schema, Failure> {
    let doc = load_document(
        path,
        &InputArgs {
            from: None,
            typed_ini: true,
        },
    )?;
    Schema::from_value(doc.value()).map_err(|error| Failure::Schema {
        path: path.to_path_buf(),
        error,
    })
}

fn read_file(path: &Path) -> std::result::Result<String, Failure> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Failure::NotFound(path.to_path_buf()),
        _ => Failure::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn write_output(path: Option<&Path>, content: &str) -> std::result::Result<(), Failure> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|source| Failure::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
