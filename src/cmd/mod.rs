mod data;
mod json_schema;
mod proto;
mod scenario;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};
use yson_gen::{GeneratorConfig, UnsignedDomain};

pub use data::DataJsonOutput;
pub use scenario::ScenarioJsonOutput;

#[derive(Parser)]
#[command(name = "yson-bench-gen")]
#[command(version)]
#[command(
    about = "Generate synthetic YSON benchmark datasets for YT table formats",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the built-in benchmark scenarios (schemas, rows and bench.proto)
    Scenario {
        /// Scenario to run: ThousandNumeric, SimpleTen, SimpleTwo or ComplexTypes (all if not specified)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory for the generated artifacts
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,

        /// Rows per scenario
        #[arg(short, long, default_value = "1000")]
        rows: usize,

        /// Random seed (random if not specified; always reported on stderr)
        #[arg(long)]
        seed: Option<u64>,

        /// YAML generator config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Draw unsigned integers from their full range instead of [0, 2^(n-1))
        #[arg(long)]
        full_unsigned: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate YSON rows for a schema description file
    Data {
        /// Schema description file (JSON, or YAML with a .yaml/.yml extension)
        schema: PathBuf,

        /// Number of rows to generate
        #[arg(default_value = "1000")]
        rows: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Random seed (random if not specified; always reported on stderr)
        #[arg(long)]
        seed: Option<u64>,

        /// YAML generator config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Draw unsigned integers from their full range instead of [0, 2^(n-1))
        #[arg(long)]
        full_unsigned: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Output statistics as JSON (requires --output)
        #[arg(long)]
        json: bool,
    },

    /// Write the <schema = [...]> attribute header for a schema description file
    Schema {
        /// Schema description file (JSON, or YAML with a .yaml/.yml extension)
        schema: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a protobuf message definition for a schema description file
    Proto {
        /// Schema description file (JSON, or YAML with a .yaml/.yml extension)
        schema: PathBuf,

        /// Message name
        #[arg(short, long, default_value = "TBenchMessage")]
        message: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Omit the extension.proto import line
        #[arg(long)]
        no_header: bool,
    },

    /// Print JSON Schemas for schema description files and --json outputs
    #[command(name = "json-schema")]
    JsonSchema {
        /// Schema to print: schema-file, data or scenario (all if not specified)
        name: Option<String>,

        /// Write <name>.schema.json files into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// List available schema names
        #[arg(short, long)]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scenario {
            name,
            outdir,
            rows,
            seed,
            config,
            full_unsigned,
            progress,
            json,
        } => scenario::run(name, outdir, rows, seed, config, full_unsigned, progress, json),
        Commands::Data {
            schema,
            rows,
            output,
            seed,
            config,
            full_unsigned,
            progress,
            json,
        } => data::run(schema, rows, output, seed, config, full_unsigned, progress, json),
        Commands::Schema { schema, output } => schema::run(schema, output),
        Commands::Proto {
            schema,
            message,
            output,
            no_header,
        } => proto::run(schema, message, output, no_header),
        Commands::JsonSchema { name, output, list } => json_schema::run(name, output, list),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "yson-bench-gen",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Use the given seed or draw one; the seed is always reported so a run can
/// be reproduced.
fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(rand::random);
    eprintln!("Seed: {}", seed);
    seed
}

/// Generator settings from `--config`, with `--full-unsigned` applied on top.
fn generator_config(config: Option<&Path>, full_unsigned: bool) -> anyhow::Result<GeneratorConfig> {
    let generator = crate::dataset::load_generator_config(config)?;
    Ok(if full_unsigned {
        generator.with_unsigned_domain(UnsignedDomain::Full)
    } else {
        generator
    })
}
