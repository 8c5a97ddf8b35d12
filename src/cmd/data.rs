//! Data command CLI handler.

use crate::dataset::{self, DatasetConfig, DatasetStats};
use crate::writer::ArtifactWriter;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the data command
#[derive(Serialize, JsonSchema)]
pub struct DataJsonOutput {
    pub schema_file: String,
    pub output_file: String,
    pub seed: u64,
    pub unsigned_domain: String,
    pub statistics: DatasetStats,
    pub elapsed_secs: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    schema: PathBuf,
    rows: usize,
    output: Option<PathBuf>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    full_unsigned: bool,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    if json && output.is_none() {
        anyhow::bail!("--json requires --output (stdout carries the generated rows)");
    }

    let loaded = dataset::load_schema(&schema)?;
    let generator = super::generator_config(config.as_deref(), full_unsigned)?;
    let seed = super::resolve_seed(seed);

    if !json {
        eprintln!(
            "Generating {} rows for {} columns from {}",
            rows,
            loaded.len(),
            schema.display()
        );
    }

    let dataset_config = DatasetConfig {
        rows,
        seed,
        generator,
        progress: progress && !json,
    };

    let start = Instant::now();
    let mut sink = ArtifactWriter::create_or_stdout(output.as_deref())?;
    let stats = dataset::write_rows(&loaded, &dataset_config, &mut sink)?;
    let destination = sink.destination().to_string();
    sink.finish()?;
    let elapsed = start.elapsed();

    if json {
        let output_json = DataJsonOutput {
            schema_file: schema.display().to_string(),
            output_file: destination,
            seed,
            unsigned_domain: dataset_config.generator.unsigned_domain.to_string(),
            statistics: stats,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        eprintln!(
            "✓ Wrote {} rows ({} null cells, {} bytes) to {} in {:.3?}",
            stats.rows_written, stats.null_cells, stats.bytes_written, destination, elapsed
        );
    }

    Ok(())
}
