//! Dataset pipeline: load a schema, generate rows and stream the encoded
//! artifacts into a sink.
//!
//! Generation and encoding stay pure (see the `yson_gen` crate); this module
//! owns the seeded rng, the progress bar and the output handles.

use crate::progress::row_progress;
use crate::writer::{ArtifactWriter, SinkError};
use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::Serialize;
use std::fs;
use std::path::Path;
use yson_gen::yson::{self, YsonWriter, ITEM_SEPARATOR};
use yson_gen::{GeneratorConfig, RecordGenerator, Schema};

/// Settings for one row-data artifact
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub rows: usize,
    pub seed: u64,
    pub generator: GeneratorConfig,
    pub progress: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            rows: 1000,
            seed: 0,
            generator: GeneratorConfig::default(),
            progress: false,
        }
    }
}

/// Statistics from writing one row-data artifact
#[derive(Debug, Default, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DatasetStats {
    pub rows_written: u64,
    pub columns: usize,
    /// Top-level cells that came out null
    pub null_cells: u64,
    pub bytes_written: u64,
}

/// Generate `config.rows` rows from a fresh rng seeded with `config.seed`.
///
/// Fails before anything is written when the schema or generator settings
/// cannot be drawn from.
pub fn write_rows(
    schema: &Schema,
    config: &DatasetConfig,
    sink: &mut ArtifactWriter,
) -> anyhow::Result<DatasetStats> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    write_rows_with_rng(schema, config, &mut rng, sink)
}

/// Stream rows as a bare top-level list fragment (`{...}; {...}`).
///
/// Rows are generated and encoded one at a time, so memory use does not grow
/// with the row count.
pub fn write_rows_with_rng<R: Rng + ?Sized>(
    schema: &Schema,
    config: &DatasetConfig,
    rng: &mut R,
    sink: &mut ArtifactWriter,
) -> anyhow::Result<DatasetStats> {
    tracing::debug!(
        rows = config.rows,
        columns = schema.len(),
        destination = sink.destination(),
        "writing rows"
    );

    let start_bytes = sink.bytes_written();
    let progress_bar = row_progress(config.progress, config.rows as u64, "Generating rows...");
    let generator = RecordGenerator::new(schema, &config.generator)?;

    let mut stats = DatasetStats {
        columns: schema.len(),
        ..Default::default()
    };
    let mut buf = String::new();

    for (i, row) in generator.rows(rng, config.rows).enumerate() {
        buf.clear();
        if i > 0 {
            buf.push_str(ITEM_SEPARATOR);
        }
        // Writing into a String cannot fail
        let _ = YsonWriter::new(&mut buf).write_row(&row);
        sink.write_str(&buf)?;

        stats.rows_written += 1;
        stats.null_cells += row.cells.iter().filter(|(_, v)| v.is_null()).count() as u64;
        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    stats.bytes_written = sink.bytes_written() - start_bytes;
    Ok(stats)
}

/// Write the `<schema = [...]>` attribute header.
pub fn write_schema_attribute(schema: &Schema, sink: &mut ArtifactWriter) -> Result<(), SinkError> {
    sink.write_str(&yson::encode_schema(schema))
}

/// Load a schema description; `.yaml`/`.yml` files are read as YAML,
/// anything else as JSON.
pub fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;

    let schema = if is_yaml(path) {
        Schema::from_yaml_str(&content)
    } else {
        Schema::from_json_str(&content)
    }
    .with_context(|| format!("failed to load schema from {}", path.display()))?;

    if schema.is_empty() {
        anyhow::bail!("schema {} has no columns", path.display());
    }
    Ok(schema)
}

/// Load generator settings from a YAML file, or defaults when no file is given.
pub fn load_generator_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    GeneratorConfig::from_yaml_str(&content)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
