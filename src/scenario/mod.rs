//! Built-in benchmark scenarios.
//!
//! Each scenario owns a schema (fixed, or drawn from the seeded rng) and
//! writes four artifacts into the output directory: the schema description
//! (`<stem>_schema.json`), the attribute header (`<stem>_schema.txt`), the
//! rows (`<stem>_data.txt`) and its message in the shared `bench.proto`.

use crate::dataset::{self, DatasetConfig};
use crate::proto;
use crate::writer::{self, ArtifactWriter, ScenarioPaths, StagedArtifact};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use yson_gen::{Column, GeneratorConfig, ScalarType, Schema, StructMember, TypeDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// 1000 random numeric columns
    ThousandNumeric,
    /// 10 random columns over every scalar type
    SimpleTen,
    /// `id: uint32`, `data: string`
    SimpleTwo,
    /// One column per composite kind
    ComplexTypes,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::ThousandNumeric,
        Scenario::SimpleTen,
        Scenario::SimpleTwo,
        Scenario::ComplexTypes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ThousandNumeric => "ThousandNumeric",
            Scenario::SimpleTen => "SimpleTen",
            Scenario::SimpleTwo => "SimpleTwo",
            Scenario::ComplexTypes => "ComplexTypes",
        }
    }

    /// File name prefix for the scenario's artifacts
    pub fn stem(&self) -> &'static str {
        match self {
            Scenario::ThousandNumeric => "thousand_numeric",
            Scenario::SimpleTen => "simple_ten",
            Scenario::SimpleTwo => "simple_two",
            Scenario::ComplexTypes => "complex_types",
        }
    }

    pub fn message_name(&self) -> String {
        format!("T{}Message", self.name())
    }

    /// Position in [`Scenario::ALL`], used as the rng stream id.
    fn stream(&self) -> u64 {
        match self {
            Scenario::ThousandNumeric => 0,
            Scenario::SimpleTen => 1,
            Scenario::SimpleTwo => 2,
            Scenario::ComplexTypes => 3,
        }
    }

    /// Build the scenario schema. Random schemas consume draws from `rng`.
    pub fn build_schema<R: Rng + ?Sized>(&self, rng: &mut R) -> yson_gen::Result<Schema> {
        match self {
            Scenario::ThousandNumeric => generate_schema(rng, 1000, &ScalarType::NUMERIC, false),
            Scenario::SimpleTen => generate_schema(rng, 10, &ScalarType::ALL, false),
            Scenario::SimpleTwo => Ok(simple_two_schema()),
            Scenario::ComplexTypes => Ok(complex_types_schema()),
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    /// Accepts the CamelCase name or the file stem, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s) || sc.stem().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown scenario: {}. Valid options: ThousandNumeric, SimpleTen, SimpleTwo, ComplexTypes",
                    s
                )
            })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Random scalar schema with columns `column_1..=column_<count>`.
///
/// Each column type is drawn uniformly from `types`. Columns are required
/// unless `allow_optional`, in which case each is required with probability
/// 0.5.
pub fn generate_schema<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    types: &[ScalarType],
    allow_optional: bool,
) -> yson_gen::Result<Schema> {
    if types.is_empty() && count > 0 {
        return Err(yson_gen::Error::InvalidConfig(
            "cannot draw column types from an empty type list".to_string(),
        ));
    }

    let mut schema = Schema::new();
    for i in 0..count {
        let ty = types[rng.random_range(0..types.len())];
        let required = !allow_optional || rng.random_bool(0.5);
        schema = schema.column(Column::new(format!("column_{}", i + 1), ty).with_required(required));
    }
    Ok(schema)
}

pub fn simple_two_schema() -> Schema {
    Schema::new()
        .column(Column::new("id", ScalarType::Uint32).required())
        .column(Column::new("data", ScalarType::String).required())
}

pub fn complex_types_schema() -> Schema {
    Schema::new()
        .column(Column::new(
            "optional",
            TypeDescriptor::Optional {
                item: ScalarType::String,
            },
        ))
        .column(
            Column::new(
                "list",
                TypeDescriptor::List {
                    item: ScalarType::Double,
                },
            )
            .required(),
        )
        .column(
            Column::new(
                "struct",
                TypeDescriptor::Struct {
                    members: vec![
                        StructMember::new("foo", ScalarType::Int32),
                        StructMember::new("bar", ScalarType::String),
                    ],
                },
            )
            .required(),
        )
        .column(
            Column::new(
                "tuple",
                TypeDescriptor::Tuple {
                    elements: vec![ScalarType::Double, ScalarType::Double],
                },
            )
            .required(),
        )
        .column(
            Column::new(
                "variant",
                TypeDescriptor::Variant {
                    elements: vec![ScalarType::Int32, ScalarType::String, ScalarType::Double],
                },
            )
            .required(),
        )
        .column(
            Column::new(
                "dict",
                TypeDescriptor::Dict {
                    key: ScalarType::Int64,
                    value: ScalarType::String,
                },
            )
            .required(),
        )
}

/// Configuration for a scenario run
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub output_dir: PathBuf,
    pub rows: usize,
    pub seed: u64,
    pub generator: GeneratorConfig,
    pub progress: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            rows: 1000,
            seed: 0,
            generator: GeneratorConfig::default(),
            progress: false,
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ScenarioStats {
    pub scenario: String,
    pub columns: usize,
    pub rows_written: u64,
    pub null_cells: u64,
    pub data_file: String,
    pub schema_file: String,
    pub description_file: String,
    /// Bytes across the three per-scenario files
    pub bytes_written: u64,
}

/// Run `scenarios` in order and (re)write `bench.proto` with their messages.
///
/// Each scenario draws from its own ChaCha stream of `config.seed`, so a
/// scenario produces the same artifacts whether it runs alone or with the
/// others. Artifacts are staged and only moved into place once every scenario
/// has been written; on error the output directory keeps its previous files.
pub fn run(scenarios: &[Scenario], config: &ScenarioConfig) -> anyhow::Result<Vec<ScenarioStats>> {
    let paths = ScenarioPaths::new(config.output_dir.clone());
    paths.ensure_output_dir()?;

    let mut messages = Vec::with_capacity(scenarios.len());
    let mut all_stats = Vec::with_capacity(scenarios.len());
    // Nothing in the output directory changes until every artifact is written
    let mut staged = Vec::with_capacity(scenarios.len() * 3 + 1);

    for &scenario in scenarios {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(scenario.stream());

        let schema = scenario.build_schema(&mut rng)?;
        tracing::info!(
            scenario = scenario.name(),
            columns = schema.len(),
            rows = config.rows,
            "running scenario"
        );

        let stats = write_scenario(scenario, &schema, &paths, config, &mut rng, &mut staged)?;
        all_stats.push(stats);
        messages.push((schema, scenario.message_name()));
    }

    let mut proto_sink = ArtifactWriter::create(&paths.proto())?;
    proto_sink.write_str(&proto::render_file(
        messages.iter().map(|(schema, name)| (schema, name.as_str())),
    ))?;
    staged.push(proto_sink.stage()?);

    writer::commit_all(staged)?;
    Ok(all_stats)
}

fn write_scenario(
    scenario: Scenario,
    schema: &Schema,
    paths: &ScenarioPaths,
    config: &ScenarioConfig,
    rng: &mut ChaCha8Rng,
    staged: &mut Vec<StagedArtifact>,
) -> anyhow::Result<ScenarioStats> {
    let stem = scenario.stem();

    let description_path = paths.schema_description(stem);
    let mut description = ArtifactWriter::create(&description_path)?;
    description.write_str(&schema.to_json_string())?;
    let mut bytes_written = description.bytes_written();
    staged.push(description.stage()?);

    let schema_path = paths.schema_attribute(stem);
    let mut attribute = ArtifactWriter::create(&schema_path)?;
    dataset::write_schema_attribute(schema, &mut attribute)?;
    bytes_written += attribute.bytes_written();
    staged.push(attribute.stage()?);

    let data_path = paths.data(stem);
    let mut data = ArtifactWriter::create(&data_path)?;
    let dataset_config = DatasetConfig {
        rows: config.rows,
        seed: config.seed,
        generator: config.generator.clone(),
        progress: config.progress,
    };
    let data_stats = dataset::write_rows_with_rng(schema, &dataset_config, rng, &mut data)?;
    bytes_written += data.bytes_written();
    staged.push(data.stage()?);

    Ok(ScenarioStats {
        scenario: scenario.name().to_string(),
        columns: schema.len(),
        rows_written: data_stats.rows_written,
        null_cells: data_stats.null_cells,
        data_file: data_path.display().to_string(),
        schema_file: schema_path.display().to_string(),
        description_file: description_path.display().to_string(),
        bytes_written,
    })
}
