//! Scenario command CLI handler.

use crate::scenario::{self, Scenario, ScenarioConfig, ScenarioStats};
use crate::writer::ScenarioPaths;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the scenario command
#[derive(Serialize, JsonSchema)]
pub struct ScenarioJsonOutput {
    pub output_dir: String,
    pub proto_file: String,
    pub seed: u64,
    pub rows_per_scenario: usize,
    pub unsigned_domain: String,
    pub scenarios: Vec<ScenarioStats>,
    pub elapsed_secs: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    name: Option<String>,
    outdir: PathBuf,
    rows: usize,
    seed: Option<u64>,
    config: Option<PathBuf>,
    full_unsigned: bool,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let scenarios = match name {
        Some(n) => vec![n.parse::<Scenario>().map_err(|e| anyhow::anyhow!("{}", e))?],
        None => Scenario::ALL.to_vec(),
    };

    let generator = super::generator_config(config.as_deref(), full_unsigned)?;
    let seed = super::resolve_seed(seed);

    let scenario_config = ScenarioConfig {
        output_dir: outdir.clone(),
        rows,
        seed,
        generator,
        progress: progress && !json,
    };

    if !json {
        let names: Vec<_> = scenarios.iter().map(|s| s.name()).collect();
        eprintln!(
            "Generating {} ({} rows each) into {}",
            names.join(", "),
            rows,
            outdir.display()
        );
    }

    let start = Instant::now();
    let stats = scenario::run(&scenarios, &scenario_config)?;
    let elapsed = start.elapsed();
    let proto_file = ScenarioPaths::new(outdir.clone()).proto();

    if json {
        let output_json = ScenarioJsonOutput {
            output_dir: outdir.display().to_string(),
            proto_file: proto_file.display().to_string(),
            seed,
            rows_per_scenario: rows,
            unsigned_domain: scenario_config.generator.unsigned_domain.to_string(),
            scenarios: stats,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        for s in &stats {
            eprintln!(
                "  {}: {} columns, {} rows -> {}",
                s.scenario, s.columns, s.rows_written, s.data_file
            );
        }
        eprintln!(
            "✓ Generated {} scenario(s) and {} in {:.3?}",
            stats.len(),
            proto_file.display(),
            elapsed
        );
    }

    Ok(())
}
