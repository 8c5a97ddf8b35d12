//! JSON Schema command CLI handler.

use crate::json_schema;
use crate::writer::ArtifactWriter;
use std::path::PathBuf;

pub fn run(name: Option<String>, output: Option<PathBuf>, list: bool) -> anyhow::Result<()> {
    if list {
        for n in json_schema::schema_names() {
            println!("{}", n);
        }
        return Ok(());
    }

    let selected = match name {
        Some(n) => {
            let schema = json_schema::get_schema(&n).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown schema: {}. Available: {}",
                    n,
                    json_schema::schema_names().join(", ")
                )
            })?;
            vec![(n, schema)]
        }
        None => json_schema::all_schemas()
            .into_iter()
            .map(|(n, schema)| (n.to_string(), schema))
            .collect(),
    };

    match output {
        Some(dir) => {
            for (n, schema) in &selected {
                let path = dir.join(format!("{}.schema.json", n));
                let mut sink = ArtifactWriter::create(&path)?;
                sink.write_str(&serde_json::to_string_pretty(schema)?)?;
                sink.write_str("\n")?;
                sink.finish()?;
                eprintln!("✓ Wrote {}", path.display());
            }
        }
        None if selected.len() == 1 => {
            println!("{}", serde_json::to_string_pretty(&selected[0].1)?);
        }
        None => {
            let combined: serde_json::Map<String, serde_json::Value> = selected
                .into_iter()
                .map(|(n, schema)| (n, schema.to_value()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
    }

    Ok(())
}
