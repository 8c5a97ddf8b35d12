//! Schema command CLI handler.

use crate::dataset;
use crate::writer::ArtifactWriter;
use std::path::PathBuf;

pub fn run(schema: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = dataset::load_schema(&schema)?;

    let mut sink = ArtifactWriter::create_or_stdout(output.as_deref())?;
    dataset::write_schema_attribute(&loaded, &mut sink)?;
    sink.finish()?;

    if let Some(path) = output {
        eprintln!(
            "✓ Wrote schema for {} columns to {}",
            loaded.len(),
            path.display()
        );
    }
    Ok(())
}
