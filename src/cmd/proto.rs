//! Proto command CLI handler.

use crate::dataset;
use crate::proto;
use crate::writer::ArtifactWriter;
use std::path::PathBuf;

pub fn run(
    schema: PathBuf,
    message: String,
    output: Option<PathBuf>,
    no_header: bool,
) -> anyhow::Result<()> {
    let loaded = dataset::load_schema(&schema)?;

    let mut sink = ArtifactWriter::create_or_stdout(output.as_deref())?;
    if !no_header {
        sink.write_str(proto::PROTO_HEADER)?;
    }
    sink.write_str(&proto::render_message(&loaded, &message))?;
    sink.finish()?;

    if let Some(path) = output {
        eprintln!("✓ Wrote message {} to {}", message, path.display());
    }
    Ok(())
}
