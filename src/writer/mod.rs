//! Output sinks for generated artifacts.
//!
//! Every artifact goes either to a file or to stdout through a large
//! `BufWriter`. File artifacts are written to a temporary file next to their
//! target and only renamed into place when committed, so a failed run never
//! leaves a half-written or mismatched artifact behind. I/O failures are
//! reported as [`SinkError::SinkFailure`] carrying the destination.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write {destination}")]
    SinkFailure {
        destination: String,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    fn at(destination: &str, source: io::Error) -> Self {
        SinkError::SinkFailure {
            destination: destination.to_string(),
            source,
        }
    }
}

/// Temporary file waiting to be renamed onto `target`
struct PendingFile {
    temp: NamedTempFile,
    target: PathBuf,
}

/// Buffered destination that counts bytes written.
pub struct ArtifactWriter {
    writer: BufWriter<Box<dyn Write>>,
    destination: String,
    bytes_written: u64,
    pending: Option<PendingFile>,
}

impl ArtifactWriter {
    /// Stage a new version of `path`, creating parent directories as needed.
    ///
    /// Nothing at `path` changes until the artifact is committed.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let destination = path.display().to_string();
        if path.is_dir() {
            return Err(SinkError::at(
                &destination,
                io::Error::new(io::ErrorKind::IsADirectory, "target is a directory"),
            ));
        }

        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| SinkError::at(&destination, e))?;
                parent
            }
            None => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".yson-bench-gen-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| SinkError::at(&destination, e))?;
        let file = temp.reopen().map_err(|e| SinkError::at(&destination, e))?;

        let mut writer = Self::from_writer(Box::new(file), destination);
        writer.pending = Some(PendingFile {
            temp,
            target: path.to_path_buf(),
        });
        Ok(writer)
    }

    pub fn stdout() -> Self {
        Self::from_writer(Box::new(io::stdout()), "stdout".to_string())
    }

    /// `path` if given, stdout otherwise
    pub fn create_or_stdout(path: Option<&Path>) -> Result<Self, SinkError> {
        match path {
            Some(path) => Self::create(path),
            None => Ok(Self::stdout()),
        }
    }

    pub fn from_writer(inner: Box<dyn Write>, destination: String) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, inner),
            destination,
            bytes_written: 0,
            pending: None,
        }
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), SinkError> {
        self.writer
            .write_all(s.as_bytes())
            .map_err(|e| SinkError::at(&self.destination, e))?;
        self.bytes_written += s.len() as u64;
        Ok(())
    }

    /// Flush and commit in one step. Returns the bytes written.
    pub fn finish(self) -> Result<u64, SinkError> {
        self.stage()?.commit()
    }

    /// Flush everything, but leave the target untouched until
    /// [`StagedArtifact::commit`] (or [`commit_all`]).
    pub fn stage(mut self) -> Result<StagedArtifact, SinkError> {
        self.writer
            .flush()
            .map_err(|e| SinkError::at(&self.destination, e))?;
        Ok(StagedArtifact {
            pending: self.pending,
            destination: self.destination,
            bytes_written: self.bytes_written,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// A fully written artifact that has not been moved into place yet.
/// Dropping it discards the temporary file.
pub struct StagedArtifact {
    pending: Option<PendingFile>,
    destination: String,
    bytes_written: u64,
}

impl StagedArtifact {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Rename the temporary file onto the target.
    pub fn commit(self) -> Result<u64, SinkError> {
        if let Some(pending) = self.pending {
            pending
                .temp
                .persist(&pending.target)
                .map_err(|e| SinkError::at(&self.destination, e.error))?;
        }
        tracing::info!(
            destination = %self.destination,
            bytes = self.bytes_written,
            "artifact written"
        );
        Ok(self.bytes_written)
    }
}

/// Commit a set of artifacts that only make sense together.
///
/// If any rename fails, the targets already committed by this call are
/// removed again, so the set is never left half old and half new.
pub fn commit_all(artifacts: Vec<StagedArtifact>) -> Result<u64, SinkError> {
    let mut committed: Vec<PathBuf> = Vec::with_capacity(artifacts.len());
    let mut total = 0;

    for artifact in artifacts {
        let target = artifact.pending.as_ref().map(|p| p.target.clone());
        match artifact.commit() {
            Ok(bytes) => {
                total += bytes;
                committed.extend(target);
            }
            Err(e) => {
                for path in &committed {
                    if let Err(remove_err) = fs::remove_file(path) {
                        tracing::warn!(
                            path = %path.display(),
                            error = %remove_err,
                            "failed to roll back artifact"
                        );
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(total)
}

/// Paths of the artifacts a scenario writes into its output directory.
pub struct ScenarioPaths {
    pub output_dir: PathBuf,
}

impl ScenarioPaths {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn ensure_output_dir(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| SinkError::at(&self.output_dir.display().to_string(), e))
    }

    pub fn proto(&self) -> PathBuf {
        self.output_dir.join("bench.proto")
    }

    pub fn data(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}_data.txt", stem))
    }

    pub fn schema_attribute(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}_schema.txt", stem))
    }

    pub fn schema_description(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}_schema.json", stem))
    }
}
