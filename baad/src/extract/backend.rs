//! Decoder backend seam and the external-command adapter.
//!
//! Decoding itself lives in external tools. The crate only knows how to
//! invoke them and to normalize their exit status into its own errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// A completed extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Directory the decoder wrote into.
    pub out_dir: PathBuf,
}

/// A decoder invocation that did not produce output.
#[derive(Debug, thiserror::Error)]
#[error("decoder failed for {entry}: {message}")]
pub struct DecoderError {
    pub entry: String,
    pub message: String,
}

/// Decodes one downloaded file into a directory of extracted content.
pub trait DecoderBackend: Send + Sync {
    fn decode(&self, source: &Path, out_dir: &Path) -> Result<ExtractionOutcome, DecoderError>;
}

/// Backend that shells out to an external decoder executable.
///
/// Arguments may contain the placeholders `{source}` and `{out}`, which
/// are substituted with the file and output directory paths.
pub struct CommandDecoder {
    program: String,
    args: Vec<String>,
}

impl CommandDecoder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl DecoderBackend for CommandDecoder {
    fn decode(&self, source: &Path, out_dir: &Path) -> Result<ExtractionOutcome, DecoderError> {
        let entry = source.display().to_string();
        fs::create_dir_all(out_dir).map_err(|e| DecoderError {
            entry: entry.clone(),
            message: format!("cannot create {}: {e}", out_dir.display()),
        })?;

        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace("{source}", &entry)
                    .replace("{out}", &out_dir.display().to_string())
            })
            .collect();

        debug!(program = %self.program, ?args, "running decoder");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| DecoderError {
                entry: entry.clone(),
                message: format!("cannot launch {}: {e}", self.program),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                format!("{} exited with {}: {stderr}", self.program, output.status)
            };
            return Err(DecoderError { entry, message });
        }

        Ok(ExtractionOutcome {
            out_dir: out_dir.to_path_buf(),
        })
    }
}
