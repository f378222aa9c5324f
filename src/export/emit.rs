//! Destinations for finished exports.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::ExportDocument;
use crate::error::Result;

/// Hands a finished document to its destination.
pub trait FileEmitter {
    fn emit(&self, doc: &ExportDocument) -> Result<()>;
}

/// Writes documents into a directory under their own filename.
///
/// The file is written to a temporary file beside the target and renamed
/// into place, so a failed write never leaves a partial document. An
/// existing file with the same name is replaced.
#[derive(Debug, Clone)]
pub struct DirEmitter {
    dir: PathBuf,
}

impl DirEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document will be written to.
    pub fn target(&self, doc: &ExportDocument) -> PathBuf {
        self.dir.join(doc.filename())
    }
}

impl FileEmitter for DirEmitter {
    fn emit(&self, doc: &ExportDocument) -> Result<()> {
        let target = self.target(doc);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(doc.markdown().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        tracing::debug!(path = %target.display(), bytes = doc.markdown().len(), "wrote export");
        Ok(())
    }
}

/// Writes the Markdown to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEmitter;

impl FileEmitter for StdoutEmitter {
    fn emit(&self, doc: &ExportDocument) -> Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(doc.markdown().as_bytes())?;
        if !doc.markdown().ends_with('\n') {
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}
