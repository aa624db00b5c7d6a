use crate::domain::ports::DiagramSink;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File system diagram sink: writes `<output>/<name>.dot`, creating directories as needed.
pub struct FsDiagramSink {
    pub output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FsDiagramSink {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        let file = format!("{}.dot", name);
        let mut path = self.output_dir.clone();
        path.extend(file.split('/'));
        path
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DiagramSink for FsDiagramSink {
    fn write(&mut self, name: &str, dot: &str) -> Result<()> {
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&path, dot)
            .with_context(|| format!("Failed to write diagram: {}", path.display()))?;
        debug!(path = %path.display(), "Wrote diagram");
        self.written.push(path);
        Ok(())
    }
}
