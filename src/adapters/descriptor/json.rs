use crate::adapters::fs::reader::read_json;
use crate::domain::descriptor::DescriptorSet;
use crate::domain::ports::DescriptorSource;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// JSON descriptor source adapter
///
/// Reads a serialized [`DescriptorSet`]: `{"types": [...], "packages": [...]}`.
pub struct JsonDescriptorSource {
    pub path: PathBuf,
}

impl JsonDescriptorSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DescriptorSource for JsonDescriptorSource {
    fn load(&self) -> Result<DescriptorSet> {
        let set: DescriptorSet = read_json(&self.path)?;
        info!(
            path = %self.path.display(),
            types = set.types.len(),
            packages = set.packages.len(),
            "Loaded descriptors"
        );
        Ok(set)
    }
}
