use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Generator configuration, loaded from an optional TOML file and then overridden by
/// command line flags.
///
/// ```toml
/// categories = ["core:#FFD39B:#CD6600", "util"]
/// package_diagram = true
/// validate = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Category declarations, `name[:fill[:line]]`.
    pub categories: Vec<String>,
    /// Whether the package dependency overview is generated.
    pub package_diagram: bool,
    /// Whether each generated diagram is checked by the DOT validator.
    pub validate: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            package_diagram: true,
            validate: false,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Applies command line flags. Flags only ever add categories or switch features on
    /// or off; they never clear the file's categories.
    pub fn merge_flags(&mut self, categories: &[String], no_package_diagram: bool, validate: bool) {
        self.categories.extend(categories.iter().cloned());
        if no_package_diagram {
            self.package_diagram = false;
        }
        if validate {
            self.validate = true;
        }
    }
}
