use crate::adapters::fs::reader::read_json;
use crate::domain::ports::CouplingAnalyzer;
use anyhow::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Coupling data of one package as produced by an external analysis tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageCouplings {
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub efferents: BTreeSet<String>,
}

/// JSON coupling analyzer adapter
///
/// Format: `{"packages": {"a.b": {"classes": ["a.b.Foo"], "efferents": ["a.c"]}}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonCouplingAnalyzer {
    #[serde(default)]
    pub packages: BTreeMap<String, PackageCouplings>,
}

impl JsonCouplingAnalyzer {
    pub fn load(path: &Path) -> Result<Self> {
        let analyzer: Self = read_json(path)?;
        info!(
            path = %path.display(),
            packages = analyzer.packages.len(),
            classes = analyzer.class_count(),
            "Loaded package couplings"
        );
        Ok(analyzer)
    }
}

impl CouplingAnalyzer for JsonCouplingAnalyzer {
    fn class_count(&self) -> usize {
        self.packages.values().map(|p| p.classes.len()).sum()
    }

    fn classes(&self, package: &str) -> Option<BTreeSet<String>> {
        self.packages.get(package).map(|p| p.classes.clone())
    }

    fn efferents(&self, package: &str) -> Option<BTreeSet<String>> {
        self.packages.get(package).map(|p| p.efferents.clone())
    }
}
