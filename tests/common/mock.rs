//! Mock port implementations for integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, anyhow};
use apiviz::domain::descriptor::DescriptorSet;
use apiviz::domain::ports::{CouplingAnalyzer, DescriptorSource, DiagramSink};

/// Mock CouplingAnalyzer with hand-written package data.
#[derive(Default)]
pub struct MockCouplingAnalyzer {
    packages: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>)>,
}

impl MockCouplingAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str, classes: &[&str], efferents: &[&str]) -> Self {
        self.packages.insert(
            name.to_string(),
            (
                classes.iter().map(|c| c.to_string()).collect(),
                efferents.iter().map(|e| e.to_string()).collect(),
            ),
        );
        self
    }
}

impl CouplingAnalyzer for MockCouplingAnalyzer {
    fn class_count(&self) -> usize {
        self.packages.values().map(|(classes, _)| classes.len()).sum()
    }

    fn classes(&self, package: &str) -> Option<BTreeSet<String>> {
        self.packages.get(package).map(|(classes, _)| classes.clone())
    }

    fn efferents(&self, package: &str) -> Option<BTreeSet<String>> {
        self.packages.get(package).map(|(_, efferents)| efferents.clone())
    }
}

/// Mock DescriptorSource returning a fixed set, or failing when none is given.
pub struct MockDescriptorSource {
    pub set: Option<DescriptorSet>,
}

impl DescriptorSource for MockDescriptorSource {
    fn load(&self) -> Result<DescriptorSet> {
        self.set
            .clone()
            .ok_or_else(|| anyhow!("descriptor source unavailable"))
    }
}

/// In-memory DiagramSink recording write order.
#[derive(Default)]
pub struct MemorySink {
    pub diagrams: BTreeMap<String, String>,
    pub order: Vec<String>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> &str {
        self.diagrams
            .get(name)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("diagram {} was not written", name))
    }
}

impl DiagramSink for MemorySink {
    fn write(&mut self, name: &str, dot: &str) -> Result<()> {
        self.order.push(name.to_string());
        self.diagrams.insert(name.to_string(), dot.to_string());
        Ok(())
    }
}
