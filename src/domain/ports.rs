use crate::domain::descriptor::DescriptorSet;
use anyhow::Result;
use std::collections::BTreeSet;

/// Descriptor source port (implemented by Infrastructure)
pub trait DescriptorSource {
    fn load(&self) -> Result<DescriptorSet>;
}

/// Package coupling analyzer port
///
/// Answers over compiled classes; class names use `$` for nesting (`a.b.Outer$Inner`).
pub trait CouplingAnalyzer {
    /// Number of classes analyzed, across all packages.
    fn class_count(&self) -> usize;

    /// Classes analyzed in `package`, or `None` when the package is unknown to the analyzer.
    fn classes(&self, package: &str) -> Option<BTreeSet<String>>;

    /// Packages `package` depends on, or `None` when the package is unknown.
    fn efferents(&self, package: &str) -> Option<BTreeSet<String>>;
}

/// Diagram output port
pub trait DiagramSink {
    /// Stores the DOT text of one diagram under its output name
    /// (`overview-summary`, `a/b/package-summary`, `a/b/Foo`).
    fn write(&mut self, name: &str, dot: &str) -> Result<()>;
}
