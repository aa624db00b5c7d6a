use crate::domain::descriptor::{DescriptorSet, derive_package};
use crate::domain::overview::analyzer_class_name;
use crate::domain::ports::CouplingAnalyzer;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Coupling analyzer derived from the descriptors themselves.
///
/// A package depends on another when one of its types extends, implements or references a
/// type declared there. Used when no external coupling data is supplied.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCouplingAnalyzer {
    classes: BTreeMap<String, BTreeSet<String>>,
    efferents: BTreeMap<String, BTreeSet<String>>,
}

impl DescriptorCouplingAnalyzer {
    pub fn from_descriptors(descriptors: &DescriptorSet) -> Self {
        let package_of: HashMap<&str, Option<String>> = descriptors
            .types
            .iter()
            .map(|t| (t.qualified_name.as_str(), t.package_name()))
            .collect();
        let resolve = |name: &str| match package_of.get(name) {
            Some(package) => package.clone(),
            None => derive_package(name),
        };

        let mut analyzer = Self::default();
        for descriptor in &descriptors.types {
            let Some(package) = descriptor.package_name() else {
                continue;
            };
            analyzer
                .classes
                .entry(package.clone())
                .or_default()
                .insert(analyzer_class_name(&package, &descriptor.simple_name()));

            let efferents = analyzer.efferents.entry(package.clone()).or_default();
            let referenced = descriptor
                .superclass
                .iter()
                .chain(&descriptor.interfaces)
                .chain(&descriptor.references);
            for name in referenced {
                if let Some(target) = resolve(name) {
                    if target != package {
                        efferents.insert(target);
                    }
                }
            }
        }
        analyzer
    }
}

impl CouplingAnalyzer for DescriptorCouplingAnalyzer {
    fn class_count(&self) -> usize {
        self.classes.values().map(BTreeSet::len).sum()
    }

    fn classes(&self, package: &str) -> Option<BTreeSet<String>> {
        self.classes.get(package).cloned()
    }

    fn efferents(&self, package: &str) -> Option<BTreeSet<String>> {
        self.efferents.get(package).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::TypeDescriptor;

    #[test]
    fn derives_classes_and_efferents() {
        let mut cat = TypeDescriptor::new("zoo.Cat");
        cat.superclass = Some("zoo.base.Animal".into());
        cat.interfaces = vec!["zoo.Pet".into()];
        cat.references = vec!["java.util.List".into(), "Unqualified".into()];
        let mut inner = TypeDescriptor::new("zoo.Cat.Whisker");
        inner.package = Some("zoo".into());
        let animal = TypeDescriptor::new("zoo.base.Animal");

        let set = DescriptorSet {
            types: vec![cat, inner, animal],
            packages: vec![],
        };
        let analyzer = DescriptorCouplingAnalyzer::from_descriptors(&set);

        assert_eq!(analyzer.class_count(), 3);
        let zoo_classes = analyzer.classes("zoo").unwrap();
        assert!(zoo_classes.contains("zoo.Cat$Whisker"));
        let efferents: Vec<String> = analyzer.efferents("zoo").unwrap().into_iter().collect();
        assert_eq!(efferents, vec!["java.util".to_string(), "zoo.base".to_string()]);
        assert_eq!(analyzer.efferents("zoo.base"), Some(BTreeSet::new()));
        assert_eq!(analyzer.classes("java.util"), None);
    }
}
