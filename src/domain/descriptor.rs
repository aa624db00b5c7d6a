//! Descriptor model: the contract between the upstream doc-model provider and the
//! relationship graph.
//!
//! Descriptors are immutable snapshots of what the documentation tool knows about each
//! type and package: kind flags, direct supertype and interfaces, free-form tags and
//! resolved cross references. The [`GraphBuilder`](crate::domain::builder::GraphBuilder)
//! consumes a [`DescriptorSet`] once per run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tag annotations: tag name → bodies, one per occurrence, in declaration order.
///
/// Keys may be written with or without the `@` and `apiviz.` prefixes
/// (`@apiviz.uses`, `apiviz.uses` and `uses` are equivalent).
pub type Tags = BTreeMap<String, Vec<String>>;

/// Everything the descriptor provider extracted for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// Documented types plus any referenced types the provider could describe.
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    /// Package-level documentation (tags, inclusion).
    #[serde(default)]
    pub packages: Vec<PackageDescriptor>,
}

impl DescriptorSet {
    /// Looks up a type descriptor by qualified name.
    pub fn find_type(&self, qualified_name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.qualified_name == qualified_name)
    }
}

/// Source-language classification of a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A method signature summary; only the flags needed to classify static utility types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_constructor: bool,
}

/// A single type as seen by the documentation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully-qualified name, the identity key of the node.
    pub qualified_name: String,
    /// Simple name; nested types keep their outer name (`Outer.Inner`).
    /// Derived from the qualified name when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Containing package; derived from the qualified name when absent.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub is_abstract: bool,
    /// Exception or error type.
    #[serde(default)]
    pub is_exception: bool,
    /// Direct supertype.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Directly implemented (or extended, for interfaces) interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Resolved cross references (`@see` targets), qualified or package-relative.
    #[serde(default)]
    pub see_also: Vec<String>,
    /// Types referenced from signatures and bodies; used to derive package couplings.
    #[serde(default)]
    pub references: Vec<String>,
    /// Whether the type is documented in this run (gets a diagram and a link).
    #[serde(default = "default_true")]
    pub included: bool,
}

impl TypeDescriptor {
    /// Creates a descriptor for an included class with no relations.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            name: None,
            package: None,
            kind: TypeKind::Class,
            is_abstract: false,
            is_exception: false,
            superclass: None,
            interfaces: Vec::new(),
            tags: Tags::new(),
            methods: Vec::new(),
            see_also: Vec::new(),
            references: Vec::new(),
            included: true,
        }
    }

    pub fn package_name(&self) -> Option<String> {
        match &self.package {
            Some(p) if p.is_empty() => None,
            Some(p) => Some(p.clone()),
            None => derive_package(&self.qualified_name),
        }
    }

    pub fn simple_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.package_name() {
            Some(pkg) => self
                .qualified_name
                .strip_prefix(&pkg)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(&self.qualified_name)
                .to_string(),
            None => self.qualified_name.clone(),
        }
    }

    /// At least one non-constructor method, and every such method is static.
    pub fn is_static_utility(&self) -> bool {
        let mut methods = self.methods.iter().filter(|m| !m.is_constructor).peekable();
        methods.peek().is_some() && methods.all(|m| m.is_static)
    }
}

/// A package as seen by the documentation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default = "default_true")]
    pub included: bool,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            included: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Everything before the last dot of a qualified name.
pub fn derive_package(qualified_name: &str) -> Option<String> {
    qualified_name
        .rsplit_once('.')
        .map(|(pkg, _)| pkg.to_string())
        .filter(|pkg| !pkg.is_empty())
}
