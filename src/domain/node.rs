use regex::Regex;

use crate::domain::descriptor::{PackageDescriptor, TypeDescriptor, TypeKind};
use crate::domain::error::DiagramError;
use crate::domain::tag::{NodeTags, compile_excludes};

/// Qualified type or package name, the identity key of every node.
pub type NodeKey = String;

/// Type node - one class, interface, enum or annotation.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub qualified_name: NodeKey,
    pub name: String,
    pub package: Option<String>,

    // Classification
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_exception: bool,
    pub is_static: bool,

    pub tags: NodeTags,
    /// Compiled `exclude` patterns.
    pub excludes: Vec<Regex>,

    /// Documented in this run (gets its own diagram and a hyperlink).
    pub included: bool,
    /// Created lazily for a name no descriptor describes.
    pub stub: bool,
}

impl TypeNode {
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Result<Self, DiagramError> {
        let tags = NodeTags::parse(&descriptor.qualified_name, &descriptor.tags);
        let excludes = compile_excludes(&descriptor.qualified_name, &tags.excludes)?;
        Ok(Self {
            qualified_name: descriptor.qualified_name.clone(),
            name: descriptor.simple_name(),
            package: descriptor.package_name(),
            kind: descriptor.kind,
            is_abstract: descriptor.is_abstract,
            is_exception: descriptor.is_exception,
            is_static: descriptor.is_static_utility(),
            tags,
            excludes,
            included: descriptor.included,
            stub: false,
        })
    }

    /// A node known only by name.
    pub fn stub(qualified_name: &str, kind: TypeKind) -> Self {
        let descriptor = TypeDescriptor::new(qualified_name);
        Self {
            qualified_name: qualified_name.to_string(),
            name: descriptor.simple_name(),
            package: descriptor.package_name(),
            kind,
            is_abstract: false,
            is_exception: false,
            is_static: false,
            tags: NodeTags::default(),
            excludes: Vec::new(),
            included: false,
            stub: true,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_hidden(&self) -> bool {
        self.tags.is_hidden()
    }

    pub fn in_package(&self, package: &str) -> bool {
        self.package.as_deref() == Some(package)
    }

    /// Layout rank: lower ranks are placed first in landscape diagrams.
    pub fn natural_rank(&self) -> i32 {
        if self.kind == TypeKind::Annotation {
            0
        } else if self.kind == TypeKind::Enum {
            1
        } else if self.is_static {
            2
        } else if self.is_interface() {
            3
        } else if self.is_abstract {
            4
        } else if self.is_exception {
            100
        } else {
            50
        }
    }

    /// Stereotype shown above the name, before any `stereotype` tag override.
    pub fn default_stereotype(&self) -> Option<&'static str> {
        if self.is_exception {
            return Some("exception");
        }
        match self.kind {
            TypeKind::Annotation => Some("annotation"),
            TypeKind::Enum => Some("enum"),
            _ if self.is_static => Some("static"),
            TypeKind::Interface => Some("interface"),
            TypeKind::Class => None,
        }
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.tags
            .stereotype
            .as_deref()
            .or_else(|| self.default_stereotype())
    }
}

/// Package node - participates in package summaries and the overview.
#[derive(Debug, Clone)]
pub struct PackageNode {
    pub name: NodeKey,
    pub tags: NodeTags,
    pub excludes: Vec<Regex>,
    pub included: bool,
}

impl PackageNode {
    pub fn from_descriptor(descriptor: &PackageDescriptor) -> Result<Self, DiagramError> {
        let owner = format!("package {}", descriptor.name);
        let tags = NodeTags::parse(&owner, &descriptor.tags);
        let excludes = compile_excludes(&owner, &tags.excludes)?;
        Ok(Self {
            name: descriptor.name.clone(),
            tags,
            excludes,
            included: descriptor.included,
        })
    }

    /// A package implied by its types but without its own descriptor.
    pub fn implied(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: NodeTags::default(),
            excludes: Vec::new(),
            included: true,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.tags.is_hidden()
    }
}
