//! Tag parsing.
//!
//! Tag bodies are parsed once, when a node is registered, into a closed [`TagKind`] union.
//! Keys the parser does not know are logged at debug level and skipped.

use regex::Regex;
use tracing::debug;

use crate::domain::descriptor::Tags;
use crate::domain::edge::{EdgeKind, EdgeLabels};
use crate::domain::error::DiagramError;

/// Prefix shared by every diagram tag.
pub const TAG_PREFIX: &str = "apiviz.";

/// Recognized tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Stereotype,
    Uses,
    Has,
    Owns,
    ComposedOf,
    Landmark,
    Hidden,
    Exclude,
    ExcludeSubtypes,
    Inherit,
    Category,
    Deprecated,
}

impl TagKind {
    /// Parses a tag key, accepting `@apiviz.uses`, `apiviz.uses` and `uses`.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.strip_prefix('@').unwrap_or(key);
        let key = key.strip_prefix(TAG_PREFIX).unwrap_or(key);
        let kind = match key {
            "stereotype" => TagKind::Stereotype,
            "uses" => TagKind::Uses,
            "has" => TagKind::Has,
            "owns" => TagKind::Owns,
            "composedOf" => TagKind::ComposedOf,
            "landmark" => TagKind::Landmark,
            "hidden" => TagKind::Hidden,
            "exclude" => TagKind::Exclude,
            "excludeSubtypes" => TagKind::ExcludeSubtypes,
            "inherit" => TagKind::Inherit,
            "category" => TagKind::Category,
            "deprecated" => TagKind::Deprecated,
            _ => return None,
        };
        Some(kind)
    }

    /// Edge kind produced by a custom relationship tag.
    pub fn relation_kind(self) -> Option<EdgeKind> {
        match self {
            TagKind::Uses => Some(EdgeKind::Dependency),
            TagKind::Has => Some(EdgeKind::Navigability),
            TagKind::Owns => Some(EdgeKind::Aggregation),
            TagKind::ComposedOf => Some(EdgeKind::Composition),
            _ => None,
        }
    }
}

/// A parsed custom relationship tag:
/// `<target> [oneway] [<sourceLabel> <targetLabel> [<edgeLabel>...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTag {
    pub kind: EdgeKind,
    pub target: String,
    pub labels: EdgeLabels,
    pub oneway: bool,
}

impl RelationTag {
    /// Returns `None` for an empty body.
    pub fn parse(kind: EdgeKind, body: &str) -> Option<Self> {
        let mut tokens = body.split_whitespace().peekable();
        let target = tokens.next()?.to_string();

        let oneway = tokens.next_if(|t| *t == "oneway").is_some();
        let source = tokens.next().map(label_token).unwrap_or_default();
        let target_label = tokens.next().map(label_token).unwrap_or_default();
        let edge = tokens
            .filter(|t| *t != "-")
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            kind,
            target,
            labels: EdgeLabels {
                source,
                target: target_label,
                edge,
            },
            oneway,
        })
    }
}

fn label_token(token: &str) -> String {
    if token == "-" {
        String::new()
    } else {
        token.to_string()
    }
}

/// All diagram tags of one type or package, parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTags {
    pub relations: Vec<RelationTag>,
    pub stereotype: Option<String>,
    pub category: Option<String>,
    pub landmark: bool,
    pub hidden: bool,
    /// Non-empty exclude bodies, still uncompiled.
    pub excludes: Vec<String>,
    /// At least one exclude tag had an empty body.
    pub exclude_all: bool,
    pub exclude_subtypes: bool,
    pub inherit: bool,
    pub deprecated: bool,
}

impl NodeTags {
    pub fn parse(owner: &str, tags: &Tags) -> Self {
        let mut parsed = NodeTags::default();

        for (key, bodies) in tags {
            let Some(kind) = TagKind::parse(key) else {
                debug!(owner, tag = %key, "Ignoring tag that is not a diagram tag");
                continue;
            };

            if let Some(edge_kind) = kind.relation_kind() {
                for body in bodies {
                    match RelationTag::parse(edge_kind, body) {
                        Some(relation) => parsed.relations.push(relation),
                        None => debug!(owner, tag = %key, "Dropping relation tag with empty body"),
                    }
                }
                continue;
            }

            match kind {
                TagKind::Stereotype => parsed.stereotype = first_non_blank(bodies),
                TagKind::Category => parsed.category = first_non_blank(bodies),
                TagKind::Landmark => parsed.landmark = true,
                TagKind::Hidden => parsed.hidden = true,
                TagKind::ExcludeSubtypes => parsed.exclude_subtypes = true,
                TagKind::Inherit => parsed.inherit = true,
                TagKind::Deprecated => parsed.deprecated = true,
                TagKind::Exclude => {
                    if bodies.is_empty() {
                        parsed.exclude_all = true;
                    }
                    for body in bodies {
                        let body = body.trim();
                        if body.is_empty() {
                            parsed.exclude_all = true;
                        } else {
                            parsed.excludes.push(body.to_string());
                        }
                    }
                }
                TagKind::Uses | TagKind::Has | TagKind::Owns | TagKind::ComposedOf => {}
            }
        }

        parsed
    }

    /// A hidden node: `hidden` tag, or an `exclude` tag with an empty body.
    pub fn is_hidden(&self) -> bool {
        self.hidden || self.exclude_all
    }
}

/// Compiles exclude bodies; the first invalid pattern aborts.
pub fn compile_excludes(owner: &str, patterns: &[String]) -> Result<Vec<Regex>, DiagramError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| DiagramError::InvalidExcludePattern {
                owner: owner.to_string(),
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn first_non_blank(bodies: &[String]) -> Option<String> {
    bodies
        .iter()
        .map(|b| b.trim())
        .find(|b| !b.is_empty())
        .map(str::to_string)
}
