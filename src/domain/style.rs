//! Category registry and color resolution.
//!
//! Categories map a name to a fill/line color pair. They are declared up front by
//! configuration or created on first sight of a `category` tag, drawing from a fixed
//! palette in discovery order. [`StyleResolver`] turns a node plus the diagram scope into
//! final fill, line and font colors.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::error::DiagramError;
use crate::domain::node::{PackageNode, TypeNode};

pub const HIGHLIGHT_FILL: &str = "#FFF68F";
pub const DEFAULT_FILL: &str = "#FFFFFF";
pub const DEFAULT_LINE: &str = "#000000";
pub const FONT_IN_SCOPE: &str = "black";
pub const FONT_OUT_OF_SCOPE: &str = "gray30";

/// Amount added to each channel when a color is pushed toward white.
const DESATURATION_SHIFT: u16 = 0x4D;

/// Fill/line pairs handed out to categories nobody declared. Never cycles.
pub const PALETTE: [(&str, &str); 8] = [
    ("#FF0000", "#8B0000"), // red
    ("#87CEEB", "#3A5FCD"), // sky blue
    ("#98FB98", "#008B45"), // pale green
    ("#FFA500", "#CD3700"), // orange
    ("#EEB4B4", "#CD853F"), // rosy brown
    ("#6A5ACD", "#7D26CD"), // slate blue
    ("#FFFF00", "#8B8B00"), // yellow
    ("#F2F2F2", "#828282"), // grey
];

/// Named fill/line color pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub fill_color: String,
    pub line_color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, fill: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fill_color: fill.into(),
            line_color: line.into(),
        }
    }

    /// Parses `name[:fill[:line]]`, `name fill[:line]` or `name fill line`.
    pub fn parse(spec: &str) -> Result<Self, DiagramError> {
        let args: Vec<&str> = spec.split_whitespace().collect();
        Self::from_args(spec, &args)
    }

    pub fn from_args(spec: &str, args: &[&str]) -> Result<Self, DiagramError> {
        let invalid = |reason: &str| DiagramError::InvalidCategory {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = match args {
            [single] => single.split(':').collect(),
            [name, colors] => std::iter::once(*name).chain(colors.split(':')).collect(),
            [name, fill, line] => vec![*name, *fill, *line],
            [] => return Err(invalid("empty category specification")),
            _ => return Err(invalid("too many arguments")),
        };
        if parts.len() > 3 {
            return Err(invalid("too many color components"));
        }

        let name = parts[0].trim();
        if name.is_empty() {
            return Err(invalid("empty category name"));
        }
        let fill = color_part(parts.get(1), DEFAULT_FILL);
        let line = color_part(parts.get(2), DEFAULT_LINE);
        for color in [&fill, &line] {
            if color.starts_with('#') && !is_hex_color(color) {
                return Err(invalid(&format!("malformed color {}", color)));
            }
        }

        Ok(Self::new(name, fill, line))
    }
}

fn color_part(part: Option<&&str>, default: &str) -> String {
    match part.map(|p| p.trim()) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => default.to_string(),
    }
}

/// `#RRGGBB`.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Shifts a hex color toward white, clamping each channel at 0xFF. Named colors pass
/// through unchanged.
pub fn desaturate(color: &str) -> String {
    if !is_hex_color(color) {
        return color.to_string();
    }
    let mut shifted = String::from("#");
    for channel in [&color[1..3], &color[3..5], &color[5..7]] {
        let value = u16::from_str_radix(channel, 16).unwrap_or(0);
        let value = (value + DESATURATION_SHIFT).min(0xFF);
        shifted.push_str(&format!("{:02X}", value));
    }
    shifted
}

/// Category registry - the one mutable piece of state during rendering.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: BTreeMap<String, Category>,
    palette_used: usize,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a configured category. A repeated name replaces the earlier one and
    /// returns false.
    pub fn declare(&mut self, category: Category) -> bool {
        let name = category.name.clone();
        let fresh = self.categories.insert(name.clone(), category).is_none();
        if !fresh {
            warn!(category = %name, "Category defined multiple times");
        }
        fresh
    }

    /// Returns the category, creating it from the palette when first seen.
    pub fn ensure(&mut self, name: &str) -> &Category {
        if !self.categories.contains_key(name) {
            let category = match PALETTE.get(self.palette_used) {
                Some((fill, line)) => {
                    self.palette_used += 1;
                    Category::new(name, *fill, *line)
                }
                None => Category::new(name, DEFAULT_FILL, DEFAULT_LINE),
            };
            debug!(
                category = name,
                fill = %category.fill_color,
                line = %category.line_color,
                "Assigned category colors"
            );
            self.categories.insert(name.to_string(), category);
        }
        &self.categories[name]
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }
}

/// Resolves node and edge colors for one diagram.
pub struct StyleResolver<'a> {
    scope_package: Option<&'a str>,
    focus: Option<&'a str>,
    registry: &'a CategoryRegistry,
}

impl<'a> StyleResolver<'a> {
    pub fn new(
        scope_package: Option<&'a str>,
        focus: Option<&'a str>,
        registry: &'a CategoryRegistry,
    ) -> Self {
        Self {
            scope_package,
            focus,
            registry,
        }
    }

    fn in_scope(&self, node: &TypeNode) -> bool {
        node.package.as_deref() == self.scope_package
    }

    fn category(&self, name: Option<&String>) -> Option<&'a Category> {
        name.and_then(|n| self.registry.get(n))
    }

    pub fn fill_color(&self, node: &TypeNode) -> String {
        if self.focus == Some(node.qualified_name.as_str()) || node.tags.landmark {
            return HIGHLIGHT_FILL.to_string();
        }
        match self.category(node.tags.category.as_ref()) {
            Some(category) if self.in_scope(node) => category.fill_color.clone(),
            Some(category) => desaturate(&category.fill_color),
            None => DEFAULT_FILL.to_string(),
        }
    }

    pub fn line_color(&self, node: &TypeNode) -> String {
        self.line_color_against(node, self.focus)
    }

    /// Line color of `node` when the highlighted node is `focus`.
    fn line_color_against(&self, node: &TypeNode, focus: Option<&str>) -> String {
        let mut color = DEFAULT_LINE.to_string();
        let focal = focus == Some(node.qualified_name.as_str());
        if !focal && !node.tags.landmark {
            if let Some(category) = self.category(node.tags.category.as_ref()) {
                color = category.line_color.clone();
            }
        }
        if self.in_scope(node) {
            color
        } else {
            desaturate(&color)
        }
    }

    pub fn font_color(&self, node: &TypeNode) -> &'static str {
        if self.in_scope(node) {
            FONT_IN_SCOPE
        } else {
            FONT_OUT_OF_SCOPE
        }
    }

    /// Edge line and font colors follow the target node.
    pub fn edge_colors(&self, source: &TypeNode, target: &TypeNode) -> (String, &'static str) {
        (
            self.line_color_against(target, Some(source.qualified_name.as_str())),
            self.font_color(target),
        )
    }

    pub fn package_fill_color(&self, package: &PackageNode) -> String {
        if package.tags.landmark {
            return HIGHLIGHT_FILL.to_string();
        }
        self.category(package.tags.category.as_ref())
            .map(|c| c.fill_color.clone())
            .unwrap_or_else(|| DEFAULT_FILL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::TypeKind;

    fn node(name: &str, category: Option<&str>, landmark: bool) -> TypeNode {
        let mut node = TypeNode::stub(name, TypeKind::Class);
        node.tags.category = category.map(str::to_string);
        node.tags.landmark = landmark;
        node
    }

    #[test]
    fn desaturation_clamps_each_channel() {
        assert_eq!(desaturate("#000000"), "#4D4D4D");
        assert_eq!(desaturate("#FF0000"), "#FF4D4D");
        assert_eq!(desaturate("#C0B2FF"), "#FFFFFF");
        assert_eq!(desaturate("khaki1"), "khaki1");
        assert_eq!(desaturate("#12345"), "#12345");
    }

    #[test]
    fn category_spec_forms() {
        assert_eq!(
            Category::parse("core").unwrap(),
            Category::new("core", DEFAULT_FILL, DEFAULT_LINE)
        );
        assert_eq!(
            Category::parse("core:#FF0000").unwrap(),
            Category::new("core", "#FF0000", DEFAULT_LINE)
        );
        assert_eq!(
            Category::parse("core:red:blue").unwrap(),
            Category::new("core", "red", "blue")
        );
        assert_eq!(
            Category::parse("core red:blue").unwrap(),
            Category::new("core", "red", "blue")
        );
        assert_eq!(
            Category::parse("core red blue").unwrap(),
            Category::new("core", "red", "blue")
        );
        assert!(Category::parse("").is_err());
        assert!(Category::parse(":red").is_err());
        assert!(Category::parse("core #GG0000").is_err());
        assert!(Category::parse("a b c d").is_err());
    }

    #[test]
    fn palette_is_assigned_in_discovery_order_and_never_cycles() {
        let mut registry = CategoryRegistry::new();
        for i in 0..PALETTE.len() {
            let category = registry.ensure(&format!("c{}", i)).clone();
            assert_eq!(category.fill_color, PALETTE[i].0);
            assert_eq!(category.line_color, PALETTE[i].1);
        }
        let overflow = registry.ensure("c8").clone();
        assert_eq!(overflow.fill_color, DEFAULT_FILL);
        assert_eq!(overflow.line_color, DEFAULT_LINE);

        // existing names keep their colors
        assert_eq!(registry.ensure("c0").fill_color, PALETTE[0].0);
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn declared_categories_do_not_consume_the_palette() {
        let mut registry = CategoryRegistry::new();
        assert!(registry.declare(Category::new("core", "green", "black")));
        assert!(!registry.declare(Category::new("core", "blue", "black")));
        assert_eq!(registry.ensure("core").fill_color, "blue");
        assert_eq!(registry.ensure("extra").fill_color, PALETTE[0].0);
    }

    #[test]
    fn fill_precedence() {
        let mut registry = CategoryRegistry::new();
        registry.declare(Category::new("core", "#808080", "#102030"));
        let style = StyleResolver::new(Some("p"), Some("p.Focus"), &registry);

        assert_eq!(style.fill_color(&node("p.Focus", Some("core"), false)), HIGHLIGHT_FILL);
        assert_eq!(style.fill_color(&node("p.Mark", Some("core"), true)), HIGHLIGHT_FILL);
        assert_eq!(style.fill_color(&node("p.Cat", Some("core"), false)), "#808080");
        assert_eq!(style.fill_color(&node("q.Cat", Some("core"), false)), "#CDCDCD");
        assert_eq!(style.fill_color(&node("p.Plain", None, false)), DEFAULT_FILL);
        assert_eq!(style.fill_color(&node("p.Unknown", Some("nope"), false)), DEFAULT_FILL);
    }

    #[test]
    fn line_and_font_colors() {
        let mut registry = CategoryRegistry::new();
        registry.declare(Category::new("core", "#808080", "#102030"));
        let style = StyleResolver::new(Some("p"), Some("p.Focus"), &registry);

        assert_eq!(style.line_color(&node("p.Focus", Some("core"), false)), DEFAULT_LINE);
        assert_eq!(style.line_color(&node("p.Mark", Some("core"), true)), DEFAULT_LINE);
        assert_eq!(style.line_color(&node("p.Cat", Some("core"), false)), "#102030");
        assert_eq!(style.line_color(&node("q.Plain", None, false)), "#4D4D4D");
        assert_eq!(style.font_color(&node("p.Plain", None, false)), "black");
        assert_eq!(style.font_color(&node("q.Plain", None, false)), "gray30");

        let (line, font) = style.edge_colors(
            &node("p.Other", None, false),
            &node("p.Focus", Some("core"), false),
        );
        assert_eq!(line, "#102030");
        assert_eq!(font, "black");
    }
}
