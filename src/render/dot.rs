//! DOT text helpers.

use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// Font used for every label; abstract classes switch to the italic face.
pub const NORMAL_FONT: &str = "Arial";
pub const ITALIC_FONT: &str = "Arial Italic";

fn escape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"("|'|\\.?|\s)+"#).expect("valid escape regex"))
}

/// Collapses runs of quotes, backslash sequences and whitespace into a single space, so
/// the text can sit inside a quoted attribute.
pub fn escape(text: &str) -> String {
    escape_regex().replace_all(text, " ").into_owned()
}

/// Node identifier: the qualified name with every character that is not an ASCII letter
/// or digit replaced by an underscore, so it is a valid unquoted DOT ID.
pub fn node_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// A DOT graph writer. Attribute values are written verbatim; callers escape.
pub struct DotWriter {
    output: String,
}

impl DotWriter {
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(16384);
        let _ = writeln!(output, "digraph {name} {{");
        Self { output }
    }

    /// Add a graph attribute statement (`key=value;`).
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        let _ = writeln!(self.output, "{key}={value};");
        self
    }

    /// Add a default attribute list for `edge` or `node`.
    pub fn defaults(&mut self, target: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(self.output, "{target} [");
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{key}={value}");
        }
        self.output.push_str("]; \n");
        self
    }

    /// Add a node with quoted attributes.
    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(self.output, "{id} [");
        self.quoted_attrs(attrs);
        self.output.push_str("];\n");
        self
    }

    /// Add an edge with quoted attributes.
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(self.output, "{from} -> {to} [");
        self.quoted_attrs(attrs);
        self.output.push_str(" ];\n");
        self
    }

    fn quoted_attrs(&mut self, attrs: &[(&str, &str)]) {
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{key}=\"{value}\"");
        }
    }

    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escape_collapses_quotes_backslashes_and_whitespace() {
        assert_eq!(escape("a \"quoted\"  'word'"), "a quoted word ");
        assert_eq!(escape("line\\nbreak"), "line break");
        assert_eq!(escape("tab\there"), "tab here");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn node_ids_replace_dots() {
        assert_eq!(node_id("org.example.Foo"), "org_example_Foo");
        assert_eq!(node_id("Foo"), "Foo");
    }

    #[test]
    fn node_ids_replace_nested_type_separators() {
        assert_eq!(node_id("a.Outer$Inner"), "a_Outer_Inner");
        assert_eq!(node_id("a.Caf\u{e9}"), "a_Caf_");
    }

    #[test]
    fn writer_emits_statements_in_order() {
        let mut dot = DotWriter::new("APIVIZ");
        dot.attr("rankdir", "LR")
            .defaults("node", &[("shape", "box"), ("fontname", "\"Arial\"")])
            .node("a_A", &[("label", "A")])
            .edge("a_A", "a_B", &[("style", "solid"), ("dir", "both")]);
        assert_eq!(
            dot.build(),
            "digraph APIVIZ {\n\
             rankdir=LR;\n\
             node [shape=box, fontname=\"Arial\"]; \n\
             a_A [label=\"A\"];\n\
             a_A -> a_B [style=\"solid\", dir=\"both\" ];\n\
             }\n"
        );
    }
}
