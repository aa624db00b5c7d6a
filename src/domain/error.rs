use thiserror::Error;

/// Errors raised while building, selecting or rendering a diagram.
///
/// # Error Categories
///
/// - [`DiagramError::InvalidExcludePattern`] - an `exclude` tag body is not a valid regex.
///   Aborts the whole generation run.
/// - [`DiagramError::EmptyPackageName`], [`DiagramError::UnknownType`],
///   [`DiagramError::UnknownPackage`] - structural problems that abort only the diagram
///   being generated.
/// - [`DiagramError::InvalidCategory`] - a malformed category declaration; reported as a
///   configuration diagnostic.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// An exclude tag carries a pattern the regex engine rejects.
    #[error("invalid exclude pattern `{pattern}` on {owner}: {source}")]
    InvalidExcludePattern {
        owner: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A package taking part in the overview has an empty name.
    #[error("unexpected empty package name")]
    EmptyPackageName,

    /// The requested focal type is not part of the graph.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The requested scope package is not part of the graph.
    #[error("unknown package: {0}")]
    UnknownPackage(String),

    /// A category declaration could not be parsed.
    #[error("invalid category specification `{spec}`: {reason}")]
    InvalidCategory { spec: String, reason: String },
}

impl DiagramError {
    /// Returns true when the error must abort the whole run instead of a single diagram.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiagramError::InvalidExcludePattern { .. })
    }
}
