//! Parse errors and recoverable geometry warnings.

use thiserror::Error;

/// Errors that fail a whole document load.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error("Invalid viewBox: {0:?}")]
    InvalidViewBox(String),

    #[error("Element nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

/// A problem confined to one node. The node degrades to empty geometry (or a no-op
/// reference) and the load still succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryWarning {
    /// Path data could not be parsed; the path is left empty.
    #[error("malformed path data{}: {reason}", in_node(.id))]
    MalformedPathData { id: Option<String>, reason: String },
    /// A `use` element names an identifier that does not exist.
    #[error("unresolved reference #{href}")]
    UnresolvedReference { href: String },
    /// A `use` element would instantiate one of its own ancestors.
    #[error("cyclic reference #{href} ignored")]
    CyclicReference { href: String },
    /// A `use` element whose expansion nests deeper than the renderer allows.
    #[error("reference #{href} nests more than {limit} levels, ignored")]
    ReferenceTooDeep { href: String, limit: usize },
    /// A `transform` attribute could not be parsed; identity is used.
    #[error("malformed transform {value:?}")]
    MalformedTransform { value: String },
    /// A `points` attribute had an odd number of coordinates.
    #[error("odd coordinate count in points{}", of_node(.id))]
    MalformedPoints { id: Option<String> },
}

fn in_node(id: &Option<String>) -> String {
    id.as_ref().map(|id| format!(" in #{id}")).unwrap_or_default()
}

fn of_node(id: &Option<String>) -> String {
    id.as_ref().map(|id| format!(" of #{id}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        let warning = GeometryWarning::MalformedPathData {
            id: Some("p".into()),
            reason: "path data must begin with a moveto".into(),
        };
        assert_eq!(
            warning.to_string(),
            "malformed path data in #p: path data must begin with a moveto"
        );
        assert_eq!(
            GeometryWarning::MalformedPoints { id: None }.to_string(),
            "odd coordinate count in points"
        );
        assert_eq!(
            GeometryWarning::MalformedPoints { id: Some("tri".into()) }.to_string(),
            "odd coordinate count in points of #tri"
        );
        assert_eq!(
            GeometryWarning::ReferenceTooDeep { href: "u9".into(), limit: 8 }.to_string(),
            "reference #u9 nests more than 8 levels, ignored"
        );
    }

    #[test]
    fn test_warning_is_std_error() {
        let warning: Box<dyn std::error::Error> =
            Box::new(GeometryWarning::UnresolvedReference { href: "x".into() });
        assert_eq!(warning.to_string(), "unresolved reference #x");
    }
}
