use std::fmt;

/// What kind of input failed `name=value` validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    /// A property passed at registration.
    Property,
    /// A filter passed to a lookup.
    Filter,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::Property => write!(f, "property"),
            SyntaxKind::Filter => write!(f, "filter"),
        }
    }
}

/// Errors returned by the registry.
///
/// Lookups that find nothing are not errors; they return `None` or an empty `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// One or more strings were not on the form `name=value`.
    ///
    /// `invalid` holds every offending string in input order, not just the first.
    #[error(
        "{count} invalid {kind} string(s), each must be on the form name=value:\n{list}",
        count = .invalid.len(),
        list = bullet_list(.invalid)
    )]
    Syntax {
        kind: SyntaxKind,
        invalid: Vec<String>,
    },
}

impl RegistryError {
    /// The strings that failed validation.
    pub fn invalid(&self) -> &[String] {
        match self {
            RegistryError::Syntax { invalid, .. } => invalid,
        }
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\t- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
