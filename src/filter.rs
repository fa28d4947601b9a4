//! Lookup filters.
//!
//! A filter is a `name=value` predicate parsed with the same rule as registration
//! properties: split on the first `=`, non-empty name without `=`, non-empty value.
//! A service matches a set of filters only if it satisfies every one of them.

use std::fmt;
use std::str::FromStr;

use crate::properties::{split_pair, Properties};
use crate::registry_error::{RegistryError, SyntaxKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    name: String,
    value: String,
}

impl Filter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when `properties` holds this filter's name with exactly this value.
    pub fn matches(&self, properties: &Properties) -> bool {
        properties.get(&self.name) == Some(self.value.as_str())
    }

    /// Parses every filter, failing with all invalid ones at once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Syntax`] listing every malformed filter.
    pub fn parse_all<I, S>(filters: I) -> Result<Vec<Filter>, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut invalid = Vec::new();

        for text in filters {
            match text.as_ref().parse::<Filter>() {
                Ok(filter) => parsed.push(filter),
                Err(_) => invalid.push(text.as_ref().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(parsed)
        } else {
            Err(RegistryError::Syntax {
                kind: SyntaxKind::Filter,
                invalid,
            })
        }
    }
}

/// AND over all filters. An empty set matches everything.
pub(crate) fn match_all(filters: &[Filter], properties: &Properties) -> bool {
    filters.iter().all(|filter| filter.matches(properties))
}

impl FromStr for Filter {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_pair(s)
            .map(|(name, value)| Filter {
                name: name.to_string(),
                value: value.to_string(),
            })
            .ok_or_else(|| RegistryError::Syntax {
                kind: SyntaxKind::Filter,
                invalid: vec![s.to_string()],
            })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
