//! Service properties: `name=value` parsing and the immutable snapshot attached to
//! every registered service.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{DEFAULT_RANKING, SERVICE_RANKING};
use crate::registry_error::{RegistryError, SyntaxKind};

/// Splits `text` on its first `=` into a non-empty name and a non-empty value.
///
/// The name may hold any character except `=`. Everything after the first `=`,
/// further `=` characters included, belongs to the value.
pub(crate) fn split_pair(text: &str) -> Option<(&str, &str)> {
    let (name, value) = text.split_once('=')?;
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// A single parsed `name=value` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    value: String,
}

impl Property {
    /// Parses `name=value`, returning `None` when the text is malformed.
    pub fn parse(text: &str) -> Option<Self> {
        split_pair(text).map(|(name, value)| Property {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Immutable snapshot of a service's properties.
///
/// Built once at registration from a copy of the caller's input and never
/// changed afterwards. Always carries [`SERVICE_RANKING`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    /// Builds a snapshot from `name=value` strings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Syntax`] listing every malformed string.
    pub fn parse<I, S>(properties: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut invalid = Vec::new();

        for text in properties {
            let text = text.as_ref();
            match Property::parse(text) {
                Some(property) => parsed.push(property),
                None => invalid.push(text.to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(RegistryError::Syntax {
                kind: SyntaxKind::Property,
                invalid,
            });
        }

        Ok(Self::from_valid(parsed))
    }

    /// Builds a snapshot from `(name, value)` pairs.
    ///
    /// Each pair is validated as if it had been written `name=value`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Syntax`] listing every malformed pair as `name=value`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut invalid = Vec::new();

        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            if name.is_empty() || name.contains('=') || value.is_empty() {
                invalid.push(format!("{name}={value}"));
            } else {
                parsed.push(Property {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if !invalid.is_empty() {
            return Err(RegistryError::Syntax {
                kind: SyntaxKind::Property,
                invalid,
            });
        }

        Ok(Self::from_valid(parsed))
    }

    fn from_valid(parsed: Vec<Property>) -> Self {
        let mut values: BTreeMap<String, String> = parsed
            .into_iter()
            .map(|property| (property.name, property.value))
            .collect();

        values
            .entry(SERVICE_RANKING.to_string())
            .or_insert_with(|| DEFAULT_RANKING.to_string());

        Properties { values }
    }

    /// Value of the named property, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ranking parsed from [`SERVICE_RANKING`]; [`DEFAULT_RANKING`] when the value
    /// is not a base-10 `i32`.
    pub fn ranking(&self) -> i32 {
        self.get(SERVICE_RANKING)
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_RANKING)
    }
}

/// Only the default ranking.
impl Default for Properties {
    fn default() -> Self {
        Self::from_valid(Vec::new())
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "}}")
    }
}
