//! Environment name validation.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Result, VemanError};

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Longest accepted environment name.
pub const MAX_NAME_LEN: usize = 64;

/// A validated environment name.
///
/// Names become directory names under the registry root, so they are
/// limited to ASCII letters, digits, `.`, `_` and `-`, and must start with a
/// letter or digit (no hidden directories, no `..`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Validate `name`.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| VemanError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(invalid(&format!(
                "name is longer than {} characters",
                MAX_NAME_LEN
            )));
        }
        if !NAME_REGEX.is_match(name) {
            return Err(invalid(
                "use letters, digits, '.', '_' or '-', starting with a letter or digit",
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EnvironmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
