use crate::shared::errors::{AppError, AppResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Validated `owner/name` of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName {
    owner: String,
    name: String,
}

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9_.-]+)$").ok()
        })
        .as_ref()
}

impl RepositoryName {
    /// Accepts `owner/name`, tolerating surrounding whitespace and a
    /// trailing `.git`
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let invalid = || {
            AppError::InvalidInput(format!(
                "'{}' is not a repository name of the form owner/name",
                input
            ))
        };

        let pattern = pattern().ok_or_else(|| {
            AppError::InternalError("Repository name pattern failed to compile".to_string())
        })?;
        let captures = pattern.captures(trimmed).ok_or_else(invalid)?;

        let owner = captures.get(1).map(|m| m.as_str()).ok_or_else(invalid)?;
        let name = captures.get(2).map(|m| m.as_str()).ok_or_else(invalid)?;
        if name == "." || name == ".." {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_owner_and_name() {
        let repo = RepositoryName::parse(" rust-lang/rust.vim.git ").unwrap();
        assert_eq!(repo.owner(), "rust-lang");
        assert_eq!(repo.name(), "rust.vim");
        assert_eq!(repo.to_string(), "rust-lang/rust.vim");
    }

    #[test]
    fn test_rejects_malformed_names() {
        let inputs = [
            "",
            "rust",
            "rust-lang/",
            "/rust",
            "a/b/c",
            "-x/y",
            "x/..",
            "https://github.com/a/b",
        ];
        for input in inputs {
            assert!(
                matches!(RepositoryName::parse(input), Err(AppError::InvalidInput(_))),
                "accepted {:?}",
                input
            );
        }
    }
}
