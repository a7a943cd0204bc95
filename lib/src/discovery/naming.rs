//! # autocli Name Resolution
//!
//! File: lib/src/discovery/naming.rs
//!
//! ## Overview
//!
//! Converts a command file's path, relative to the scan root, into:
//!
//! 1. A [`CommandPath`]: the directory components in order, followed by the file
//!    stem, each split on the [`DELIMITER`] (`__`).
//! 2. A module identifier: the package name followed by each path component
//!    (extension stripped), joined with `::`.
//!
//! ```text
//! admin/user__list.rs     -> ["admin", "user", "list"]   commands::admin::user__list
//! user__db__connect.rs    -> ["user", "db", "connect"]   commands::user__db__connect
//! admin__db/connect.rs    -> ["admin", "db", "connect"]  commands::admin__db::connect
//! report.rs               -> ["report"]                  commands::report
//! ```
//!
//! Segments are never empty. A file such as `__x.rs` or `a____b.rs` is rejected
//! with `AutocliError::InvalidName` and skipped by the caller.
//!
use crate::core::error::{AutocliError, Result};
use std::fmt;
use std::path::{Component, Path};

/// Separator that encodes hierarchy inside a single file or directory name.
pub const DELIMITER: &str = "__";

/// Separator between components of a module identifier.
pub const IDENTIFIER_SEPARATOR: &str = "::";

/// Ordered, non-empty list of non-empty command name segments, root to leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandPath {
    segments: Vec<String>,
}

impl CommandPath {
    /// Builds a path from segments, rejecting an empty list or an empty segment.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(AutocliError::InvalidName {
                path: String::new(),
                reason: "command path has no segments".to_string(),
            }
            .into());
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(AutocliError::InvalidName {
                path: segments.join(DELIMITER),
                reason: "command path contains an empty segment".to_string(),
            }
            .into());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment: the name of the invocable command.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Every segment except the leaf.
    pub fn groups(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Key of the group formed by the first `depth` segments. Depth 0 is the root (`""`).
    pub fn prefix_key(&self, depth: usize) -> String {
        self.segments[..depth.min(self.segments.len())].join(DELIMITER)
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(" "))
    }
}

/// A command file after name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub path: CommandPath,
    pub identifier: String,
}

/// # Resolve Command File (`resolve`)
///
/// Computes the `CommandPath` and module identifier for `relative`, a path
/// relative to the scan root, under the package named `package`.
///
/// ## Returns
///
/// * `Err(AutocliError::InvalidName)` when the path is not a plain relative path,
///   has a non-UTF-8 component, or would produce an empty segment.
pub fn resolve(relative: &Path, package: &str) -> Result<ResolvedModule> {
    let display = relative.display().to_string();
    let invalid = |reason: &str| AutocliError::InvalidName {
        path: display.clone(),
        reason: reason.to_string(),
    };

    let mut components = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => components.push(part),
                None => return Err(invalid("path is not valid UTF-8").into()),
            },
            Component::CurDir => {}
            _ => return Err(invalid("path must be relative to the commands directory").into()),
        }
    }
    let file_name = match components.pop() {
        Some(name) => name,
        None => return Err(invalid("path has no file name").into()),
    };
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let segments: Vec<&str> = components
        .iter()
        .copied()
        .chain(std::iter::once(stem))
        .flat_map(|part| part.split(DELIMITER))
        .collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid("name produces an empty command segment").into());
    }

    let mut identifier = String::from(package);
    for part in components.iter().copied().chain(std::iter::once(stem)) {
        if !identifier.is_empty() {
            identifier.push_str(IDENTIFIER_SEPARATOR);
        }
        identifier.push_str(part);
    }

    Ok(ResolvedModule {
        path: CommandPath::new(segments)?,
        identifier,
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn segments(relative: &str) -> Vec<String> {
        resolve(Path::new(relative), "commands")
            .unwrap()
            .path
            .segments()
            .to_vec()
    }

    #[test]
    fn test_directories_then_delimiter() {
        assert_eq!(segments("admin/user__list.rs"), ["admin", "user", "list"]);
        assert_eq!(segments("admin__db/connect.rs"), ["admin", "db", "connect"]);
        assert_eq!(segments("settings/config__get.rs"), ["settings", "config", "get"]);
        assert_eq!(segments("user__db__connect.rs"), ["user", "db", "connect"]);
    }

    #[test]
    fn test_single_segment() {
        let resolved = resolve(Path::new("report.rs"), "commands").unwrap();
        assert_eq!(resolved.path.segments(), ["report"]);
        assert_eq!(resolved.path.leaf(), "report");
        assert!(resolved.path.groups().is_empty());
        assert_eq!(resolved.identifier, "commands::report");
    }

    #[test]
    fn test_identifier_keeps_delimiters() {
        let resolved = resolve(Path::new("admin/user__list.rs"), "commands").unwrap();
        assert_eq!(resolved.identifier, "commands::admin::user__list");
        let resolved = resolve(Path::new("admin__db/connect.rs"), "app").unwrap();
        assert_eq!(resolved.identifier, "app::admin__db::connect");
        let resolved = resolve(Path::new("user/add.rs"), "").unwrap();
        assert_eq!(resolved.identifier, "user::add");
    }

    #[test]
    fn test_empty_segments_rejected() {
        for bad in ["__x.rs", "a____b.rs", "x__.rs", "__/x.rs"] {
            let err = resolve(Path::new(bad), "commands").unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<AutocliError>(),
                    Some(AutocliError::InvalidName { .. })
                ),
                "expected InvalidName for {}",
                bad
            );
        }
    }

    #[test]
    fn test_absolute_path_rejected() {
        assert!(resolve(Path::new("/etc/x.rs"), "commands").is_err());
        assert!(resolve(Path::new("../x.rs"), "commands").is_err());
    }

    #[test]
    fn test_command_path_keys_and_display() {
        let path = CommandPath::new(["user", "db", "connect"]).unwrap();
        assert_eq!(path.prefix_key(0), "");
        assert_eq!(path.prefix_key(1), "user");
        assert_eq!(path.prefix_key(2), "user__db");
        assert_eq!(path.to_string(), "user db connect");
        assert_eq!(path.groups(), ["user", "db"]);
        assert!(CommandPath::new(Vec::<String>::new()).is_err());
        assert!(CommandPath::new(["user", ""]).is_err());
    }
}
