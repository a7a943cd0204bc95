//! # autocli Scanner
//!
//! File: lib/src/discovery/scanner.rs
//!
//! ## Overview
//!
//! Enumerates candidate command files under a root directory. The result is a
//! lazy iterator over paths relative to the root, so the caller can resolve and
//! register each file as it is found.
//!
//! A file is command-bearing when:
//! - it is a regular file with the configured extension (default `rs`),
//! - its file name is not a package marker (default `mod.rs`),
//! - no component of its relative path starts with `.`.
//!
//! The root itself is validated up front. A missing root or a root that is not a
//! directory is the only fatal error of the whole pipeline.
//!
use crate::core::error::{AutocliError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Options controlling which files the scanner yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extension of command files, without the leading dot.
    pub extension: String,
    /// File names that mark a package rather than a command (e.g. `mod.rs`).
    pub markers: Vec<String>,
    /// Descend into subdirectories. When false only the root's own files are visited.
    pub recursive: bool,
    /// Visit directory entries in file-name order.
    pub sorted: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "rs".to_string(),
            markers: vec!["mod.rs".to_string()],
            recursive: true,
            sorted: true,
        }
    }
}

impl ScanOptions {
    /// True when `relative` names a command-bearing file under these options.
    pub fn accepts(&self, relative: &Path) -> bool {
        let has_extension = relative
            .extension()
            .map_or(false, |ext| ext.to_string_lossy() == self.extension);
        if !has_extension {
            return false;
        }
        let is_marker = relative.file_name().map_or(false, |name| {
            let name = name.to_string_lossy();
            self.markers.iter().any(|marker| *marker == name)
        });
        if is_marker {
            return false;
        }
        !relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
    }
}

/// # Scan (`Scan`)
///
/// Lazy iterator returned by [`scan`]. Yields paths relative to the scan root.
/// Entries that cannot be read mid-walk are logged and skipped.
pub struct Scan {
    root: PathBuf,
    walker: walkdir::IntoIter,
    options: ScanOptions,
}

impl Scan {
    /// The directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Scan {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under '{}': {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };
            if self.options.accepts(&relative) {
                debug!("Discovered command file: {}", relative.display());
                return Some(relative);
            }
        }
    }
}

/// # Scan Command Directory (`scan`)
///
/// Validates `root` and returns a lazy iterator over the relative paths of every
/// command-bearing file beneath it.
///
/// ## Returns
///
/// * `Err(AutocliError::MissingRoot)` if `root` does not exist.
/// * `Err(AutocliError::RootNotDirectory)` if `root` exists but is not a directory.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Scan> {
    if !root.exists() {
        return Err(AutocliError::MissingRoot {
            path: root.to_path_buf(),
        }
        .into());
    }
    if !root.is_dir() {
        return Err(AutocliError::RootNotDirectory {
            path: root.to_path_buf(),
        }
        .into());
    }

    let mut walk = WalkDir::new(root).min_depth(1);
    if !options.recursive {
        walk = walk.max_depth(1);
    }
    if options.sorted {
        walk = walk.sort_by_file_name();
    }
    debug!(
        "Scanning '{}' (recursive: {}, sorted: {})",
        root.display(),
        options.recursive,
        options.sorted
    );

    Ok(Scan {
        root: root.to_path_buf(),
        walker: walk.into_iter(),
        options: options.clone(),
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_filters_markers_and_extensions() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        touch(root, "mod.rs");
        touch(root, "report.rs");
        touch(root, "user/mod.rs");
        touch(root, "user/add.rs");
        touch(root, "user__remove.rs");
        touch(root, "notes.txt");
        touch(root, ".hidden/secret.rs");

        let found: Vec<PathBuf> = scan(root, &ScanOptions::default())?.collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("report.rs"),
                PathBuf::from("user").join("add.rs"),
                PathBuf::from("user__remove.rs"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_flat_skips_subdirectories() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        touch(root, "user__delete.rs");
        touch(root, "service__db__connect.rs");
        touch(root, "user/add.rs");

        let options = ScanOptions {
            recursive: false,
            ..Default::default()
        };
        let found: Vec<PathBuf> = scan(root, &options)?.collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("service__db__connect.rs"),
                PathBuf::from("user__delete.rs"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_custom_extension() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        touch(root, "__init__.py");
        touch(root, "user__add.py");
        touch(root, "user__add.rs");

        let options = ScanOptions {
            extension: "py".into(),
            markers: vec!["__init__.py".into()],
            ..Default::default()
        };
        let found: Vec<PathBuf> = scan(root, &options)?.collect();
        assert_eq!(found, vec![PathBuf::from("user__add.py")]);
        Ok(())
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let result = scan(Path::new("/path/that/does/not/exist/and/never/will"), &ScanOptions::default());
        let err = result.err().expect("missing root must fail");
        let autocli_err = err.downcast_ref::<AutocliError>().unwrap();
        assert!(matches!(autocli_err, AutocliError::MissingRoot { .. }));
        assert!(autocli_err.is_fatal());
    }

    #[test]
    fn test_scan_file_root_is_fatal() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("not_a_dir");
        fs::write(&file, "")?;
        let err = scan(&file, &ScanOptions::default()).err().unwrap();
        assert!(err.to_string().contains("is not a directory"));
        Ok(())
    }
}
