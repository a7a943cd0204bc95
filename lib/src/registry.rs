//! # autocli Module Registry
//!
//! File: lib/src/registry.rs
//!
//! ## Overview
//!
//! Rust has no runtime import-by-name, so command modules are made loadable by
//! registering them up front. A [`Registry`] maps each module's relative file
//! path (and the identifier derived from it) to a load routine that produces a
//! [`ModuleDescriptor`]. The registry is usually generated at build time by
//! `crate::codegen`, but it can be populated by hand as well.
//!
//! Loading validates the module contract. A descriptor must expose both
//! capabilities:
//! - `configure(group, leaf_name)`: declares the leaf's arguments and binds it.
//! - `execute(matches)`: the command logic.
//!
//! Every failure here is per-module. The caller logs it and moves on to the
//! next discovered file.
//!
use crate::core::error::{AutocliError, Capability, Result};
use crate::discovery::naming;
use crate::tree::GroupHandle;
use clap::ArgMatches;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Shared configure capability: `(parent group, leaf name)`.
pub type ConfigureFn = Arc<dyn Fn(&mut GroupHandle<'_>, &str) -> Result<()> + Send + Sync>;
/// Shared execute capability, called with the matches of the selected leaf.
pub type ExecuteFn = Arc<dyn Fn(&ArgMatches) -> Result<()> + Send + Sync>;
/// Load routine for one module.
pub type LoadFn = Arc<dyn Fn() -> Result<ModuleDescriptor> + Send + Sync>;

/// # Module Descriptor (`ModuleDescriptor`)
///
/// The capabilities a loaded command module exposes. Both are optional here so
/// that an incomplete module can be represented and reported instead of failing
/// to compile.
#[derive(Clone, Default)]
pub struct ModuleDescriptor {
    configure: Option<ConfigureFn>,
    execute: Option<ExecuteFn>,
}

impl ModuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configure<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut GroupHandle<'_>, &str) -> Result<()> + Send + Sync + 'static,
    {
        self.configure = Some(Arc::new(configure));
        self
    }

    pub fn with_execute<F>(mut self, execute: F) -> Self
    where
        F: Fn(&ArgMatches) -> Result<()> + Send + Sync + 'static,
    {
        self.execute = Some(Arc::new(execute));
        self
    }

    pub fn configure(&self) -> Option<&ConfigureFn> {
        self.configure.as_ref()
    }

    pub fn execute(&self) -> Option<&ExecuteFn> {
        self.execute.as_ref()
    }

    /// Capabilities this descriptor lacks, in contract order.
    pub fn missing_capabilities(&self) -> Vec<Capability> {
        let mut missing = Vec::new();
        if self.configure.is_none() {
            missing.push(Capability::Configure);
        }
        if self.execute.is_none() {
            missing.push(Capability::Execute);
        }
        missing
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("configure", &self.configure.is_some())
            .field("execute", &self.execute.is_some())
            .finish()
    }
}

struct Entry {
    relative_path: PathBuf,
    load: LoadFn,
}

/// # Registry (`Registry`)
///
/// Startup registry of loadable command modules, keyed by module identifier.
/// Entries iterate in identifier order.
pub struct Registry {
    package: String,
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry whose identifiers are rooted at `package`.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// # Register Module Loader (`register`)
    ///
    /// Registers a load routine for the command file at `relative_path` (relative
    /// to the commands directory, extension included). Returns the identifier
    /// the module is known by. A later registration for the same identifier
    /// replaces the earlier one.
    ///
    /// ## Returns
    ///
    /// * `Err(AutocliError::InvalidName)` if the path cannot be resolved.
    pub fn register<P, F>(&mut self, relative_path: P, load: F) -> Result<String>
    where
        P: AsRef<Path>,
        F: Fn() -> Result<ModuleDescriptor> + Send + Sync + 'static,
    {
        let relative_path = relative_path.as_ref();
        let identifier = naming::resolve(relative_path, &self.package)?.identifier;
        debug!("Registering module {} ({})", identifier, relative_path.display());
        self.entries.insert(
            identifier.clone(),
            Entry {
                relative_path: relative_path.to_path_buf(),
                load: Arc::new(load),
            },
        );
        Ok(identifier)
    }

    /// Registers an already-built descriptor. Invalid paths are ignored with a warning.
    pub fn register_module<P: AsRef<Path>>(&mut self, relative_path: P, module: ModuleDescriptor) {
        let relative_path = relative_path.as_ref();
        if let Err(e) = self.register(relative_path, move || Ok(module.clone())) {
            tracing::warn!("Ignoring module at '{}': {}", relative_path.display(), e);
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative paths of every registered module, in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = &Path> + '_ {
        self.entries.values().map(|e| e.relative_path.as_path())
    }

    /// # Load Module (`load`)
    ///
    /// Runs the load routine registered under `identifier` and checks the
    /// module contract.
    ///
    /// ## Returns
    ///
    /// * `Err(AutocliError::ModuleLoad)` if nothing is registered under the
    ///   identifier or its load routine fails.
    /// * `Err(AutocliError::ModuleContract)` if the descriptor lacks `configure`
    ///   or `execute`.
    pub fn load(&self, identifier: &str) -> std::result::Result<ModuleDescriptor, AutocliError> {
        let entry = self
            .entries
            .get(identifier)
            .ok_or_else(|| AutocliError::ModuleLoad {
                identifier: identifier.to_string(),
                cause: "no module registered under this identifier".to_string(),
            })?;

        let module = (entry.load)().map_err(|e| AutocliError::ModuleLoad {
            identifier: identifier.to_string(),
            cause: format!("{:#}", e),
        })?;

        let missing = module.missing_capabilities();
        if !missing.is_empty() {
            return Err(AutocliError::ModuleContract {
                identifier: identifier.to_string(),
                missing,
            });
        }
        Ok(module)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("package", &self.package)
            .field("modules", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
