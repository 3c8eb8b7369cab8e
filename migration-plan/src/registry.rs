//! Migration registries and module selection.
//!
//! A [`Registry`] is an insertion-ordered mapping from a unique step key to
//! a versioned migration step. Callers supply one mandatory `core` registry
//! plus any number of named optional module registries via [`ModuleSet`],
//! then resolve a merged registry with [`ModuleSet::select`].

use indexmap::IndexMap;
use log::{debug, warn};

use crate::dedupe::{dedupe, DedupeContext};
use crate::errors::{ErrorKind, PlanError, PlanResult};
use crate::filter::upto;
use crate::sequence::{countup, Manifest};

/// A single migration step: a version tag plus forward and optional reverse
/// operations.
///
/// # Purpose
/// The unit of planning. The operation payload `Op` is opaque to this crate;
/// resolution only reads the version and relabels the step. The payload is
/// whatever the embedding application's runner executes: a closure, an SQL
/// string, a command object.
///
/// # Characteristics
/// - The version is kept as the caller-supplied string and parsed lazily at
///   filter/sequencing time, so a malformed version surfaces only when a
///   resolution operation actually needs to order it
/// - Clone-able when `Op` is Clone; selection and filtering never consume
///   the caller's definitions
#[derive(Clone)]
pub struct MigrationStep<Op> {
    pub version: String,
    pub up: Op,
    pub down: Option<Op>,
}

impl<Op> MigrationStep<Op> {
    /// Creates a forward-only migration step.
    pub fn new(version: &str, up: Op) -> Self {
        MigrationStep {
            version: version.to_string(),
            up,
            down: None,
        }
    }

    /// Creates a migration step with both forward and reverse operations.
    pub fn with_down(version: &str, up: Op, down: Op) -> Self {
        MigrationStep {
            version: version.to_string(),
            up,
            down: Some(down),
        }
    }
}

impl<Op> std::fmt::Debug for MigrationStep<Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("version", &self.version)
            .field("up", &"<operation>")
            .field("down", &self.down.as_ref().map(|_| "<operation>"))
            .finish()
    }
}

/// A migration step with version metadata stripped.
///
/// This is the only shape the external runner ever sees: the forward
/// operation plus the optional reverse one. Versions exist to order the
/// plan and are removed at export time.
#[derive(Clone)]
pub struct RunnableStep<Op> {
    pub up: Op,
    pub down: Option<Op>,
}

impl<Op> From<MigrationStep<Op>> for RunnableStep<Op> {
    fn from(step: MigrationStep<Op>) -> Self {
        RunnableStep {
            up: step.up,
            down: step.down,
        }
    }
}

impl<Op> std::fmt::Debug for RunnableStep<Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableStep")
            .field("up", &"<operation>")
            .field("down", &self.down.as_ref().map(|_| "<operation>"))
            .finish()
    }
}

/// An ordered mapping from step key to migration step.
///
/// Insertion order is significant: it is the tie-break when two steps share
/// a version during sequencing.
pub type Registry<Op> = IndexMap<String, MigrationStep<Op>>;

/// A mandatory core registry plus named optional module registries.
///
/// # Purpose
/// The declarative entry point for composing migrations from multiple
/// sources: the application core always contributes its steps, optional
/// feature modules contribute theirs only when explicitly selected.
///
/// # Usage
/// ```ignore
/// let modules = ModuleSet::new(core_registry)
///     .module("audit", audit_registry)
///     .module("fulltext", fulltext_registry);
///
/// let merged = modules.select(&["audit"])?;
/// ```
#[derive(Debug, Clone)]
pub struct ModuleSet<Op> {
    core: Registry<Op>,
    modules: IndexMap<String, Registry<Op>>,
}

impl<Op> ModuleSet<Op> {
    /// Creates a module set from the mandatory core registry.
    pub fn new(core: Registry<Op>) -> Self {
        ModuleSet {
            core,
            modules: IndexMap::new(),
        }
    }

    /// Registers an optional named module registry.
    ///
    /// Registering a name twice replaces the earlier registry.
    pub fn module(mut self, name: &str, registry: Registry<Op>) -> Self {
        self.modules.insert(name.to_string(), registry);
        self
    }

    /// Returns the names of the registered optional modules, in
    /// registration order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl<Op: Clone> ModuleSet<Op> {
    /// Merges the core registry with the selected optional modules.
    ///
    /// # Arguments
    /// * `names` - Optional module names to include, merged in the order
    ///   given
    ///
    /// # Returns
    /// `Ok(Registry)` - Core plus each selected module, shallow-merged;
    /// an entry from a later module overwrites an earlier entry sharing
    /// the same key (explicitly selected module wins over core)
    /// `Err(PlanError)` - `UnknownGroup` if a name has no registered module
    ///
    /// # Behavior
    /// Pure function of its inputs; the module set is not modified. An
    /// empty selection yields a copy of core alone.
    pub fn select(&self, names: &[&str]) -> PlanResult<Registry<Op>> {
        let mut merged = self.core.clone();

        for name in names {
            let module = self.modules.get(*name).ok_or_else(|| {
                PlanError::new(
                    &format!("No such module: {}", name),
                    ErrorKind::UnknownGroup,
                )
            })?;

            for (key, step) in module {
                if merged.insert(key.clone(), step.clone()).is_some() {
                    warn!("Module '{}' shadows step '{}'", name, key);
                }
            }
        }

        debug!(
            "Selected {} steps from core and {} module(s)",
            merged.len(),
            names.len()
        );
        Ok(merged)
    }

    /// Merges like [`select`](Self::select), but a key collision is an
    /// error instead of a silent shadow.
    ///
    /// # Returns
    /// `Err(PlanError)` - `DuplicateKey` if a selected module redefines a
    /// key that is already present in the merge
    pub fn select_strict(&self, names: &[&str]) -> PlanResult<Registry<Op>> {
        let mut merged = self.core.clone();

        for name in names {
            let module = self.modules.get(*name).ok_or_else(|| {
                PlanError::new(
                    &format!("No such module: {}", name),
                    ErrorKind::UnknownGroup,
                )
            })?;

            for (key, step) in module {
                if merged.contains_key(key) {
                    return Err(PlanError::new(
                        &format!("Step '{}' defined by more than one group", key),
                        ErrorKind::DuplicateKey,
                    ));
                }
                merged.insert(key.clone(), step.clone());
            }
        }

        Ok(merged)
    }

    /// Resolves a complete execution plan in one call.
    ///
    /// Runs select, version filter, dedupe, and sequencing back to back:
    /// the declarative composition style with the canonical version-sorted
    /// ordering.
    ///
    /// # Arguments
    /// * `names` - Optional module names to include
    /// * `ceiling` - Inclusive maximum version for selected steps
    pub fn plan(&self, names: &[&str], ceiling: &str) -> PlanResult<Manifest<Op>> {
        let selected = self.select(names)?;
        let filtered = upto(&selected, ceiling)?;

        let mut ctx = DedupeContext::new();
        countup(dedupe(filtered, &mut ctx))
    }
}

/// Builds a [`Registry`] from `key => step` pairs.
///
/// # Examples
///
/// ```rust,ignore
/// use migration_plan::registry;
/// use migration_plan::registry::MigrationStep;
///
/// let core = registry! {
///     "create_users" => MigrationStep::new("1.0.0", "CREATE TABLE users"),
///     "add_email_index" => MigrationStep::new("1.1.0", "CREATE INDEX email"),
/// };
/// ```
#[macro_export]
macro_rules! registry {
    () => {
        $crate::registry::Registry::new()
    };

    ($($key:expr => $step:expr),* $(,)?) => {{
        let mut registry = $crate::registry::Registry::new();
        $(
            registry.insert(::std::string::String::from($key), $step);
        )*
        registry
    }};
}
