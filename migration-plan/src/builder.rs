//! Programmatic plan building.
//!
//! The declarative composition style goes through
//! [`ModuleSet`](crate::registry::ModuleSet); this module is the second
//! entry point, where a callback composes incremental version filters and
//! literal ad-hoc steps freely and the builder numbers whatever was
//! accumulated, in accumulation order.

use indexmap::IndexMap;
use log::debug;

use crate::dedupe::DedupeContext;
use crate::errors::PlanResult;
use crate::filter::upto_seen;
use crate::registry::{Registry, RunnableStep};
use crate::sequence::{number_entries, Manifest};

/// Accumulates plan entries within one [`build_plan`] invocation.
///
/// # Characteristics
/// - One shared [`DedupeContext`] backs every `upto` call and literal
///   `step`, so a key is consumed at most once per invocation, preferring
///   the first writer
/// - Relative ordering of the final manifest is the order in which entries
///   were accumulated; there is no version-aware re-sort (versions are
///   stripped as entries come in)
/// - Call-scoped: nothing survives past the `build_plan` call
pub struct PlanBuilder<Op> {
    entries: IndexMap<String, RunnableStep<Op>>,
    seen: DedupeContext,
}

impl<Op: Clone> PlanBuilder<Op> {
    fn new() -> Self {
        PlanBuilder {
            entries: IndexMap::new(),
            seen: DedupeContext::new(),
        }
    }

    /// Appends every step of the registry at or below the ceiling that has
    /// not already been claimed in this invocation.
    ///
    /// Repeated calls at increasing ceilings act as an incremental cursor:
    /// each call contributes only the newly eligible steps.
    ///
    /// # Returns
    /// `Err(PlanError)` - `InvalidVersion` if the ceiling or any entry
    /// version fails to parse
    pub fn upto(&mut self, registry: &Registry<Op>, ceiling: &str) -> PlanResult<&mut Self> {
        let picked = upto_seen(registry, ceiling, &mut self.seen)?;
        for (key, step) in picked {
            self.entries.insert(key, step);
        }
        Ok(self)
    }

    /// Appends a literal ad-hoc step.
    ///
    /// A key already claimed in this invocation is silently skipped, the
    /// same first-writer-wins rule the version filters follow.
    pub fn step(&mut self, key: &str, step: RunnableStep<Op>) -> &mut Self {
        if self.seen.claim(key) {
            self.entries.insert(key.to_string(), step);
        }
        self
    }
}

/// Builds a manifest by running the supplied callback against a fresh
/// [`PlanBuilder`], then numbering the accumulated entries in accumulation
/// order.
///
/// # Examples
///
/// ```rust,ignore
/// use migration_plan::builder::build_plan;
/// use migration_plan::registry::RunnableStep;
///
/// let manifest = build_plan(|plan| {
///     plan.upto(&core, "1.0.0")?;
///     plan.step("backfill_emails", RunnableStep { up: backfill, down: None });
///     plan.upto(&core, "1.2.0")?;
///     Ok(())
/// })?;
/// ```
///
/// # Behavior
/// - All-or-nothing: an error inside the callback aborts the call before
///   any manifest is produced
/// - Numbering uses the standard `{counter:05}__{key}` contract starting
///   at base 0
pub fn build_plan<Op, F>(builder_fn: F) -> PlanResult<Manifest<Op>>
where
    Op: Clone,
    F: FnOnce(&mut PlanBuilder<Op>) -> PlanResult<()>,
{
    let mut builder = PlanBuilder::new();
    builder_fn(&mut builder)?;

    debug!("Built plan with {} entries", builder.entries.len());
    Ok(number_entries(builder.entries, 0))
}
