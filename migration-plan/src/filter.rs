//! Version-ceiling filtering of registries.

use indexmap::IndexMap;
use log::debug;

use crate::dedupe::DedupeContext;
use crate::errors::PlanResult;
use crate::registry::{Registry, RunnableStep};
use crate::version::{self, Version};

/// Retains the entries whose version does not exceed the ceiling.
///
/// # Arguments
/// * `registry` - Source registry; not consumed
/// * `ceiling` - Inclusive maximum version, as a semantic version string
///
/// # Returns
/// `Ok(Registry)` - The surviving entries in their original relative order,
/// version metadata intact (sequencing still needs it as a sort key)
/// `Err(PlanError)` - `InvalidVersion` if the ceiling or any entry version
/// fails to parse; nothing is returned on a partial failure
///
/// # Behavior
/// The bound is inclusive: an entry whose version equals the ceiling is
/// kept.
pub fn upto<Op: Clone>(registry: &Registry<Op>, ceiling: &str) -> PlanResult<Registry<Op>> {
    let ceiling = version::parse(ceiling)?;
    upto_version(registry, &ceiling)
}

/// Like [`upto`], but with a pre-parsed ceiling.
pub fn upto_version<Op: Clone>(
    registry: &Registry<Op>,
    ceiling: &Version,
) -> PlanResult<Registry<Op>> {
    let mut kept = Registry::new();

    for (key, step) in registry {
        let entry_version = version::parse(&step.version)?;
        if version::less_or_equal(&entry_version, ceiling) {
            kept.insert(key.clone(), step.clone());
        }
    }

    debug!(
        "Version filter kept {} of {} steps at ceiling {}",
        kept.len(),
        registry.len(),
        ceiling
    );
    Ok(kept)
}

/// Incremental variant of [`upto`] used by the programmatic plan builder.
///
/// In addition to the ceiling check, entries whose key is already claimed
/// in the shared context are skipped, and every emitted key is claimed.
/// Repeated calls at increasing ceilings therefore behave like a cursor:
/// each call yields only the steps newly eligible since the previous one.
///
/// Version metadata is stripped here because builder-style output is
/// numbered in insertion order and never version-sorted afterwards.
pub fn upto_seen<Op: Clone>(
    registry: &Registry<Op>,
    ceiling: &str,
    ctx: &mut DedupeContext,
) -> PlanResult<IndexMap<String, RunnableStep<Op>>> {
    let ceiling = version::parse(ceiling)?;
    let mut kept = IndexMap::new();

    for (key, step) in registry {
        if ctx.is_claimed(key) {
            continue;
        }

        let entry_version = version::parse(&step.version)?;
        if version::less_or_equal(&entry_version, &ceiling) {
            ctx.claim(key);
            kept.insert(key.clone(), RunnableStep::from(step.clone()));
        }
    }

    Ok(kept)
}
