//! Sequencing: turning a resolved registry into a numbered manifest.
//!
//! The manifest key format is a compatibility contract with any runner
//! that persists applied-key names: `{counter:05}__{original_key}` with
//! five zero-padded digits and two literal underscores. It must never
//! change shape.

use indexmap::IndexMap;
use log::debug;

use crate::errors::PlanResult;
use crate::registry::{Registry, RunnableStep};
use crate::version::{self, Version};

/// The final execution-ready plan: an ordered mapping from numbered key to
/// runnable step.
///
/// Iterating the manifest in key order (equivalently, lexical order of the
/// zero-padded prefixes) yields the intended execution order.
pub type Manifest<Op> = IndexMap<String, RunnableStep<Op>>;

fn numbered_key(counter: u32, key: &str) -> String {
    format!("{:05}__{}", counter, key)
}

/// Numbers a registry into a manifest, ordered by version ascending.
///
/// Equivalent to [`countup_from`] with a counter base of 0, so the first
/// emitted key carries the prefix `00001`.
pub fn countup<Op>(registry: Registry<Op>) -> PlanResult<Manifest<Op>> {
    countup_from(registry, 0)
}

/// Numbers a registry into a manifest, ordered by version ascending, with
/// an explicit counter base.
///
/// # Arguments
/// * `registry` - The resolved registry; consumed
/// * `counter` - Base of the numbering; the counter is incremented before
///   each entry, so the first emitted prefix is `counter + 1`
///
/// # Returns
/// `Ok(Manifest)` - One entry per input entry, keyed
/// `{counter:05}__{original_key}`, version metadata stripped
/// `Err(PlanError)` - `InvalidVersion` if any entry version fails to
/// parse; no partial manifest is produced
///
/// # Behavior
/// - Entries are sorted by version ascending; two entries with equal
///   versions keep their original relative registry order (stable sort,
///   never key-lexical order)
/// - Output cardinality equals input cardinality and prefixes are
///   contiguous, so no two output keys can collide
pub fn countup_from<Op>(registry: Registry<Op>, mut counter: u32) -> PlanResult<Manifest<Op>> {
    // parse everything up front so a malformed version fails the whole call
    let mut entries: Vec<(Version, String, RunnableStep<Op>)> = Vec::with_capacity(registry.len());
    for (key, step) in registry {
        let parsed = version::parse(&step.version)?;
        entries.push((parsed, key, RunnableStep::from(step)));
    }

    // stable sort: equal versions keep registry order as the tie-break
    entries.sort_by(|(a, _, _), (b, _, _)| a.cmp(b));

    let mut manifest = Manifest::new();
    for (_, key, step) in entries {
        counter += 1;
        manifest.insert(numbered_key(counter, &key), step);
    }

    debug!("Sequenced {} steps", manifest.len());
    Ok(manifest)
}

/// Numbers already-stripped entries in pure insertion order.
///
/// This is the sequencing used by the programmatic plan builder, where
/// version metadata is gone by the time entries are collected and the
/// caller controls relative order by the order of their builder calls.
/// The key format is the same contract as [`countup_from`].
pub fn number_entries<Op>(
    entries: IndexMap<String, RunnableStep<Op>>,
    mut counter: u32,
) -> Manifest<Op> {
    let mut manifest = Manifest::new();
    for (key, step) in entries {
        counter += 1;
        manifest.insert(numbered_key(counter, &key), step);
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::registry;
    use crate::registry::MigrationStep;

    fn step(version: &str) -> MigrationStep<&'static str> {
        MigrationStep::new(version, "up")
    }

    #[test]
    fn countup_adds_ordered_numbering_to_keys() {
        let registry = registry! {
            "create_users" => step("1.0.0"),
            "add_email_index" => step("1.1.0"),
        };

        let result = countup(registry).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.contains_key("00001__create_users"));
        assert!(result.contains_key("00002__add_email_index"));
    }

    #[test]
    fn countup_orders_by_version_not_insertion() {
        let registry = registry! {
            "newer" => step("2.0.0"),
            "older" => step("1.0.0"),
        };

        let result = countup(registry).unwrap();

        let keys: Vec<_> = result.keys().collect();
        assert_eq!(keys, vec!["00001__older", "00002__newer"]);
    }

    #[test]
    fn countup_breaks_version_ties_by_registry_order() {
        let registry = registry! {
            "zz_core_step" => step("1.0.0"),
            "aa_plugin_step" => step("1.0.0"),
        };

        let result = countup(registry).unwrap();

        // not key-lexical: the earlier registry entry gets the lower prefix
        let keys: Vec<_> = result.keys().collect();
        assert_eq!(keys, vec!["00001__zz_core_step", "00002__aa_plugin_step"]);
    }

    #[test]
    fn countup_is_a_bijection() {
        let registry = registry! {
            "a" => step("1.0.0"),
            "b" => step("1.1.0"),
            "c" => step("1.2.0"),
        };
        let input_len = registry.len();

        let result = countup(registry).unwrap();

        assert_eq!(result.len(), input_len);
        for (i, key) in result.keys().enumerate() {
            let (prefix, suffix) = key.split_once("__").unwrap();
            assert_eq!(prefix.len(), 5);
            assert_eq!(prefix.parse::<u32>().unwrap(), (i + 1) as u32);
            assert!(["a", "b", "c"].contains(&suffix));
        }
    }

    #[test]
    fn countup_strips_version_metadata() {
        let registry = registry! {
            "create_users" => MigrationStep::with_down("1.0.0", "up", "down"),
        };

        let result = countup(registry).unwrap();

        let runnable = &result["00001__create_users"];
        assert_eq!(runnable.up, "up");
        assert_eq!(runnable.down, Some("down"));
    }

    #[test]
    fn countup_from_starts_above_the_base() {
        let registry = registry! {
            "create_users" => step("1.0.0"),
        };

        let result = countup_from(registry, 41).unwrap();

        assert!(result.contains_key("00042__create_users"));
    }

    #[test]
    fn countup_of_empty_registry_is_empty() {
        let registry: Registry<&str> = registry! {};

        let result = countup(registry).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn countup_fails_on_malformed_version() {
        let registry = registry! {
            "broken" => step("not-a-version"),
        };

        let result = countup(registry);

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidVersion);
    }

    #[test]
    fn countup_orders_prereleases_before_release() {
        let registry = registry! {
            "release" => step("1.0.0"),
            "alpha" => step("1.0.0-alpha.1"),
        };

        let result = countup(registry).unwrap();

        let keys: Vec<_> = result.keys().collect();
        assert_eq!(keys, vec!["00001__alpha", "00002__release"]);
    }

    #[test]
    fn number_entries_keeps_insertion_order() {
        let registry = registry! {
            "newer" => step("2.0.0"),
            "older" => step("1.0.0"),
        };
        let entries: IndexMap<String, RunnableStep<&str>> = registry
            .into_iter()
            .map(|(key, step)| (key, RunnableStep::from(step)))
            .collect();

        let result = number_entries(entries, 0);

        let keys: Vec<_> = result.keys().collect();
        assert_eq!(keys, vec!["00001__newer", "00002__older"]);
    }

    #[test]
    fn numbered_key_format_is_stable() {
        assert_eq!(numbered_key(1, "create_users"), "00001__create_users");
        assert_eq!(numbered_key(99999, "x"), "99999__x");
        assert_eq!(numbered_key(100000, "x"), "100000__x");
    }
}
