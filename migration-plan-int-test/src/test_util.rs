use migration_plan::registry::{MigrationStep, Registry};
use migration_plan::sequence::Manifest;

/// Test operation payload: a label identifying which definition the step
/// came from. The resolver treats payloads as opaque, so a label is enough
/// to verify what survived and in what order.
pub type TestOp = &'static str;

pub fn step(version: &str) -> MigrationStep<TestOp> {
    MigrationStep::new(version, "up")
}

pub fn labeled_step(version: &str, label: TestOp) -> MigrationStep<TestOp> {
    MigrationStep::new(version, label)
}

/// Core and plugin fixture registries shared by the scenario tests: two
/// core steps and two plugin steps, pairwise at the same versions.
pub fn core_registry() -> Registry<TestOp> {
    let mut core = Registry::new();
    core.insert("create_users".to_string(), step("1.0.0"));
    core.insert("add_email_index".to_string(), step("1.1.0"));
    core
}

pub fn plugin_registry() -> Registry<TestOp> {
    let mut plugin = Registry::new();
    plugin.insert("create_audit_log".to_string(), step("1.0.0"));
    plugin.insert("index_audit_log".to_string(), step("1.1.0"));
    plugin
}

/// A minimal stand-in for the external migration runner: walks the
/// manifest in key order and records the keys it would apply. Real runners
/// additionally skip keys found in their persistent applied-key log; key
/// order is the whole contract this crate owes them.
pub fn apply_all<Op>(manifest: &Manifest<Op>) -> Vec<String> {
    manifest.keys().cloned().collect()
}
