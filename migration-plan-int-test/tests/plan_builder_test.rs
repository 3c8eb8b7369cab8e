use migration_plan::builder::build_plan;
use migration_plan::registry::{Registry, RunnableStep};
use migration_plan_int_test::test_util::{core_registry, plugin_registry, TestOp};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_builder_composes_registries_and_literals() {
    let core = core_registry();
    let plugin = plugin_registry();

    let manifest = build_plan(|plan| {
        plan.upto(&core, "1.0.0")?;
        plan.step(
            "seed_admin_account",
            RunnableStep {
                up: "insert admin",
                down: None,
            },
        );
        plan.upto(&core, "1.1.0")?;
        plan.upto(&plugin, "1.1.0")?;
        Ok(())
    })
    .expect("Failed to build plan");

    // call order, not version order, decides the final sequence
    let keys: Vec<_> = manifest.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "00001__create_users",
            "00002__seed_admin_account",
            "00003__add_email_index",
            "00004__create_audit_log",
            "00005__index_audit_log",
        ]
    );
}

#[test]
fn test_builder_cursor_never_reemits_a_step() {
    let core = core_registry();

    let manifest = build_plan(|plan| {
        // same ceiling twice, then a higher one
        plan.upto(&core, "1.0.0")?;
        plan.upto(&core, "1.0.0")?;
        plan.upto(&core, "1.1.0")?;
        Ok(())
    })
    .expect("Failed to build plan");

    assert_eq!(manifest.len(), 2);
}

#[test]
fn test_builder_surfaces_version_errors_before_any_output() {
    let core = core_registry();

    let result = build_plan(|plan| {
        plan.upto(&core, "1.0.0")?;
        plan.upto(&core, "not-a-version")?;
        Ok(())
    });

    assert!(result.is_err());
}

#[test]
fn test_builder_with_empty_callback() {
    let manifest = build_plan::<TestOp, _>(|_| Ok(())).expect("Failed to build plan");

    assert!(manifest.is_empty());
}

#[test]
fn test_builder_accepts_ad_hoc_only_plans() {
    let manifest = build_plan::<TestOp, _>(|plan| {
        plan.step(
            "backfill_emails",
            RunnableStep {
                up: "backfill",
                down: Some("unbackfill"),
            },
        );
        plan.step(
            "rebuild_search_index",
            RunnableStep {
                up: "rebuild",
                down: None,
            },
        );
        Ok(())
    })
    .expect("Failed to build plan");

    let keys: Vec<_> = manifest.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["00001__backfill_emails", "00002__rebuild_search_index"]
    );
}

#[test]
fn test_builder_plans_from_disjoint_registries() {
    let core = core_registry();
    let mut reporting: Registry<TestOp> = Registry::new();
    reporting.insert(
        "create_reports".to_string(),
        migration_plan::registry::MigrationStep::new("0.9.0", "up"),
    );

    let manifest = build_plan(|plan| {
        plan.upto(&reporting, "1.0.0")?;
        plan.upto(&core, "1.1.0")?;
        Ok(())
    })
    .expect("Failed to build plan");

    let keys: Vec<_> = manifest.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "00001__create_reports",
            "00002__create_users",
            "00003__add_email_index",
        ]
    );
}
