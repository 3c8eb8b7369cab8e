//! # migration-plan - Schema Migration Plan Resolution
//!
//! `migration-plan` resolves a declarative collection of versioned
//! schema-migration definitions into a single, deterministically ordered,
//! deduplicated, and sequentially numbered execution plan. It decides which
//! steps run and in what order; applying them is the job of an external
//! migration runner, which receives the finished manifest.
//!
//! ## Key Features
//!
//! - **Modules**: A mandatory core registry plus optional named modules,
//!   merged on explicit selection
//! - **Version ceilings**: Inclusive semantic-version filtering via the
//!   `semver` crate
//! - **Deduplication**: An explicit context guarantees a step key is
//!   claimed at most once per resolution
//! - **Stable sequencing**: Version-ascending order with insertion-order
//!   tie-breaks, exported under zero-padded sortable keys
//! - **Two composition styles**: Declarative module selection, or a
//!   programmatic builder callback for free-form composition
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use migration_plan::registry;
//! use migration_plan::registry::{MigrationStep, ModuleSet};
//!
//! # fn main() -> migration_plan::errors::PlanResult<()> {
//! let modules = ModuleSet::new(registry! {
//!     "create_users" => MigrationStep::new("1.0.0", create_users_sql),
//!     "add_email_index" => MigrationStep::new("1.1.0", add_email_index_sql),
//! })
//! .module("audit", registry! {
//!     "create_audit_log" => MigrationStep::new("1.1.0", create_audit_log_sql),
//! });
//!
//! // select -> filter -> dedupe -> sequence, in one call
//! let manifest = modules.plan(&["audit"], "1.1.0")?;
//!
//! // keys iterate in execution order: 00001__create_users, ...
//! for (key, step) in &manifest {
//!     runner.apply(key, &step.up)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Resolution Pipeline
//!
//! Registries flow through selection ([`registry::ModuleSet::select`]),
//! version filtering ([`filter::upto`]), deduplication
//! ([`dedupe::dedupe`]), and sequencing ([`sequence::countup`]). Each
//! stage is a pure or call-scoped-stateful function; nothing persists
//! between resolution calls. The manifest key format
//! `{counter:05}__{original_key}` is a stable contract with runners that
//! persist applied-key names.
//!
//! ## Module Organization
//!
//! - [`builder`] - Programmatic plan builder
//! - [`common`] - Shared type aliases
//! - [`dedupe`] - Deduplication context and filter
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Version-ceiling filtering
//! - [`registry`] - Migration steps, registries, and module selection
//! - [`sequence`] - Manifest numbering and key format
//! - [`version`] - Version gate over the `semver` primitives

pub mod builder;
pub mod common;
pub mod dedupe;
pub mod errors;
pub mod filter;
pub mod registry;
pub mod sequence;
pub mod version;
