//! Version gate over the external semantic-versioning primitives.
//!
//! Plan resolution never implements version semantics itself; parsing and
//! precedence are delegated to the [`semver`] crate. This module is the
//! single seam through which the rest of the crate talks to it, so a parse
//! failure always surfaces as [`ErrorKind::InvalidVersion`](crate::errors::ErrorKind).

use crate::errors::{ErrorKind, PlanError, PlanResult};

pub use semver::Version;

/// Parses a semantic version string.
///
/// # Returns
/// `Ok(Version)` - The parsed version
/// `Err(PlanError)` - `InvalidVersion` if the text is not a well-formed
/// semantic version, with the parser error preserved as the cause
pub fn parse(text: &str) -> PlanResult<Version> {
    Version::parse(text).map_err(|err| {
        PlanError::new_with_cause(
            &format!("Invalid version '{}'", text),
            ErrorKind::InvalidVersion,
            err.into(),
        )
    })
}

/// Returns true if `a` precedes `b` in semantic-versioning order.
#[inline]
pub fn less_than(a: &Version, b: &Version) -> bool {
    a < b
}

/// Returns true if `a` precedes or equals `b` in semantic-versioning order.
#[inline]
pub fn less_or_equal(a: &Version, b: &Version) -> bool {
    a <= b
}
