//! Admission rules for OpenStackCluster.
//!
//! Two entry points:
//! - [`validate_create`] checks a single proposed spec
//! - [`validate_update`] checks the transition from the last accepted spec
//!
//! Both walk a declared rule table ([`CREATE_RULES`], [`UPDATE_RULES`]) and
//! return every violation at once. Fields without a rule may change freely.
//! Structural create-time checks are not repeated on update; the update table
//! carries its own `identityRef.kind` rule.

pub mod comparators;
pub mod rules;
mod violation;

pub use rules::{CREATE_RULES, FieldRule, FieldValue, RuleKind, UPDATE_RULES};
pub use violation::{Violation, ViolationKind, ViolationList, Violations};

use tracing::debug;

use crate::crd::{OpenStackCluster, OpenStackClusterSpec};

/// Validate a spec that is about to be created.
pub fn validate_create(new: &OpenStackClusterSpec) -> Result<(), ViolationList> {
    let violations = rules::walk(CREATE_RULES, None, new);
    debug!(violations = violations.len(), "Create validation finished");
    violations.into_result()
}

/// Validate the transition from `old`, the last accepted spec, to `new`.
pub fn validate_update(
    old: &OpenStackClusterSpec,
    new: &OpenStackClusterSpec,
) -> Result<(), ViolationList> {
    let violations = rules::walk(UPDATE_RULES, Some(old), new);
    debug!(violations = violations.len(), "Update validation finished");
    violations.into_result()
}

/// Deletion is never validated.
pub fn validate_delete(_old: &OpenStackClusterSpec) -> Result<(), ViolationList> {
    Ok(())
}

impl OpenStackCluster {
    /// Validate this resource as a new object.
    pub fn validate_create(&self) -> Result<(), ViolationList> {
        validate_create(&self.spec)
    }

    /// Validate this resource as the replacement of `old`.
    pub fn validate_update(&self, old: &OpenStackCluster) -> Result<(), ViolationList> {
        validate_update(&old.spec, &self.spec)
    }

    /// Validate the deletion of this resource.
    pub fn validate_delete(&self) -> Result<(), ViolationList> {
        validate_delete(&self.spec)
    }
}
