//! Validation policies for OpenStackCluster admission webhooks.
//!
//! Policies are organized into tiers:
//! - Tier 1 (Create): Structural checks on a new object
//! - Tier 2 (Update): Immutability checks against the last accepted object
//!
//! Structural checks are not repeated on UPDATE.

pub mod immutability;
pub mod structural;

use crate::crd::OpenStackCluster;
use crate::validation::{Violation, ViolationList};

/// Result of a validation check
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub allowed: bool,
    /// Reason for denial (if not allowed)
    pub reason: Option<String>,
    /// Detailed message (if not allowed)
    pub message: Option<String>,
    /// Every violation behind a denial
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
            violations: Vec::new(),
        }
    }

    /// Map a validator outcome onto a result, denying with `reason` on violations.
    pub fn from_outcome(outcome: Result<(), ViolationList>, reason: &str) -> Self {
        match outcome {
            Ok(()) => Self::allowed(),
            Err(list) => Self {
                allowed: false,
                reason: Some(reason.to_string()),
                message: Some(list.to_string()),
                violations: list.into_vec(),
            },
        }
    }
}

/// Context for validation
pub struct ValidationContext<'a> {
    /// The resource being validated
    pub resource: &'a OpenStackCluster,
    /// The old resource (for UPDATE operations)
    pub old_resource: Option<&'a OpenStackCluster>,
}

impl<'a> ValidationContext<'a> {
    /// Context for a CREATE request
    pub fn create(resource: &'a OpenStackCluster) -> Self {
        Self {
            resource,
            old_resource: None,
        }
    }

    /// Context for an UPDATE request replacing `old_resource`
    pub fn update(resource: &'a OpenStackCluster, old_resource: &'a OpenStackCluster) -> Self {
        Self {
            resource,
            old_resource: Some(old_resource),
        }
    }

    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_resource.is_some()
    }
}

/// Run the policies for the operation in `ctx`
pub fn validate_all(ctx: &ValidationContext<'_>) -> ValidationResult {
    if ctx.is_update() {
        immutability::validate(ctx)
    } else {
        structural::validate(ctx)
    }
}
