//! Immutability validation policy.
//!
//! Tier 2 (Update): Only enforced on UPDATE operations
//!
//! Validates:
//! - spec.identityRef cannot be removed once set
//! - spec.identityRef.kind stays "Secret"
//! - spec.apiServerLoadBalancer.allowedCidrs only grows

use super::{ValidationContext, ValidationResult};

/// Reason reported when an update is rejected
pub const REASON_INVALID_UPDATE: &str = "InvalidUpdate";

/// Validate immutability constraints on UPDATE operations
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    let old = match ctx.old_resource {
        Some(r) => r,
        None => return ValidationResult::allowed(), // Not an UPDATE
    };

    ValidationResult::from_outcome(ctx.resource.validate_update(old), REASON_INVALID_UPDATE)
}
