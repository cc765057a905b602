//! Structural validation policy.
//!
//! Tier 1 (Create): Only enforced on CREATE operations
//!
//! Validates:
//! - spec.identityRef.kind is "Secret" when an identityRef is set

use super::{ValidationContext, ValidationResult};

/// Reason reported when a new object is rejected
pub const REASON_INVALID_SPEC: &str = "InvalidSpec";

/// Validate a new resource
pub fn validate(ctx: &ValidationContext<'_>) -> ValidationResult {
    ValidationResult::from_outcome(ctx.resource.validate_create(), REASON_INVALID_SPEC)
}
