//! Webhook module for validating OpenStackCluster admission requests.
//!
//! This module provides a ValidatingAdmissionWebhook with tiered validation policies:
//! - Tier 1 (Create): Structural checks on new objects
//! - Tier 2 (Update): Immutability checks against the previous object

pub mod policies;
mod server;

pub use policies::{ValidationContext, ValidationResult};
pub use server::{
    VALIDATE_PATH, WebhookError, WebhookState, admit, create_webhook_router, run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
