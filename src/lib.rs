//! openstack-cluster-webhook library crate
//!
//! Admission validation for `OpenStackCluster` resources: the CRD types, the
//! create/update rule engine and the webhook and health servers around it.

pub mod config;
pub mod crd;
pub mod health;
pub mod validation;
pub mod webhooks;

pub use config::{ConfigError, WebhookConfig};
pub use health::HealthState;
pub use validation::{Violation, ViolationKind, ViolationList, validate_create, validate_update};
pub use webhooks::{VALIDATE_PATH, WebhookError, run_webhook_server};
