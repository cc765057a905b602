//! Admission webhook server.
//!
//! Provides the HTTPS endpoint the Kubernetes API server calls for
//! OpenStackCluster CREATE, UPDATE and DELETE requests.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration pointing at [`VALIDATE_PATH`]
//! 3. Mount the TLS certificate secret to the webhook pod at /etc/webhook/certs/

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::WebhookConfig;
use crate::crd::OpenStackCluster;
use crate::health::{HealthState, Metrics};
use crate::webhooks::policies::{ValidationContext, validate_all};

/// Path the ValidatingWebhookConfiguration must point at
pub const VALIDATE_PATH: &str = "/validate-infrastructure-cluster-x-k8s-io-v1alpha6-openstackcluster";

/// Shared state for webhook handlers
pub struct WebhookState {
    /// Readiness and admission metrics
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

/// Label value for an admission operation
fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason(
    request: &AdmissionRequest<OpenStackCluster>,
    message: &str,
    reason: &str,
) -> AdmissionResponse {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request).deny(full_message)
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_PATH, post(validate_openstackcluster))
        .with_state(state)
}

/// Decide a single admission request and record metrics for it
pub fn admit(
    state: &WebhookState,
    request: &AdmissionRequest<OpenStackCluster>,
) -> AdmissionResponse {
    let started = Instant::now();
    let operation = operation_name(&request.operation);
    let uid = &request.uid;

    debug!(
        uid = %uid,
        operation = operation,
        namespace = ?request.namespace,
        name = %request.name,
        dry_run = request.dry_run,
        "Processing admission request"
    );

    let metrics = &state.health.metrics;
    let response = decide(request, metrics);
    metrics.record_admission(operation, response.allowed, started.elapsed().as_secs_f64());
    response
}

fn decide(request: &AdmissionRequest<OpenStackCluster>, metrics: &Metrics) -> AdmissionResponse {
    let uid = &request.uid;

    // DELETE operations are always allowed
    if request.operation == Operation::Delete {
        info!(uid = %uid, "Admission request allowed (DELETE)");
        return AdmissionResponse::from(request);
    }

    let Some(resource) = request.object.as_ref() else {
        error!(uid = %uid, "Missing object in request");
        return deny_with_reason(request, "Missing object in request", "InvalidRequest");
    };

    let old_resource = match request.operation {
        Operation::Update => request.old_object.as_ref(),
        _ => None,
    };

    if request.operation == Operation::Update && old_resource.is_none() {
        error!(uid = %uid, "Missing oldObject in UPDATE request");
        return deny_with_reason(
            request,
            "Missing oldObject in UPDATE request",
            "InvalidRequest",
        );
    }

    let ctx = match old_resource {
        Some(old) => ValidationContext::update(resource, old),
        None => ValidationContext::create(resource),
    };

    let result = validate_all(&ctx);

    if !result.allowed {
        for violation in &result.violations {
            metrics.record_violation(&violation.field, violation.kind);
        }
        let reason = result
            .reason
            .unwrap_or_else(|| "ValidationFailed".to_string());
        let message = result
            .message
            .unwrap_or_else(|| "Validation failed".to_string());
        warn!(
            uid = %uid,
            reason = %reason,
            violations = result.violations.len(),
            message = %message,
            "Admission request denied"
        );
        return deny_with_reason(request, &message, &reason);
    }

    info!(uid = %uid, "Admission request allowed");
    AdmissionResponse::from(request)
}

/// OpenStackCluster admission webhook handler
async fn validate_openstackcluster(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<OpenStackCluster>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<OpenStackCluster> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let response = admit(&state, &request);
    (StatusCode::OK, Json(response.into_review()))
}

/// Errors that can occur when running the webhook server
#[derive(Debug, Error)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Run the webhook server with TLS
///
/// Serves [`VALIDATE_PATH`] on the configured port. The health state is
/// marked ready once the certificates have been loaded.
pub async fn run_webhook_server(
    health: Arc<HealthState>,
    config: &WebhookConfig,
) -> Result<(), WebhookError> {
    let state = Arc::new(WebhookState::new(health.clone()));
    let app = create_webhook_router(state);

    let tls = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    info!(port = config.webhook_port, path = VALIDATE_PATH, "Webhook server listening with TLS");
    health.set_ready(true).await;

    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
