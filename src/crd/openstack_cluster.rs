//! OpenStackCluster Custom Resource Definition.
//!
//! Describes the infrastructure of a Cluster API workload cluster running on
//! OpenStack: the cloud credentials, the API server load balancer and an
//! optional bastion host. This crate only admits mutations of the resource;
//! the controller that acts on it lives elsewhere.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The only credential kind an `identityRef` may point at.
pub const IDENTITY_REF_KIND_SECRET: &str = "Secret";

/// OpenStackCluster is the infrastructure resource for a Cluster API cluster on OpenStack.
///
/// Example:
/// ```yaml
/// apiVersion: infrastructure.cluster.x-k8s.io/v1alpha6
/// kind: OpenStackCluster
/// metadata:
///   name: my-cluster
/// spec:
///   cloudName: openstack
///   identityRef:
///     kind: Secret
///     name: my-cluster-cloud-config
///   apiServerLoadBalancer:
///     enabled: true
///     allowedCidrs:
///       - 10.6.0.0/16
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha6",
    kind = "OpenStackCluster",
    plural = "openstackclusters",
    shortname = "osc",
    status = "OpenStackClusterStatus",
    namespaced,
    printcolumn = r#"{"name":"Cloud", "type":"string", "jsonPath":".spec.cloudName"}"#,
    printcolumn = r#"{"name":"Ready", "type":"boolean", "jsonPath":".status.ready"}"#,
    printcolumn = r#"{"name":"Bastion", "type":"string", "jsonPath":".status.bastion.name"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackClusterSpec {
    /// Name of the cloud to use from the clouds secret.
    #[serde(default)]
    pub cloud_name: String,

    /// Reference to the Secret holding the cloud credentials.
    /// May be added later, but never removed once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_ref: Option<OpenStackIdentityReference>,

    /// CIDR of the cluster network created for the nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_cidr: Option<String>,

    /// DNS nameservers for the node subnet.
    #[serde(default)]
    pub dns_nameservers: Vec<String>,

    /// ID of the external network providing floating IPs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_network_id: Option<String>,

    /// API server load balancer settings.
    #[serde(default)]
    pub api_server_load_balancer: APIServerLoadBalancer,

    /// Skip allocating a floating IP for the API server.
    #[serde(default, rename = "disableAPIServerFloatingIP")]
    pub disable_api_server_floating_ip: bool,

    /// Port the API server listens on (default: 6443).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server_port: Option<i32>,

    /// Let the controller manage security groups for the cluster.
    #[serde(default)]
    pub managed_security_groups: bool,

    /// Tags applied to every OpenStack resource created for the cluster.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Endpoint used to reach the control plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_endpoint: Option<APIEndpoint>,

    /// Optional jump host for reaching cluster nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bastion: Option<Bastion>,
}

/// Reference to the credentials used to talk to OpenStack.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackIdentityReference {
    /// Kind of the referenced object. Must be `Secret`.
    pub kind: String,

    /// Name of the referenced object.
    pub name: String,
}

impl OpenStackIdentityReference {
    /// Create a reference to a Secret.
    pub fn secret(name: impl Into<String>) -> Self {
        Self {
            kind: IDENTITY_REF_KIND_SECRET.to_string(),
            name: name.into(),
        }
    }
}

/// API server load balancer configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct APIServerLoadBalancer {
    /// Create a load balancer in front of the API server.
    #[serde(default)]
    pub enabled: bool,

    /// Additional ports exposed on the load balancer.
    #[serde(default)]
    pub additional_ports: Vec<i32>,

    /// Source ranges allowed to reach the API server.
    /// Entries may be added or reordered, never dropped.
    #[serde(default)]
    pub allowed_cidrs: Vec<String>,

    /// Octavia provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Host and port of an API endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct APIEndpoint {
    /// Hostname or IP address.
    pub host: String,

    /// Port number.
    pub port: i32,
}

/// Bastion host configuration. Every field may change freely.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bastion {
    /// Whether the bastion should exist.
    #[serde(default)]
    pub enabled: bool,

    /// Machine spec of the bastion instance.
    #[serde(default)]
    pub instance: OpenStackMachineSpec,

    /// Availability zone for the bastion instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

/// Subset of the machine spec used to describe the bastion instance.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackMachineSpec {
    /// Name of the cloud to use from the clouds secret.
    #[serde(default)]
    pub cloud_name: String,

    /// Flavor name.
    #[serde(default)]
    pub flavor: String,

    /// Image name.
    #[serde(default)]
    pub image: String,

    /// SSH key injected into the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_name: Option<String>,

    /// Tags applied to the instance.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Status of an OpenStackCluster, owned by the controller.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackClusterStatus {
    /// Infrastructure is ready for machines.
    #[serde(default)]
    pub ready: bool,

    /// Observed bastion instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bastion: Option<Instance>,

    /// Machine-readable terminal failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Human-readable terminal failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

/// An OpenStack server observed by the controller.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Server name.
    pub name: String,

    /// Server ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Server state (ACTIVE, BUILD, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Fixed IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Floating IP address.
    #[serde(default, rename = "floatingIP", skip_serializing_if = "Option::is_none")]
    pub floating_ip: Option<String>,
}
