//! Custom Resource Definitions (CRDs) for the OpenStackCluster admission webhook.
//!
//! - `OpenStackCluster`: Infrastructure cluster backed by an OpenStack cloud

mod openstack_cluster;

pub use openstack_cluster::*;
