// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Property-based tests for openstack-cluster-webhook.
//!
//! Uses proptest to generate random specs and verify the admission invariants.

use proptest::prelude::*;

use openstack_cluster_webhook::crd::{
    Bastion, OpenStackClusterSpec, OpenStackIdentityReference, OpenStackMachineSpec,
};
use openstack_cluster_webhook::validation::comparators::is_subset_of;
use openstack_cluster_webhook::{validate_create, validate_update};

/// Strategy for generating IPv4 CIDR strings.
fn cidr() -> impl Strategy<Value = String> {
    (any::<[u8; 4]>(), 8..=32u8)
        .prop_map(|(octets, prefix)| {
            format!("{}.{}.{}.{}/{}", octets[0], octets[1], octets[2], octets[3], prefix)
        })
}

/// Strategy for generating CIDR lists, duplicates included.
fn cidr_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(cidr(), 0..6)
}

/// Strategy for generating identity kinds other than Secret.
fn non_secret_kind() -> impl Strategy<Value = String> {
    "[A-Za-z]{0,12}".prop_filter("must not be Secret", |kind| kind != "Secret")
}

/// Strategy for generating optional Secret identity references.
fn secret_identity() -> impl Strategy<Value = Option<OpenStackIdentityReference>> {
    prop::option::of("[a-z][a-z0-9-]{0,20}".prop_map(OpenStackIdentityReference::secret))
}

/// Strategy for generating optional bastions.
fn bastion() -> impl Strategy<Value = Option<Bastion>> {
    prop::option::of(
        (any::<bool>(), "[a-z]{1,8}", "[a-z]{1,8}", "[a-z]{1,8}").prop_map(
            |(enabled, cloud_name, image, flavor)| Bastion {
                enabled,
                instance: OpenStackMachineSpec {
                    cloud_name,
                    image,
                    flavor,
                    ..Default::default()
                },
                ..Default::default()
            },
        ),
    )
}

/// Strategy for generating well-formed specs.
fn valid_spec() -> impl Strategy<Value = OpenStackClusterSpec> {
    ("[a-z]{1,10}", secret_identity(), bastion(), any::<bool>(), cidr_list()).prop_map(
        |(cloud_name, identity_ref, bastion, enabled, cidrs)| {
            let mut spec = OpenStackClusterSpec {
                cloud_name,
                identity_ref,
                bastion,
                ..Default::default()
            };
            spec.api_server_load_balancer.enabled = enabled;
            spec.api_server_load_balancer.allowed_cidrs = cidrs;
            spec
        },
    )
}

proptest! {
    /// Property: create rejects any identity kind other than Secret.
    #[test]
    fn test_create_rejects_non_secret_kind(
        mut spec in valid_spec(),
        kind in non_secret_kind(),
    ) {
        spec.identity_ref = Some(OpenStackIdentityReference { kind, name: "foobar".to_string() });
        prop_assert!(validate_create(&spec).is_err());
    }

    /// Property: create accepts an absent or Secret identity.
    #[test]
    fn test_create_accepts_valid_specs(spec in valid_spec()) {
        prop_assert!(validate_create(&spec).is_ok());
    }

    /// Property: removing the identity reference is always rejected.
    #[test]
    fn test_identity_removal_rejected(
        mut old in valid_spec(),
        mut new in valid_spec(),
        name in "[a-z]{1,10}",
    ) {
        old.identity_ref = Some(OpenStackIdentityReference::secret(name));
        new.identity_ref = None;
        let err = validate_update(&old, &new).unwrap_err();
        prop_assert!(err.contains_field("spec.identityRef"));
    }

    /// Property: adding a Secret identity reference is accepted.
    #[test]
    fn test_identity_addition_accepted(mut old in valid_spec(), name in "[a-z]{1,10}") {
        old.identity_ref = None;
        let mut new = old.clone();
        new.identity_ref = Some(OpenStackIdentityReference::secret(name));
        prop_assert!(validate_update(&old, &new).is_ok());
    }

    /// Property: adding an identity reference of any other kind is rejected.
    #[test]
    fn test_non_secret_identity_addition_rejected(
        mut old in valid_spec(),
        kind in non_secret_kind(),
    ) {
        old.identity_ref = None;
        let mut new = old.clone();
        new.identity_ref = Some(OpenStackIdentityReference { kind, name: "foobar".to_string() });
        let err = validate_update(&old, &new).unwrap_err();
        prop_assert_eq!(err.fields(), vec!["spec.identityRef.kind"]);
    }

    /// Property: the identity name and the bastion are freely mutable.
    #[test]
    fn test_mutable_fields_accepted(
        old in valid_spec(),
        name in "[a-z]{1,10}",
        new_bastion in bastion(),
    ) {
        let mut new = old.clone();
        if let Some(identity) = new.identity_ref.as_mut() {
            identity.name = name;
        }
        new.bastion = new_bastion;
        new.api_server_load_balancer.enabled = !old.api_server_load_balancer.enabled;
        prop_assert!(validate_update(&old, &new).is_ok());
    }

    /// Property: any reordered superset of the old CIDRs is accepted.
    #[test]
    fn test_cidr_superset_accepted(
        old in valid_spec(),
        extra in cidr_list(),
        shuffle in any::<prop::sample::Index>(),
    ) {
        let mut new = old.clone();
        let mut cidrs = old.api_server_load_balancer.allowed_cidrs.clone();
        cidrs.extend(extra);
        if !cidrs.is_empty() {
            let pivot = shuffle.index(cidrs.len());
            cidrs.rotate_left(pivot);
        }
        new.api_server_load_balancer.allowed_cidrs = cidrs;
        prop_assert!(validate_update(&old, &new).is_ok());
    }

    /// Property: dropping an old CIDR is rejected.
    #[test]
    fn test_cidr_removal_rejected(
        old in valid_spec(),
        dropped in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!old.api_server_load_balancer.allowed_cidrs.is_empty());
        let cidrs = &old.api_server_load_balancer.allowed_cidrs;
        let victim = cidrs[dropped.index(cidrs.len())].clone();

        let mut new = old.clone();
        new.api_server_load_balancer.allowed_cidrs.retain(|c| *c != victim);

        let err = validate_update(&old, &new).unwrap_err();
        prop_assert!(err.contains_field("spec.apiServerLoadBalancer.allowedCidrs"));
        prop_assert!(err.to_string().contains(&victim));
    }

    /// Property: the update decision matches the subset relation on CIDRs.
    #[test]
    fn test_cidr_rule_matches_subset(old in valid_spec(), new_cidrs in cidr_list()) {
        let mut new = old.clone();
        new.api_server_load_balancer.allowed_cidrs = new_cidrs;
        let subset = is_subset_of(
            &old.api_server_load_balancer.allowed_cidrs,
            &new.api_server_load_balancer.allowed_cidrs,
        );
        prop_assert_eq!(validate_update(&old, &new).is_ok(), subset);
    }

    /// Property: validation is deterministic.
    #[test]
    fn test_update_deterministic(old in valid_spec(), new in valid_spec()) {
        prop_assert_eq!(validate_update(&old, &new), validate_update(&old, &new));
    }
}
