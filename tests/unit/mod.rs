// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for openstack-cluster-webhook.
//!
//! These tests exercise the public validation API and the webhook policies
//! without a Kubernetes cluster.

#[path = "../common/mod.rs"]
mod common;

mod update_tests {
    use crate::common::fixtures::OpenStackClusterBuilder;

    struct Case {
        name: &'static str,
        old: OpenStackClusterBuilder,
        new: OpenStackClusterBuilder,
        want_err: bool,
    }

    fn cases() -> Vec<Case> {
        vec![
            Case {
                name: "identityRef.kind must always be Secret",
                old: OpenStackClusterBuilder::default().identity_ref("Secret", "foobar"),
                new: OpenStackClusterBuilder::default().identity_ref("foobar", "foobar"),
                want_err: true,
            },
            Case {
                name: "changing identityRef.name is allowed",
                old: OpenStackClusterBuilder::default().identity_ref("Secret", "foobar"),
                new: OpenStackClusterBuilder::default().identity_ref("Secret", "foobarbaz"),
                want_err: false,
            },
            Case {
                name: "identityRef can be set if it was unset",
                old: OpenStackClusterBuilder::default(),
                new: OpenStackClusterBuilder::default().identity_ref("Secret", "foobar"),
                want_err: false,
            },
            Case {
                name: "adding a non-Secret identityRef is rejected",
                old: OpenStackClusterBuilder::default(),
                new: OpenStackClusterBuilder::default().identity_ref("foobar", "foobar"),
                want_err: true,
            },
            Case {
                name: "identityRef must not be removed",
                old: OpenStackClusterBuilder::default().identity_ref("Secret", "foobar"),
                new: OpenStackClusterBuilder::default(),
                want_err: true,
            },
            Case {
                name: "changing the bastion is allowed",
                old: OpenStackClusterBuilder::default()
                    .bastion(true, "foobar", "foobar", "minimal")
                    .status_bastion("foobar"),
                new: OpenStackClusterBuilder::default().bastion(
                    true,
                    "foobarbaz",
                    "foobarbaz",
                    "medium",
                ),
                want_err: false,
            },
            Case {
                name: "disabling the bastion is allowed",
                old: OpenStackClusterBuilder::default().bastion(true, "foobar", "foobar", "minimal"),
                new: OpenStackClusterBuilder::default().bastion(false, "foobar", "foobar", "minimal"),
                want_err: false,
            },
            Case {
                name: "adding allowedCidrs is allowed",
                old: OpenStackClusterBuilder::default()
                    .allowed_cidrs(&["0.0.0.0/0", "192.168.10.0/24"]),
                new: OpenStackClusterBuilder::default().allowed_cidrs(&[
                    "0.0.0.0/0",
                    "192.168.10.0/24",
                    "10.6.0.0/16",
                ]),
                want_err: false,
            },
            Case {
                name: "removing an allowedCidrs entry is rejected",
                old: OpenStackClusterBuilder::default()
                    .allowed_cidrs(&["0.0.0.0/0", "192.168.10.0/24"]),
                new: OpenStackClusterBuilder::default().allowed_cidrs(&["192.168.10.0/24"]),
                want_err: true,
            },
            Case {
                name: "toggling the load balancer is allowed",
                old: OpenStackClusterBuilder::default().allowed_cidrs(&["0.0.0.0/0"]),
                new: OpenStackClusterBuilder::default()
                    .allowed_cidrs(&["0.0.0.0/0"])
                    .load_balancer_enabled(false),
                want_err: false,
            },
            Case {
                name: "changing the cloud name is allowed",
                old: OpenStackClusterBuilder::default().cloud_name("foobar"),
                new: OpenStackClusterBuilder::default().cloud_name("foobarbaz"),
                want_err: false,
            },
        ]
    }

    #[test]
    fn test_validate_update() {
        for case in cases() {
            let old = case.old.build();
            let new = case.new.build();
            let result = new.validate_update(&old);
            assert_eq!(
                result.is_err(),
                case.want_err,
                "{}: got {:?}",
                case.name,
                result
            );
        }
    }
}

mod create_tests {
    use crate::common::fixtures::{OpenStackClusterBuilder, minimal_cluster, secret_cluster};

    #[test]
    fn test_identity_ref_with_correct_spec() {
        assert!(secret_cluster("test", "foobar").validate_create().is_ok());
    }

    #[test]
    fn test_identity_ref_with_faulty_spec() {
        let cluster = OpenStackClusterBuilder::default()
            .identity_ref("foobar", "foobar")
            .build();
        let err = cluster.validate_create().unwrap_err();
        assert_eq!(err.fields(), vec!["spec.identityRef.kind"]);
        assert!(err.to_string().contains("\"foobar\""));
    }

    #[test]
    fn test_without_identity_ref() {
        assert!(minimal_cluster("test").validate_create().is_ok());
    }

    #[test]
    fn test_delete_is_never_rejected() {
        let cluster = OpenStackClusterBuilder::default()
            .identity_ref("foobar", "foobar")
            .build();
        assert!(cluster.validate_delete().is_ok());
    }
}

mod policy_tests {
    use crate::common::fixtures::OpenStackClusterBuilder;
    use openstack_cluster_webhook::validation::ViolationKind;
    use openstack_cluster_webhook::webhooks::ValidationContext;
    use openstack_cluster_webhook::webhooks::policies::validate_all;

    #[test]
    fn test_create_runs_structural_policy() {
        let resource = OpenStackClusterBuilder::default()
            .identity_ref("foobar", "foobar")
            .build();
        let ctx = ValidationContext::create(&resource);
        assert!(!ctx.is_update());

        let result = validate_all(&ctx);
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some("InvalidSpec"));
        assert_eq!(result.violations[0].kind, ViolationKind::Structural);
    }

    #[test]
    fn test_update_runs_immutability_policy() {
        let old = OpenStackClusterBuilder::default()
            .identity_ref("Secret", "foobar")
            .allowed_cidrs(&["0.0.0.0/0", "192.168.10.0/24"])
            .build();
        let new = OpenStackClusterBuilder::default()
            .identity_ref("foobar", "foobar")
            .allowed_cidrs(&["10.6.0.0/16"])
            .build();
        let ctx = ValidationContext::update(&new, &old);
        assert!(ctx.is_update());

        let result = validate_all(&ctx);
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some("InvalidUpdate"));
        let fields: Vec<&str> = result.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "spec.identityRef.kind",
                "spec.apiServerLoadBalancer.allowedCidrs"
            ]
        );
        let message = result.message.unwrap();
        assert!(message.contains("0.0.0.0/0"));
        assert!(message.contains("192.168.10.0/24"));
    }
}

mod config_tests {
    use openstack_cluster_webhook::WebhookConfig;

    #[test]
    fn test_lookup_overrides_only_given_values() {
        let config = WebhookConfig::from_lookup(|name| match name {
            "WEBHOOK_PORT" => Some("8443".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.webhook_port, 8443);
        assert_eq!(config.health_port, WebhookConfig::default().health_port);
    }
}
