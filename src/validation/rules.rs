//! Declarative rule tables and the engine that walks them.
//!
//! A rule pairs a field path with a selector that reads the field out of a
//! spec and a [`RuleKind`] that decides how the old and new readings may
//! differ. Fields without a rule are unconstrained.

use crate::crd::{IDENTITY_REF_KIND_SECRET, OpenStackClusterSpec};

use super::comparators::{equal_value, is_subset_of, missing_from, one_way_presence};
use super::violation::{Violation, Violations};

/// A field read out of a spec snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldValue<'a> {
    /// The optional field is not set.
    Absent,
    /// A composite field is set.
    Present,
    /// A string leaf.
    Str(&'a str),
    /// A boolean leaf.
    Bool(bool),
    /// A list of strings.
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// `None` for [`FieldValue::Absent`], the value otherwise.
    pub fn present(self) -> Option<Self> {
        match self {
            FieldValue::Absent => None,
            value => Some(value),
        }
    }

    /// List contents; an absent list reads as empty.
    fn items(self) -> &'a [String] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }

    /// Human-readable rendering used in violation messages.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Absent => "<absent>".to_string(),
            FieldValue::Present => "<set>".to_string(),
            FieldValue::Str(value) => format!("{:?}", value),
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::List(items) => format!("{:?}", items),
        }
    }
}

/// Reads one field out of a spec.
pub type Selector = for<'a> fn(&'a OpenStackClusterSpec) -> FieldValue<'a>;

/// How a field may change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleKind {
    /// Absent to present is fine, present to absent is not.
    OneWayPresence,
    /// Whenever present in the new snapshot, must equal this value.
    Constant(&'static str),
    /// Old and new lists compared as sets must satisfy old ⊆ new.
    Superset,
    /// Old and new values must be equal.
    Immutable,
}

impl RuleKind {
    /// Whether the rule can be checked from a single snapshot.
    pub fn is_single_snapshot(self) -> bool {
        matches!(self, RuleKind::Constant(_))
    }
}

/// A declared rule for one field.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    /// Dotted path reported in violations.
    pub path: &'static str,
    /// Comparison applied to the field.
    pub kind: RuleKind,
    /// Reads the field.
    pub select: Selector,
}

impl FieldRule {
    /// Evaluate the rule. `old` is `None` on create, where only
    /// single-snapshot rules apply.
    pub fn evaluate(
        &self,
        old: Option<&OpenStackClusterSpec>,
        new: &OpenStackClusterSpec,
    ) -> Option<Violation> {
        let new_value = (self.select)(new);

        match self.kind {
            RuleKind::Constant(expected) => match new_value {
                FieldValue::Absent => None,
                FieldValue::Str(value) if equal_value(value, expected) => None,
                other => Some(Violation::structural(
                    self.path,
                    other.render(),
                    format!("must be {:?}", expected),
                )),
            },
            RuleKind::OneWayPresence => {
                let old_value = (self.select)(old?);
                if one_way_presence(old_value.present(), new_value.present()) {
                    None
                } else {
                    Some(Violation::immutability(
                        self.path,
                        format!("{} -> {}", old_value.render(), new_value.render()),
                        "cannot be removed once set",
                    ))
                }
            }
            RuleKind::Superset => {
                let old_items = (self.select)(old?).items();
                let new_items = new_value.items();
                if is_subset_of(old_items, new_items) {
                    None
                } else {
                    let dropped = missing_from(old_items, new_items);
                    Some(Violation::immutability(
                        self.path,
                        format!("{:?}", dropped),
                        "existing entries cannot be removed",
                    ))
                }
            }
            RuleKind::Immutable => {
                let old_value = (self.select)(old?);
                if equal_value(&old_value, &new_value) {
                    None
                } else {
                    Some(Violation::immutability(
                        self.path,
                        format!("{} -> {}", old_value.render(), new_value.render()),
                        "field is immutable",
                    ))
                }
            }
        }
    }
}

/// Walk `rules` in order and collect every violation.
///
/// With `old == None` only single-snapshot rules run.
pub fn walk(
    rules: &[FieldRule],
    old: Option<&OpenStackClusterSpec>,
    new: &OpenStackClusterSpec,
) -> Violations {
    let mut violations = Violations::new();
    for rule in rules {
        if old.is_none() && !rule.kind.is_single_snapshot() {
            continue;
        }
        if let Some(violation) = rule.evaluate(old, new) {
            violations.push(violation);
        }
    }
    violations
}

fn identity_ref(spec: &OpenStackClusterSpec) -> FieldValue<'_> {
    match spec.identity_ref {
        Some(_) => FieldValue::Present,
        None => FieldValue::Absent,
    }
}

fn identity_ref_kind(spec: &OpenStackClusterSpec) -> FieldValue<'_> {
    match &spec.identity_ref {
        Some(identity) => FieldValue::Str(&identity.kind),
        None => FieldValue::Absent,
    }
}

fn allowed_cidrs(spec: &OpenStackClusterSpec) -> FieldValue<'_> {
    FieldValue::List(&spec.api_server_load_balancer.allowed_cidrs)
}

/// Rules checked when a resource is created.
pub static CREATE_RULES: &[FieldRule] = &[FieldRule {
    path: "spec.identityRef.kind",
    kind: RuleKind::Constant(IDENTITY_REF_KIND_SECRET),
    select: identity_ref_kind,
}];

/// Rules checked when a resource is updated.
///
/// `identityRef.name`, `bastion` and `apiServerLoadBalancer.enabled` are
/// intentionally absent: they may change freely.
pub static UPDATE_RULES: &[FieldRule] = &[
    FieldRule {
        path: "spec.identityRef",
        kind: RuleKind::OneWayPresence,
        select: identity_ref,
    },
    FieldRule {
        path: "spec.identityRef.kind",
        kind: RuleKind::Constant(IDENTITY_REF_KIND_SECRET),
        select: identity_ref_kind,
    },
    FieldRule {
        path: "spec.apiServerLoadBalancer.allowedCidrs",
        kind: RuleKind::Superset,
        select: allowed_cidrs,
    },
];
