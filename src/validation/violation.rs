//! Violations and their aggregation.
//!
//! Validators never stop at the first broken rule. Every rule pushes its
//! finding into a [`Violations`] collector and the caller gets the complete
//! list back as a single [`ViolationList`] error.

use std::fmt;

use thiserror::Error;

/// Category of a violation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ViolationKind {
    /// A single-snapshot invariant is broken.
    Structural,
    /// A field changed in a way the update rules forbid.
    Immutability,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Structural => write!(f, "Structural"),
            ViolationKind::Immutability => write!(f, "Immutability"),
        }
    }
}

/// A single reason why a resource or a transition was rejected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{field}: {reason} (got {value})")]
pub struct Violation {
    /// Category of the violation.
    pub kind: ViolationKind,
    /// Dotted path of the offending field, e.g. `spec.identityRef.kind`.
    pub field: String,
    /// Rendering of the offending value(s).
    pub value: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Violation {
    /// Create a structural violation.
    pub fn structural(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Structural,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an immutability violation.
    pub fn immutability(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Immutability,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Collector used while walking a rule table.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, violation: Violation) {
        tracing::debug!(
            field = %violation.field,
            kind = %violation.kind,
            value = %violation.value,
            "Rule violated"
        );
        self.items.push(violation);
    }

    /// Whether any violation has been recorded.
    pub fn has_violations(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finish the walk: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ViolationList> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ViolationList { items: self.items })
        }
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        for violation in iter {
            self.push(violation);
        }
    }
}

/// Every violation found for one request, in rule declaration order.
///
/// Only ever constructed non-empty.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{}", render(&self.items))]
pub struct ViolationList {
    items: Vec<Violation>,
}

impl ViolationList {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a list produced by a validator.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the violations in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.items.iter()
    }

    /// Paths of the offending fields, in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.items.iter().map(|v| v.field.as_str()).collect()
    }

    /// Whether some violation names the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.items.iter().any(|v| v.field == field)
    }

    /// Consume the list.
    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn render(items: &[Violation]) -> String {
    match items {
        [single] => single.to_string(),
        _ => format!(
            "[{}]",
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
