//! Access decisions.

use bastion_core::{Filter, Record};

/// The result of evaluating one access rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow,
    Deny,
    /// Allowed only for records matching the filter.
    Conditional(Filter),
}

impl Decision {
    /// Resolve the decision against a concrete record.
    ///
    /// A conditional decision with no record to test cannot be satisfied and
    /// resolves to deny.
    pub fn permits(&self, record: Option<&Record>) -> bool {
        match self {
            Decision::Allow => true,
            Decision::Deny => false,
            Decision::Conditional(filter) => record.is_some_and(|r| filter.matches(r)),
        }
    }
}

/// How a read-side caller must constrain its query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAccess {
    Unrestricted,
    Denied,
    /// Merge this filter into the store query.
    Filtered(Filter),
}

impl From<Decision> for QueryAccess {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => QueryAccess::Unrestricted,
            Decision::Deny => QueryAccess::Denied,
            Decision::Conditional(filter) => QueryAccess::Filtered(filter),
        }
    }
}
