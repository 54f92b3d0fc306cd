// Recursion guard for schema traversal
//
// Tracks which object schemas are currently being expanded on the active
// descent path. A cycle in a schema graph has to close through an object
// schema, so only those are tracked; scalars and arrays are always allowed.

use std::collections::HashSet;

use crate::schema::inference::infer_type;
use crate::schema::types::{Fingerprint, SchemaNode, SchemaType};

/// Outcome of [`RecursionGuard::enter`].
#[must_use = "a visit that was entered must be handed back to `leave`"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// The node is already being expanded further up the path.
    Blocked,
    /// The node is exempt from tracking.
    Untracked,
    /// The node was marked active and must be released with `leave`.
    Marked(Fingerprint),
}

impl Visit {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Visit::Blocked)
    }
}

/// Set of node identities on the current descent path.
///
/// One guard belongs to one top-level traversal call.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    active: HashSet<Fingerprint>,
}

/// Returns true if the node is exempt from cycle tracking.
///
/// Runs type inference first so type-less object schemas are still tracked.
pub fn is_simple(node: &SchemaNode) -> bool {
    infer_type(node);
    node.effective_types().first() != Some(&SchemaType::Object)
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node` active unless it is already on the path.
    pub fn enter(&mut self, node: &SchemaNode) -> Visit {
        if is_simple(node) {
            return Visit::Untracked;
        }
        if self.active.insert(node.fingerprint) {
            Visit::Marked(node.fingerprint)
        } else {
            Visit::Blocked
        }
    }

    /// Releases a visit returned by [`RecursionGuard::enter`].
    pub fn leave(&mut self, visit: Visit) {
        if let Visit::Marked(fingerprint) = visit {
            self.active.remove(&fingerprint);
        }
    }

    /// Number of object schemas on the current path.
    pub fn depth(&self) -> usize {
        self.active.len()
    }
}
