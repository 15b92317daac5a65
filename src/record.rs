//! The `Scoped` capability and record filtering.
//!
//! A business record declares — in the type, not by runtime introspection —
//! which of the three tree references it carries. Filtering is a union test
//! across levels: a record qualifies through any single populated reference
//! that falls inside the scope. Records carrying no reference at any level
//! fail closed and are only visible to superusers.

use serde::{Deserialize, Serialize};

use crate::resolve::ResolvedScope;
use crate::tree::{DepartmentId, OrgId, SubdivisionId};

/// Capability trait for records that live somewhere in the org tree.
///
/// The default implementations return `None`, so a record type overrides
/// only the reference kinds it actually carries.
pub trait Scoped {
    fn organization(&self) -> Option<OrgId> {
        None
    }

    fn subdivision(&self) -> Option<SubdivisionId> {
        None
    }

    fn department(&self) -> Option<DepartmentId> {
        None
    }
}

/// Plain data shape for callers that hold references as loose ids rather
/// than a domain type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRefs {
    pub organization: Option<OrgId>,
    pub subdivision: Option<SubdivisionId>,
    pub department: Option<DepartmentId>,
}

impl Scoped for RecordRefs {
    fn organization(&self) -> Option<OrgId> {
        self.organization
    }

    fn subdivision(&self) -> Option<SubdivisionId> {
        self.subdivision
    }

    fn department(&self) -> Option<DepartmentId> {
        self.department
    }
}

/// Does one record fall inside a resolved scope?
pub fn matches_scope<T: Scoped>(record: &T, scope: &ResolvedScope) -> bool {
    if scope.unbounded {
        return true;
    }

    if let Some(org) = record.organization() {
        if scope.organizations.contains(&org) {
            return true;
        }
    }
    if let Some(sub) = record.subdivision() {
        if scope.subdivisions.contains(&sub) {
            return true;
        }
    }
    if let Some(dept) = record.department() {
        if scope.departments.contains(&dept) {
            return true;
        }
    }

    false
}

/// Keep only the records visible inside `scope`.
pub fn filter_scoped<T: Scoped>(
    records: impl IntoIterator<Item = T>,
    scope: &ResolvedScope,
) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| matches_scope(r, scope))
        .collect()
}
