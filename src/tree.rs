//! Organization containment tree — a read-only snapshot supplied by the caller.
//!
//! Three levels, strict containment: Organization → Subdivision → Department.
//! The snapshot is validated eagerly at construction because every other
//! component trusts the parent links; a dangling or inconsistent link would
//! silently corrupt scope results downstream.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ScopeError;

fn reject(reason: String) -> ScopeError {
    warn!(%reason, "rejecting tree snapshot");
    ScopeError::InvalidTreeShape(reason)
}

/// Identifier of an organization (tree root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgId(pub u64);

/// Identifier of a structural subdivision (middle level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubdivisionId(pub u64);

/// Identifier of a department (leaf level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepartmentId(pub u64);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org:{}", self.0)
    }
}

impl fmt::Display for SubdivisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subdivision:{}", self.0)
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "department:{}", self.0)
    }
}

/// Input row for a subdivision: its id plus the owning organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionNode {
    pub id: SubdivisionId,
    pub organization: OrgId,
}

/// Input row for a department.
///
/// `organization` is the denormalized reference the source systems carry; it
/// must equal the organization reached through `subdivision`. Validation
/// rejects snapshots where the two disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentNode {
    pub id: DepartmentId,
    pub subdivision: SubdivisionId,
    pub organization: OrgId,
}

/// Validated containment tree with downward indexes.
///
/// Only constructible through [`OrgTree::new`], so holding one means the
/// shape invariants were checked.
#[derive(Debug, Clone, Default)]
pub struct OrgTree {
    organizations: BTreeSet<OrgId>,
    subdivision_parent: BTreeMap<SubdivisionId, OrgId>,
    department_parent: BTreeMap<DepartmentId, SubdivisionId>,
    org_subdivisions: BTreeMap<OrgId, BTreeSet<SubdivisionId>>,
    subdivision_departments: BTreeMap<SubdivisionId, BTreeSet<DepartmentId>>,
}

impl OrgTree {
    /// Build and validate a tree snapshot.
    ///
    /// Fails with [`ScopeError::InvalidTreeShape`] on duplicate ids, dangling
    /// parent references, or a department whose denormalized organization
    /// does not match its subdivision's owner. The tree is never repaired or
    /// guessed at — a broken snapshot is an upstream data problem.
    pub fn new(
        organizations: impl IntoIterator<Item = OrgId>,
        subdivisions: impl IntoIterator<Item = SubdivisionNode>,
        departments: impl IntoIterator<Item = DepartmentNode>,
    ) -> Result<Self, ScopeError> {
        let mut tree = OrgTree::default();

        for org in organizations {
            if !tree.organizations.insert(org) {
                return Err(reject(format!(
                    "duplicate organization {org}"
                )));
            }
        }

        for sub in subdivisions {
            if !tree.organizations.contains(&sub.organization) {
                return Err(reject(format!(
                    "{} references missing {}",
                    sub.id, sub.organization
                )));
            }
            if tree.subdivision_parent.insert(sub.id, sub.organization).is_some() {
                return Err(reject(format!(
                    "duplicate subdivision {}",
                    sub.id
                )));
            }
            tree.org_subdivisions
                .entry(sub.organization)
                .or_default()
                .insert(sub.id);
        }

        for dept in departments {
            let Some(&owner) = tree.subdivision_parent.get(&dept.subdivision) else {
                return Err(reject(format!(
                    "{} references missing {}",
                    dept.id, dept.subdivision
                )));
            };
            if owner != dept.organization {
                return Err(reject(format!(
                    "{} declares {} but its {} belongs to {}",
                    dept.id, dept.organization, dept.subdivision, owner
                )));
            }
            if tree.department_parent.insert(dept.id, dept.subdivision).is_some() {
                return Err(reject(format!(
                    "duplicate department {}",
                    dept.id
                )));
            }
            tree.subdivision_departments
                .entry(dept.subdivision)
                .or_default()
                .insert(dept.id);
        }

        Ok(tree)
    }

    pub fn contains_organization(&self, org: OrgId) -> bool {
        self.organizations.contains(&org)
    }

    /// Owning organization of a subdivision, if the subdivision exists.
    pub fn organization_of(&self, subdivision: SubdivisionId) -> Option<OrgId> {
        self.subdivision_parent.get(&subdivision).copied()
    }

    /// Parent subdivision of a department, if the department exists.
    pub fn subdivision_of(&self, department: DepartmentId) -> Option<SubdivisionId> {
        self.department_parent.get(&department).copied()
    }

    /// Full ancestor pair of a department: (subdivision, organization).
    pub fn ancestors_of(&self, department: DepartmentId) -> Option<(SubdivisionId, OrgId)> {
        let sub = self.subdivision_of(department)?;
        let org = self.organization_of(sub)?;
        Some((sub, org))
    }

    /// Subdivisions directly under an organization.
    pub fn subdivisions_of(&self, org: OrgId) -> impl Iterator<Item = SubdivisionId> + '_ {
        self.org_subdivisions
            .get(&org)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Departments directly under a subdivision.
    pub fn departments_of(&self, subdivision: SubdivisionId) -> impl Iterator<Item = DepartmentId> + '_ {
        self.subdivision_departments
            .get(&subdivision)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn organizations(&self) -> impl Iterator<Item = OrgId> + '_ {
        self.organizations.iter().copied()
    }

    pub fn subdivisions(&self) -> impl Iterator<Item = SubdivisionId> + '_ {
        self.subdivision_parent.keys().copied()
    }

    pub fn departments(&self) -> impl Iterator<Item = DepartmentId> + '_ {
        self.department_parent.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}
