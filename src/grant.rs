//! Direct scope grants held by a principal.
//!
//! A grant is the raw, persisted shape: three id-sets plus a superuser flag.
//! The core only reads grants; granting and revoking are write-side
//! operations owned by the embedding application.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::tree::{DepartmentId, OrgId, SubdivisionId};

/// Coarsest level at which a principal holds any direct grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Superuser,
    Organization,
    Subdivision,
    Department,
    None,
}

/// A principal's set of directly granted tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeGrant {
    /// Principal identifier. Opaque to the core.
    pub principal: String,
    pub organizations: BTreeSet<OrgId>,
    pub subdivisions: BTreeSet<SubdivisionId>,
    pub departments: BTreeSet<DepartmentId>,
    /// Superusers bypass scope resolution entirely and see every node.
    pub is_superuser: bool,
}

impl ScopeGrant {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            ..Default::default()
        }
    }

    /// A grant that sees everything.
    pub fn superuser(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            is_superuser: true,
            ..Default::default()
        }
    }

    pub fn grant_organization(mut self, org: OrgId) -> Self {
        self.organizations.insert(org);
        self
    }

    pub fn grant_subdivision(mut self, subdivision: SubdivisionId) -> Self {
        self.subdivisions.insert(subdivision);
        self
    }

    pub fn grant_department(mut self, department: DepartmentId) -> Self {
        self.departments.insert(department);
        self
    }

    /// True when the principal holds no direct grant at any level.
    pub fn is_empty(&self) -> bool {
        !self.is_superuser
            && self.organizations.is_empty()
            && self.subdivisions.is_empty()
            && self.departments.is_empty()
    }

    /// Classify the grant by its coarsest populated level.
    pub fn access_level(&self) -> AccessLevel {
        if self.is_superuser {
            AccessLevel::Superuser
        } else if !self.organizations.is_empty() {
            AccessLevel::Organization
        } else if !self.subdivisions.is_empty() {
            AccessLevel::Subdivision
        } else if !self.departments.is_empty() {
            AccessLevel::Department
        } else {
            AccessLevel::None
        }
    }
}
