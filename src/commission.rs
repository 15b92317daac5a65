//! Commissions attached to one tree node, and the nearest-enclosing lookup.
//!
//! A commission is anchored at exactly one level — the type makes more than
//! one attachment unrepresentable. Lookup walks most-specific-first:
//! department, then subdivision, then organization; a miss at every level is
//! a data-completeness gap for the caller, never an error.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::record::Scoped;
use crate::tree::{DepartmentId, OrgId, SubdivisionId};

/// Identifier of a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommissionId(pub u64);

/// The single tree node a commission is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionScope {
    Organization(OrgId),
    Subdivision(SubdivisionId),
    Department(DepartmentId),
}

/// Role of a commission member. Chair and secretary are singleton roles:
/// at most one active holder each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionRole {
    Chair,
    Secretary,
    Member,
}

/// One entry in a commission's ordered membership list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionMember {
    pub employee_id: u64,
    pub name: String,
    pub role: CommissionRole,
    pub is_active: bool,
}

/// A commission with its anchor, purpose tag, and membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub name: String,
    /// Purpose tag, e.g. "safety". Lookup only considers commissions whose
    /// category matches.
    pub category: String,
    pub scope: CommissionScope,
    pub is_active: bool,
    pub members: Vec<CommissionMember>,
}

impl Commission {
    fn first_active(&self, role: CommissionRole) -> Option<&CommissionMember> {
        self.members.iter().find(|m| m.is_active && m.role == role)
    }

    /// Active chair, if any.
    pub fn chair(&self) -> Option<&CommissionMember> {
        self.first_active(CommissionRole::Chair)
    }

    /// Active secretary, if any.
    pub fn secretary(&self) -> Option<&CommissionMember> {
        self.first_active(CommissionRole::Secretary)
    }

    /// Active ordinary members, in list order.
    pub fn regular_members(&self) -> impl Iterator<Item = &CommissionMember> {
        self.members
            .iter()
            .filter(|m| m.is_active && m.role == CommissionRole::Member)
    }

    /// Singleton roles currently held by more than one active member.
    ///
    /// Advisory, like redundancy findings: the core reports the violation
    /// and leaves the data alone.
    pub fn singleton_role_conflicts(&self) -> Vec<CommissionRole> {
        [CommissionRole::Chair, CommissionRole::Secretary]
            .into_iter()
            .filter(|&role| {
                self.members
                    .iter()
                    .filter(|m| m.is_active && m.role == role)
                    .count()
                    > 1
            })
            .collect()
    }
}

/// Find the commission nearest to the anchor record, most specific first.
///
/// Search order: the anchor's department, then a subdivision-attached
/// commission on the anchor's subdivision, then an organization-attached one
/// on the anchor's organization. Only active commissions with a matching
/// category are considered; the first hit wins.
pub fn find_nearest<'a, T: Scoped>(
    anchor: &T,
    registry: &'a [Commission],
    category: &str,
) -> Option<&'a Commission> {
    let candidates = || {
        registry
            .iter()
            .filter(|c| c.is_active && c.category == category)
    };

    if let Some(dept) = anchor.department() {
        if let Some(hit) =
            candidates().find(|c| c.scope == CommissionScope::Department(dept))
        {
            debug!(commission = %hit.name, %dept, "found commission at department level");
            return Some(hit);
        }
    }

    if let Some(sub) = anchor.subdivision() {
        if let Some(hit) =
            candidates().find(|c| c.scope == CommissionScope::Subdivision(sub))
        {
            debug!(commission = %hit.name, %sub, "found commission at subdivision level");
            return Some(hit);
        }
    }

    if let Some(org) = anchor.organization() {
        if let Some(hit) =
            candidates().find(|c| c.scope == CommissionScope::Organization(org))
        {
            debug!(commission = %hit.name, %org, "found commission at organization level");
            return Some(hit);
        }
    }

    warn!(category, "no commission found at any level");
    None
}
