//! Advisory detection of grants already implied by a coarser grant.
//!
//! Purely a reporting aid for grant-editing screens: findings never block an
//! edit and the core never removes anything on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grant::ScopeGrant;
use crate::tree::{DepartmentId, OrgId, OrgTree, SubdivisionId};

/// One redundant direct grant and the coarser grant that implies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Redundancy {
    SubdivisionCoveredByOrganization {
        subdivision: SubdivisionId,
        organization: OrgId,
    },
    DepartmentCoveredBySubdivision {
        department: DepartmentId,
        subdivision: SubdivisionId,
    },
    DepartmentCoveredByOrganization {
        department: DepartmentId,
        organization: OrgId,
    },
}

impl fmt::Display for Redundancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redundancy::SubdivisionCoveredByOrganization { subdivision, organization } => {
                write!(f, "{subdivision} is already covered by granted {organization}")
            }
            Redundancy::DepartmentCoveredBySubdivision { department, subdivision } => {
                write!(f, "{department} is already covered by granted {subdivision}")
            }
            Redundancy::DepartmentCoveredByOrganization { department, organization } => {
                write!(f, "{department} is already covered by granted {organization}")
            }
        }
    }
}

/// Report every direct grant implied by a coarser one.
///
/// Output order is deterministic: subdivisions first, then departments, each
/// in id order; a department covered both ways yields two findings.
pub fn find_redundant(grant: &ScopeGrant, tree: &OrgTree) -> Vec<Redundancy> {
    let mut findings = Vec::new();

    for &sub in &grant.subdivisions {
        if let Some(org) = tree.organization_of(sub) {
            if grant.organizations.contains(&org) {
                findings.push(Redundancy::SubdivisionCoveredByOrganization {
                    subdivision: sub,
                    organization: org,
                });
            }
        }
    }

    for &dept in &grant.departments {
        if let Some((sub, org)) = tree.ancestors_of(dept) {
            if grant.subdivisions.contains(&sub) {
                findings.push(Redundancy::DepartmentCoveredBySubdivision {
                    department: dept,
                    subdivision: sub,
                });
            }
            if grant.organizations.contains(&org) {
                findings.push(Redundancy::DepartmentCoveredByOrganization {
                    department: dept,
                    organization: org,
                });
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DepartmentNode, SubdivisionNode};

    fn tree() -> OrgTree {
        OrgTree::new(
            [OrgId(1)],
            [SubdivisionNode { id: SubdivisionId(10), organization: OrgId(1) }],
            [DepartmentNode {
                id: DepartmentId(100),
                subdivision: SubdivisionId(10),
                organization: OrgId(1),
            }],
        )
        .unwrap()
    }

    #[test]
    fn subdivision_under_granted_organization() {
        let grant = ScopeGrant::new("u")
            .grant_organization(OrgId(1))
            .grant_subdivision(SubdivisionId(10));

        let findings = find_redundant(&grant, &tree());
        assert_eq!(
            findings,
            vec![Redundancy::SubdivisionCoveredByOrganization {
                subdivision: SubdivisionId(10),
                organization: OrgId(1),
            }]
        );
        assert_eq!(
            findings[0].to_string(),
            "subdivision:10 is already covered by granted org:1"
        );
    }

    #[test]
    fn department_covered_both_ways_yields_two_findings() {
        let grant = ScopeGrant::new("u")
            .grant_organization(OrgId(1))
            .grant_subdivision(SubdivisionId(10))
            .grant_department(DepartmentId(100));

        let findings = find_redundant(&grant, &tree());
        assert_eq!(findings.len(), 3);
        assert!(findings.contains(&Redundancy::DepartmentCoveredBySubdivision {
            department: DepartmentId(100),
            subdivision: SubdivisionId(10),
        }));
        assert!(findings.contains(&Redundancy::DepartmentCoveredByOrganization {
            department: DepartmentId(100),
            organization: OrgId(1),
        }));
    }

    #[test]
    fn finding_wire_shape_is_tagged_snake_case() {
        let finding = Redundancy::SubdivisionCoveredByOrganization {
            subdivision: SubdivisionId(10),
            organization: OrgId(1),
        };
        let json = serde_json::to_value(finding).unwrap();
        assert_eq!(json["kind"], "subdivision_covered_by_organization");
        assert_eq!(json["subdivision"], 10);
    }

    #[test]
    fn non_overlapping_grant_is_clean() {
        let grant = ScopeGrant::new("u")
            .grant_subdivision(SubdivisionId(10))
            .grant_organization(OrgId(9));
        assert!(find_redundant(&grant, &tree()).is_empty());
    }
}
