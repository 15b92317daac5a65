//! Point access check: does a principal's grant cover one specific record?
//!
//! Re-derived straight from the grant rather than going through a full
//! [`resolve_scope`](crate::resolve::resolve_scope), so checking a single
//! object never pays for expanding the whole tree.

use crate::grant::ScopeGrant;
use crate::record::Scoped;
use crate::tree::OrgTree;

/// True when any populated reference on the record is covered by the grant,
/// directly or through a granted ancestor. Superusers always pass; records
/// with no populated reference fail closed for everyone else.
pub fn can_access<T: Scoped>(grant: &ScopeGrant, tree: &OrgTree, record: &T) -> bool {
    if grant.is_superuser {
        return true;
    }

    if let Some(org) = record.organization() {
        if grant.organizations.contains(&org) {
            return true;
        }
    }

    if let Some(sub) = record.subdivision() {
        if grant.subdivisions.contains(&sub) {
            return true;
        }
        if let Some(org) = tree.organization_of(sub) {
            if grant.organizations.contains(&org) {
                return true;
            }
        }
    }

    if let Some(dept) = record.department() {
        if grant.departments.contains(&dept) {
            return true;
        }
        if let Some((sub, org)) = tree.ancestors_of(dept) {
            if grant.subdivisions.contains(&sub) || grant.organizations.contains(&org) {
                return true;
            }
        }
    }

    false
}
