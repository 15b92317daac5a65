//! Scope resolution: expanding direct grants into the full accessible node set.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grant::ScopeGrant;
use crate::tree::{DepartmentId, OrgId, OrgTree, SubdivisionId};

/// Fully expanded scope: every node the principal may see, at every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScope {
    pub organizations: BTreeSet<OrgId>,
    pub subdivisions: BTreeSet<SubdivisionId>,
    pub departments: BTreeSet<DepartmentId>,
    /// Set for superusers: filtering treats the scope as covering
    /// everything, including records that carry no tree reference at all.
    pub unbounded: bool,
}

/// Expand a grant downward through the containment tree.
///
/// Coarse grants imply fine access, never the reverse: an organization grant
/// pulls in all of its subdivisions and their departments; a subdivision
/// grant pulls in its departments; a department grant covers only itself.
/// A superuser is granted every node at every level.
///
/// Pure function of its inputs. An empty grant yields empty sets, never an
/// error. Callers wanting per-request memoization wrap this in a
/// [`ScopeCache`].
pub fn resolve_scope(grant: &ScopeGrant, tree: &OrgTree) -> ResolvedScope {
    if grant.is_superuser {
        return ResolvedScope {
            organizations: tree.organizations().collect(),
            subdivisions: tree.subdivisions().collect(),
            departments: tree.departments().collect(),
            unbounded: true,
        };
    }

    let organizations = grant.organizations.clone();

    let mut subdivisions = grant.subdivisions.clone();
    for &org in &organizations {
        subdivisions.extend(tree.subdivisions_of(org));
    }

    let mut departments = grant.departments.clone();
    for &sub in &subdivisions {
        departments.extend(tree.departments_of(sub));
    }

    ResolvedScope {
        organizations,
        subdivisions,
        departments,
        unbounded: false,
    }
}

/// Subdivisions a principal should see in navigation pickers.
///
/// This is the resolved subdivision set plus the parent subdivision of every
/// directly granted department, so a department-scoped principal can still
/// navigate to the container their department sits in. Not for record
/// filtering: the upward parents do not grant access to sibling departments
/// or to subdivision-level records.
pub fn navigable_subdivisions(grant: &ScopeGrant, tree: &OrgTree) -> BTreeSet<SubdivisionId> {
    if grant.is_superuser {
        return tree.subdivisions().collect();
    }

    let mut subdivisions = resolve_scope(grant, tree).subdivisions;
    for &dept in &grant.departments {
        if let Some(parent) = tree.subdivision_of(dept) {
            subdivisions.insert(parent);
        }
    }
    subdivisions
}

/// Caller-owned memoization wrapper around [`resolve_scope`].
///
/// Scoped to one unit of work and one tree snapshot: the cache is keyed by
/// principal and carries the tree version it was built against, so it can
/// never serve a scope computed from a different snapshot. Construct it per
/// request and discard it with the request.
#[derive(Debug)]
pub struct ScopeCache {
    tree_version: u64,
    scopes: HashMap<String, ResolvedScope>,
}

impl ScopeCache {
    pub fn new(tree_version: u64) -> Self {
        Self {
            tree_version,
            scopes: HashMap::new(),
        }
    }

    pub fn tree_version(&self) -> u64 {
        self.tree_version
    }

    /// Resolve through the cache. The caller is responsible for passing the
    /// tree snapshot matching `tree_version`.
    pub fn scope_for(&mut self, grant: &ScopeGrant, tree: &OrgTree) -> &ResolvedScope {
        self.scopes.entry(grant.principal.clone()).or_insert_with(|| {
            debug!(
                principal = %grant.principal,
                tree_version = self.tree_version,
                "resolving scope (cache miss)"
            );
            resolve_scope(grant, tree)
        })
    }
}
