//! Hierarchical scope resolution and override-cascade core.
//!
//! Pure domain logic for records systems built on a three-level
//! organizational tree (Organization → Subdivision → Department):
//!
//! - **ScopeGrant / resolve_scope**: which tree nodes a principal may see,
//!   expanded downward from direct grants
//! - **Scoped / filter_scoped / can_access**: applying a scope to records
//! - **find_redundant**: advisory detection of grants implied by coarser ones
//! - **RuleBook**: effective-rule resolution — reference rules by name,
//!   per-entity overrides, explicit disablement
//! - **find_nearest**: nearest-enclosing commission lookup
//! - **DeadlineRecord / classify**: calendar-month deadlines and due states
//!
//! # Architecture
//!
//! ```text
//! OrgTree + ScopeGrant ──► resolve_scope ──► ResolvedScope
//!        (snapshots)              │               │
//!                                 │        ┌──────┼──────────┐
//!                                 ▼        ▼      ▼          ▼
//!                            ScopeCache  filter  can_access  find_redundant
//!
//! ReferenceRules + Overrides ──► RuleBook::effective_rules
//! Commissions + anchor       ──► find_nearest
//! last event + period        ──► DeadlineRecord ──► classify
//! ```
//!
//! Every operation is a deterministic function of caller-supplied snapshots:
//! no I/O, no interior mutability, no storage. Loading the snapshots and
//! persisting edits is the embedding application's job.
//!
//! # Example
//!
//! ```
//! use org_scope_core::{
//!     resolve_scope, OrgId, OrgTree, ScopeGrant, SubdivisionId, SubdivisionNode,
//! };
//!
//! let tree = OrgTree::new(
//!     [OrgId(1)],
//!     [SubdivisionNode { id: SubdivisionId(10), organization: OrgId(1) }],
//!     [],
//! )?;
//! let grant = ScopeGrant::new("alice").grant_organization(OrgId(1));
//!
//! let scope = resolve_scope(&grant, &tree);
//! assert!(scope.subdivisions.contains(&SubdivisionId(10)));
//! # Ok::<(), org_scope_core::ScopeError>(())
//! ```

mod access;
mod commission;
mod deadline;
mod error;
mod grant;
mod norms;
mod record;
mod redundancy;
mod resolve;
mod tree;

pub use access::can_access;
pub use commission::{
    find_nearest, Commission, CommissionId, CommissionMember, CommissionRole, CommissionScope,
};
pub use deadline::{add_calendar_months, classify, DeadlineRecord, DeadlineStatus};
pub use error::ScopeError;
pub use grant::{AccessLevel, ScopeGrant};
pub use norms::{
    EffectiveRule, EntityId, ReferenceRule, RuleBook, RuleEffect, RuleOverride, RuleSource,
};
pub use record::{filter_scoped, matches_scope, RecordRefs, Scoped};
pub use redundancy::{find_redundant, Redundancy};
pub use resolve::{navigable_subdivisions, resolve_scope, ResolvedScope, ScopeCache};
pub use tree::{DepartmentId, DepartmentNode, OrgId, OrgTree, SubdivisionId, SubdivisionNode};
