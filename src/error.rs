use thiserror::Error;

use crate::norms::EntityId;

/// Crate-level error type.
///
/// The taxonomy is deliberately small: both variants are structural data
/// problems in a caller-supplied snapshot. "Not found" conditions are never
/// errors here — they come back as `None` / empty collections that callers
/// must handle explicitly.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("invalid tree shape: {0}")]
    InvalidTreeShape(String),

    #[error("duplicate override for entity {entity} in category {category:?}")]
    DuplicateOverride { entity: EntityId, category: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_tree_shape() {
        let e = ScopeError::InvalidTreeShape("department 3 references missing subdivision 9".into());
        assert_eq!(
            e.to_string(),
            "invalid tree shape: department 3 references missing subdivision 9"
        );
    }

    #[test]
    fn display_duplicate_override() {
        let e = ScopeError::DuplicateOverride {
            entity: EntityId(42),
            category: "noise".into(),
        };
        assert_eq!(
            e.to_string(),
            "duplicate override for entity 42 in category \"noise\""
        );
    }
}
