//! The override cascade: reference rules keyed by name, per-entity overrides.
//!
//! A reference rule is the organization-independent default for every entity
//! whose (human-entered) name matches. An override is keyed to one concrete
//! entity and either replaces the payload for its category or disables the
//! category outright. Inheritance is computed at read time: an entity with
//! no overrides transparently picks up whatever the reference set currently
//! says for its name, so reference edits propagate without touching entities.
//!
//! Name matching is deliberately byte-exact — no trimming, no case folding.
//! That fragility is inherited business behavior, not something this layer
//! is allowed to smooth over.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Identifier of a concrete rule-bearing entity (e.g. a position row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effect payload a rule carries: a periodicity, a quantity, free-form notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEffect {
    /// Display name of the effect (the hazard factor, the issued item, ...).
    pub name: String,
    pub periodicity_months: Option<u32>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

impl RuleEffect {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn every_months(mut self, months: u32) -> Self {
        self.periodicity_months = Some(months);
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Default rule for any entity whose name matches, in one rule category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRule {
    /// Free-text matching key (exact match against the entity name).
    pub name: String,
    pub category: String,
    /// Declared ordering within the category, for reproducible display.
    pub order: i32,
    pub effect: RuleEffect,
}

/// Per-entity override for one category: a replacement payload, or an
/// explicit disablement that removes the category for this entity entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub entity: EntityId,
    pub category: String,
    pub disabled: bool,
    /// Replacement payload. `None` on a non-disabling override means "keep
    /// the reference payload" (the category is pinned but not reshaped).
    pub effect: Option<RuleEffect>,
    pub order: i32,
}

/// Where an effective rule's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Reference,
    Override,
}

/// One resolved rule in an entity's effective set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRule {
    pub category: String,
    pub order: i32,
    pub effect: RuleEffect,
    pub source: RuleSource,
}

/// Immutable snapshot of the reference rule set plus all entity overrides.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    reference: Vec<ReferenceRule>,
    overrides: HashMap<EntityId, BTreeMap<String, RuleOverride>>,
}

impl RuleBook {
    /// Build a rule book, enforcing the at-most-one-override-per-
    /// (entity, category) invariant.
    pub fn new(
        reference: Vec<ReferenceRule>,
        overrides: Vec<RuleOverride>,
    ) -> Result<Self, ScopeError> {
        let mut by_entity: HashMap<EntityId, BTreeMap<String, RuleOverride>> = HashMap::new();
        for ov in overrides {
            let entity = ov.entity;
            let category = ov.category.clone();
            if by_entity.entry(entity).or_default().insert(category.clone(), ov).is_some() {
                return Err(ScopeError::DuplicateOverride { entity, category });
            }
        }
        Ok(Self {
            reference,
            overrides: by_entity,
        })
    }

    /// Resolve the effective rule set for one entity.
    ///
    /// Reference rules whose name matches `entity_name` form the base set;
    /// the entity's overrides then disable, replace, or extend it. With
    /// `category` set, only that category is considered. An empty result is
    /// a valid answer, not an error.
    ///
    /// Ordering is stable and reproducible: by category, then declared
    /// order, then effect name.
    pub fn effective_rules(
        &self,
        entity: EntityId,
        entity_name: &str,
        category: Option<&str>,
    ) -> Vec<EffectiveRule> {
        let in_filter = |c: &str| category.is_none_or(|want| want == c);

        let empty = BTreeMap::new();
        let overrides = self.overrides.get(&entity).unwrap_or(&empty);

        let mut rules: Vec<EffectiveRule> = Vec::new();

        // Reference rules pass through unless the category is overridden.
        for rule in &self.reference {
            if rule.name != entity_name || !in_filter(&rule.category) {
                continue;
            }
            if overrides.contains_key(&rule.category) {
                continue;
            }
            rules.push(EffectiveRule {
                category: rule.category.clone(),
                order: rule.order,
                effect: rule.effect.clone(),
                source: RuleSource::Reference,
            });
        }

        // Overrides win their category: replacement payload if supplied,
        // otherwise the reference payload for the category; a disablement
        // emits nothing.
        for (cat, ov) in overrides {
            if ov.disabled || !in_filter(cat) {
                continue;
            }
            let fallback = || {
                self.reference
                    .iter()
                    .find(|r| r.name == entity_name && &r.category == cat)
                    .map(|r| r.effect.clone())
            };
            let Some(effect) = ov.effect.clone().or_else(fallback) else {
                // Override without a payload and no matching reference rule:
                // nothing to resolve for this category.
                continue;
            };
            rules.push(EffectiveRule {
                category: cat.clone(),
                order: ov.order,
                effect,
                source: RuleSource::Override,
            });
        }

        rules.sort_by(|a, b| {
            (&a.category, a.order, &a.effect.name).cmp(&(&b.category, b.order, &b.effect.name))
        });
        rules
    }

    /// Does this entity end up with any applicable rule at all, custom or
    /// inherited? Used by intake screens to decide whether tracking is
    /// needed for a newly created entity.
    pub fn has_any_rules(&self, entity: EntityId, entity_name: &str) -> bool {
        !self.effective_rules(entity, entity_name, None).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<ReferenceRule> {
        vec![
            ReferenceRule {
                name: "Welder".into(),
                category: "noise".into(),
                order: 0,
                effect: RuleEffect::named("industrial noise").every_months(12),
            },
            ReferenceRule {
                name: "Welder".into(),
                category: "vision".into(),
                order: 1,
                effect: RuleEffect::named("arc flash").every_months(24),
            },
            ReferenceRule {
                name: "Clerk".into(),
                category: "vision".into(),
                order: 0,
                effect: RuleEffect::named("display work").every_months(24),
            },
        ]
    }

    #[test]
    fn no_overrides_inherits_reference_set() {
        let book = RuleBook::new(reference(), vec![]).unwrap();
        let rules = book.effective_rules(EntityId(7), "Welder", None);

        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|r| r.source == RuleSource::Reference));
        assert_eq!(rules[0].category, "noise");
        assert_eq!(rules[1].category, "vision");
    }

    #[test]
    fn disablement_removes_category_entirely() {
        let overrides = vec![RuleOverride {
            entity: EntityId(42),
            category: "noise".into(),
            disabled: true,
            effect: None,
            order: 0,
        }];
        let book = RuleBook::new(reference(), overrides).unwrap();

        let rules = book.effective_rules(EntityId(42), "Welder", None);
        assert!(rules.iter().all(|r| r.category != "noise"));
        assert_eq!(rules.len(), 1);

        // Other entities with the same name are untouched.
        assert_eq!(book.effective_rules(EntityId(7), "Welder", None).len(), 2);
    }

    #[test]
    fn override_payload_wins() {
        let overrides = vec![RuleOverride {
            entity: EntityId(42),
            category: "noise".into(),
            disabled: false,
            effect: Some(RuleEffect::named("industrial noise").every_months(6)),
            order: 0,
        }];
        let book = RuleBook::new(reference(), overrides).unwrap();

        let rules = book.effective_rules(EntityId(42), "Welder", Some("noise"));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].effect.periodicity_months, Some(6));
        assert_eq!(rules[0].source, RuleSource::Override);
    }

    #[test]
    fn payloadless_override_keeps_reference_effect() {
        let overrides = vec![RuleOverride {
            entity: EntityId(42),
            category: "noise".into(),
            disabled: false,
            effect: None,
            order: 0,
        }];
        let book = RuleBook::new(reference(), overrides).unwrap();

        let rules = book.effective_rules(EntityId(42), "Welder", Some("noise"));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].effect.periodicity_months, Some(12));
        assert_eq!(rules[0].source, RuleSource::Override);
    }

    #[test]
    fn override_only_category_is_added() {
        let overrides = vec![RuleOverride {
            entity: EntityId(42),
            category: "vibration".into(),
            disabled: false,
            effect: Some(RuleEffect::named("hand-arm vibration").every_months(12)),
            order: 0,
        }];
        let book = RuleBook::new(reference(), overrides).unwrap();

        let rules = book.effective_rules(EntityId(42), "Welder", None);
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().any(|r| r.category == "vibration"));
    }

    #[test]
    fn exact_name_match_only() {
        let book = RuleBook::new(reference(), vec![]).unwrap();
        assert!(book.effective_rules(EntityId(1), "welder", None).is_empty());
        assert!(book.effective_rules(EntityId(1), "Welder ", None).is_empty());
        assert!(book.effective_rules(EntityId(1), "Rigger", None).is_empty());
    }

    #[test]
    fn duplicate_override_rejected() {
        let overrides = vec![
            RuleOverride {
                entity: EntityId(42),
                category: "noise".into(),
                disabled: true,
                effect: None,
                order: 0,
            },
            RuleOverride {
                entity: EntityId(42),
                category: "noise".into(),
                disabled: false,
                effect: None,
                order: 1,
            },
        ];
        let err = RuleBook::new(reference(), overrides).unwrap_err();
        assert!(matches!(err, ScopeError::DuplicateOverride { entity: EntityId(42), .. }));
    }

    #[test]
    fn ordering_is_stable() {
        let reference = vec![
            ReferenceRule {
                name: "Fitter".into(),
                category: "ppe".into(),
                order: 2,
                effect: RuleEffect::named("gloves").quantity(12),
            },
            ReferenceRule {
                name: "Fitter".into(),
                category: "ppe".into(),
                order: 1,
                effect: RuleEffect::named("overalls").quantity(1),
            },
            ReferenceRule {
                name: "Fitter".into(),
                category: "ppe".into(),
                order: 1,
                effect: RuleEffect::named("boots").quantity(1),
            },
        ];
        let book = RuleBook::new(reference, vec![]).unwrap();
        let names: Vec<_> = book
            .effective_rules(EntityId(1), "Fitter", None)
            .into_iter()
            .map(|r| r.effect.name)
            .collect();
        assert_eq!(names, vec!["boots", "overalls", "gloves"]);
    }

    #[test]
    fn effect_notes_default_on_deserialize() {
        let effect: RuleEffect = serde_json::from_value(serde_json::json!({
            "name": "industrial noise", "periodicity_months": 12, "quantity": null
        }))
        .unwrap();
        assert_eq!(effect.notes, "");
        assert_eq!(effect.periodicity_months, Some(12));

        let json = serde_json::to_value(&effect).unwrap();
        let back: RuleEffect = serde_json::from_value(json).unwrap();
        assert_eq!(back, effect);
    }

    #[test]
    fn has_any_rules_reflects_effective_set() {
        let overrides = vec![
            RuleOverride {
                entity: EntityId(42),
                category: "noise".into(),
                disabled: true,
                effect: None,
                order: 0,
            },
            RuleOverride {
                entity: EntityId(42),
                category: "vision".into(),
                disabled: true,
                effect: None,
                order: 0,
            },
        ];
        let book = RuleBook::new(reference(), overrides).unwrap();

        assert!(book.has_any_rules(EntityId(7), "Welder"));
        assert!(!book.has_any_rules(EntityId(42), "Welder"));
        assert!(!book.has_any_rules(EntityId(1), "Unmatched name"));
    }
}
