//! Catalog snapshot types: menu items, option definitions, and the per-item
//! option rules that drive modifier pricing.

use super::cart::{ChoiceId, ItemId, OptionId};
use super::money::Money;
use serde::{Deserialize, Serialize};

/// A priced menu item as read from the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub price: Money,
}

/// One selectable choice inside an option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoice {
    pub id: ChoiceId,
    pub name: String,
}

/// A restaurant-level option definition (e.g. "Size", "Extras").
///
/// Selection-count and per-choice-quantity bounds live here; the per-item
/// price adjustments live on [`AppliedOptionRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDef {
    pub id: OptionId,
    pub name: String,
    pub choices: Vec<OptionChoice>,
    pub multi_select: bool,
    pub min_selections: i64,
    pub max_selections: i64,
    pub allow_quantity: bool,
    pub min_quantity: i64,
    pub max_quantity: i64,
}

/// Price adjustment for a single choice within an applied option rule.
///
/// A choice absent from the rule's adjustment list, or present with
/// `is_available = false`, is not selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceAdjustment {
    pub choice_id: ChoiceId,
    pub price_adjustment: Money,
    pub is_available: bool,
    pub is_default: bool,
}

/// An option attached to a specific menu item, with its per-choice price
/// adjustments. `order` defines evaluation/display sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedOptionRule {
    pub option_id: OptionId,
    pub required: bool,
    pub order: i64,
    pub choice_adjustments: Vec<ChoiceAdjustment>,
}

impl AppliedOptionRule {
    /// Look up the adjustment for a choice, if the choice is listed at all.
    pub fn adjustment_for(&self, choice_id: &ChoiceId) -> Option<&ChoiceAdjustment> {
        self.choice_adjustments
            .iter()
            .find(|adj| &adj.choice_id == choice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rule() -> AppliedOptionRule {
        AppliedOptionRule {
            option_id: OptionId::new("opt-size".to_string()),
            required: true,
            order: 0,
            choice_adjustments: vec![
                ChoiceAdjustment {
                    choice_id: ChoiceId::new("ch-small".to_string()),
                    price_adjustment: Money::zero(),
                    is_available: true,
                    is_default: true,
                },
                ChoiceAdjustment {
                    choice_id: ChoiceId::new("ch-large".to_string()),
                    price_adjustment: Money::from_str_canonical("2.50").unwrap(),
                    is_available: true,
                    is_default: false,
                },
            ],
        }
    }

    #[test]
    fn test_adjustment_lookup() {
        let rule = make_rule();
        let adj = rule
            .adjustment_for(&ChoiceId::new("ch-large".to_string()))
            .expect("choice should be listed");
        assert_eq!(adj.price_adjustment.to_canonical_string(), "2.5");
    }

    #[test]
    fn test_adjustment_lookup_missing() {
        let rule = make_rule();
        assert!(rule
            .adjustment_for(&ChoiceId::new("ch-unknown".to_string()))
            .is_none());
    }
}
