//! Modifier Pricing Resolver: computes one line item's final unit price from
//! its base price, the item's applied option rules, and the customer's
//! selections.
//!
//! The resolver only prices what it is given. Required/min/max selection
//! enforcement happens in the orchestrator before this runs. A selection with
//! no matching rule, no listed adjustment, or an unavailable choice
//! contributes zero and is reported as an unresolved-choice warning, never
//! silently dropped.

use crate::domain::{
    AppliedOptionRule, CalculationWarning, ChoiceBreakdownEntry, MenuItem, Money, OptionDef,
    PricedLineItem,
};
use crate::domain::cart::LineItemSpec;

/// A priced line plus the anomalies encountered while pricing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLineItem {
    pub priced: PricedLineItem,
    pub warnings: Vec<CalculationWarning>,
}

/// Price one cart line against the item's option rules.
pub fn price_line_item(
    item: &MenuItem,
    rules: &[AppliedOptionRule],
    options: &[OptionDef],
    spec: &LineItemSpec,
) -> ResolvedLineItem {
    let mut modifier_price = Money::zero();
    let mut choices = Vec::with_capacity(spec.choices.len());
    let mut warnings = Vec::new();

    for selection in &spec.choices {
        let option_def = options.iter().find(|o| o.id == selection.option_id);
        let effective_quantity = match option_def {
            Some(def) if def.allow_quantity => selection.quantity.max(1),
            _ => 1,
        };

        let rule = rules.iter().find(|r| r.option_id == selection.option_id);
        let adjustment = rule.and_then(|r| r.adjustment_for(&selection.choice_id));

        let (contribution, resolved, reason) = match (rule, adjustment) {
            (None, _) => (Money::zero(), false, Some("no matching option rule")),
            (Some(_), None) => (Money::zero(), false, Some("choice not listed for item")),
            (Some(_), Some(adj)) if !adj.is_available => {
                (Money::zero(), false, Some("choice unavailable"))
            }
            (Some(_), Some(adj)) => (adj.price_adjustment * effective_quantity, true, None),
        };

        if let Some(reason) = reason {
            warnings.push(CalculationWarning::UnresolvedChoice {
                item_id: spec.item_id.clone(),
                option_id: selection.option_id.clone(),
                choice_id: selection.choice_id.clone(),
                reason: reason.to_string(),
            });
        }

        modifier_price = modifier_price + contribution;
        choices.push(ChoiceBreakdownEntry {
            option_id: selection.option_id.clone(),
            choice_id: selection.choice_id.clone(),
            quantity: effective_quantity,
            price_adjustment: contribution.round2(),
            resolved,
        });
    }

    let unit_price = item.price + modifier_price;
    let line_total = unit_price * spec.quantity;

    ResolvedLineItem {
        priced: PricedLineItem {
            item_id: spec.item_id.clone(),
            name: item.name.clone(),
            quantity: spec.quantity,
            base_price: item.price.round2(),
            modifier_price: modifier_price.round2(),
            unit_price: unit_price.round2(),
            line_total: line_total.round2(),
            choices,
            note: spec.note.clone(),
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChoiceAdjustment, ChoiceId, ItemId, OptionChoice, OptionId, SelectedChoice};

    fn money(s: &str) -> Money {
        Money::from_str_canonical(s).unwrap()
    }

    fn make_item(price: &str) -> MenuItem {
        MenuItem {
            id: ItemId::new("item-1".to_string()),
            name: "Margherita".to_string(),
            price: money(price),
        }
    }

    fn size_rule() -> AppliedOptionRule {
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
                    price_adjustment: money("2.50"),
                    is_available: true,
                    is_default: false,
                },
                ChoiceAdjustment {
                    choice_id: ChoiceId::new("ch-xl".to_string()),
                    price_adjustment: money("4.00"),
                    is_available: false,
                    is_default: false,
                },
            ],
        }
    }

    fn size_option(allow_quantity: bool) -> OptionDef {
        OptionDef {
            id: OptionId::new("opt-size".to_string()),
            name: "Size".to_string(),
            choices: vec![
                OptionChoice {
                    id: ChoiceId::new("ch-small".to_string()),
                    name: "Small".to_string(),
                },
                OptionChoice {
                    id: ChoiceId::new("ch-large".to_string()),
                    name: "Large".to_string(),
                },
            ],
            multi_select: false,
            min_selections: 1,
            max_selections: 1,
            allow_quantity,
            min_quantity: 1,
            max_quantity: 5,
        }
    }

    fn select(option: &str, choice: &str, quantity: i64) -> SelectedChoice {
        SelectedChoice {
            option_id: OptionId::new(option.to_string()),
            choice_id: ChoiceId::new(choice.to_string()),
            quantity,
        }
    }

    fn spec_with(choices: Vec<SelectedChoice>, quantity: i64) -> LineItemSpec {
        LineItemSpec {
            item_id: ItemId::new("item-1".to_string()),
            quantity,
            choices,
            note: None,
        }
    }

    #[test]
    fn test_base_plus_adjustment_times_quantity() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![select("opt-size", "ch-large", 1)], 2),
        );

        assert_eq!(resolved.priced.unit_price, money("12.50"));
        assert_eq!(resolved.priced.line_total, money("25.00"));
        assert_eq!(resolved.priced.modifier_price, money("2.50"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_no_selections_prices_base_only() {
        let resolved = price_line_item(
            &make_item("8.25"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![], 3),
        );

        assert_eq!(resolved.priced.unit_price, money("8.25"));
        assert_eq!(resolved.priced.line_total, money("24.75"));
        assert!(resolved.priced.choices.is_empty());
    }

    #[test]
    fn test_unknown_option_reported_not_dropped() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![select("opt-ghost", "ch-large", 1)], 1),
        );

        assert_eq!(resolved.priced.unit_price, money("10.00"));
        assert_eq!(resolved.priced.choices.len(), 1);
        assert!(!resolved.priced.choices[0].resolved);
        assert_eq!(resolved.warnings.len(), 1);
        match &resolved.warnings[0] {
            CalculationWarning::UnresolvedChoice { reason, .. } => {
                assert_eq!(reason, "no matching option rule");
            }
            other => panic!("expected UnresolvedChoice, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_choice_contributes_zero() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![select("opt-size", "ch-xl", 1)], 1),
        );

        assert_eq!(resolved.priced.unit_price, money("10.00"));
        assert_eq!(resolved.warnings.len(), 1);
        match &resolved.warnings[0] {
            CalculationWarning::UnresolvedChoice { reason, .. } => {
                assert_eq!(reason, "choice unavailable");
            }
            other => panic!("expected UnresolvedChoice, got {:?}", other),
        }
    }

    #[test]
    fn test_unlisted_choice_contributes_zero() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![select("opt-size", "ch-unlisted", 1)], 1),
        );

        assert_eq!(resolved.priced.unit_price, money("10.00"));
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn test_choice_quantity_multiplies_when_allowed() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(true)],
            &spec_with(vec![select("opt-size", "ch-large", 3)], 1),
        );

        // 10.00 + 2.50 * 3
        assert_eq!(resolved.priced.unit_price, money("17.50"));
        assert_eq!(resolved.priced.choices[0].quantity, 3);
    }

    #[test]
    fn test_choice_quantity_ignored_when_not_allowed() {
        let resolved = price_line_item(
            &make_item("10.00"),
            &[size_rule()],
            &[size_option(false)],
            &spec_with(vec![select("opt-size", "ch-large", 3)], 1),
        );

        assert_eq!(resolved.priced.unit_price, money("12.50"));
        assert_eq!(resolved.priced.choices[0].quantity, 1);
    }
}
