//! Tax Calculator: applies the tenant's ordered tax rules to a subtotal and
//! its line items.
//!
//! Taxes are additive, not compounding. Each rule's amount is rounded at the
//! rule level so the breakdown list sums exactly to the displayed total. A
//! malformed rule is skipped with a recorded warning; a single bad tax must
//! never block checkout.

use crate::domain::{CalculationWarning, Money, TaxBreakdownEntry, TaxKind, TaxRule, TaxScope};

/// Item view the tax calculator operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxCalculationItem {
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub total: Money,
}

/// Total tax plus the per-rule breakdown and any skipped-rule warnings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxOutcome {
    pub total: Money,
    pub breakdown: Vec<TaxBreakdownEntry>,
    pub warnings: Vec<CalculationWarning>,
}

/// Evaluate enabled rules in configured order against the subtotal and items.
pub fn calculate(subtotal: Money, items: &[TaxCalculationItem], rules: &[TaxRule]) -> TaxOutcome {
    let mut outcome = TaxOutcome::default();

    for rule in rules.iter().filter(|r| r.enabled) {
        if rule.rate.is_negative() {
            outcome.warnings.push(CalculationWarning::MalformedTaxRule {
                name: rule.name.clone(),
                reason: format!("negative rate {}", rule.rate),
            });
            continue;
        }

        let amount = match (rule.kind, rule.scope) {
            (TaxKind::Percentage, TaxScope::EntireOrder) => subtotal.percent(rule.rate),
            (TaxKind::Fixed, TaxScope::EntireOrder) => rule.rate,
            (TaxKind::Percentage, TaxScope::PerItem) => items
                .iter()
                .map(|item| item.total.percent(rule.rate))
                .sum(),
            (TaxKind::Fixed, TaxScope::PerItem) => {
                items.iter().map(|item| rule.rate * item.quantity).sum()
            }
        };

        let rounded = amount.round2();
        outcome.total = outcome.total + rounded;
        outcome.breakdown.push(TaxBreakdownEntry {
            name: rule.name.clone(),
            rate: rule.rate,
            amount: rounded,
            kind: rule.kind,
        });
    }

    outcome
}
