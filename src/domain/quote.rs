//! The authoritative monetary breakdown produced by one calculation, plus the
//! canonical input fingerprint used to reconcile a pre-payment quote with the
//! post-payment charge.

use super::cart::{ChoiceId, ItemId, LineItemSpec, OptionId, OrderType, TenantId};
use super::money::Money;
use super::settings::{DeliveryProviderKind, DistanceUnit, TaxKind, TenantSnapshot};
use serde::{Deserialize, Serialize};

/// Per-choice contribution to a line item's unit price.
///
/// `resolved = false` marks a selection that had no matching rule or whose
/// choice was unavailable; it contributes zero and is mirrored in the quote's
/// warning list rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceBreakdownEntry {
    pub option_id: OptionId,
    pub choice_id: ChoiceId,
    pub quantity: i64,
    pub price_adjustment: Money,
    pub resolved: bool,
}

/// One priced cart line: base + modifiers, already rounded for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItem {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub base_price: Money,
    pub modifier_price: Money,
    pub unit_price: Money,
    pub line_total: Money,
    pub choices: Vec<ChoiceBreakdownEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One tax rule's contribution, rounded at the rule level so the breakdown
/// sums exactly to the displayed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdownEntry {
    pub name: String,
    pub rate: Money,
    pub amount: Money,
    pub kind: TaxKind,
}

/// Which platform-fee rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFeeRule {
    None,
    Percentage,
    Flat,
}

/// Audit detail for the delivery leg of the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryBreakdown {
    pub provider: DeliveryProviderKind,
    pub distance: Money,
    pub unit: DistanceUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
}

/// Non-fatal anomalies recorded on the quote. These never abort a
/// calculation; they make degradations explicit and attributable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationWarning {
    #[serde(rename_all = "camelCase")]
    UnresolvedChoice {
        item_id: ItemId,
        option_id: OptionId,
        choice_id: ChoiceId,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    MalformedTaxRule { name: String, reason: String },
    #[serde(rename_all = "camelCase")]
    CurrencyUnconverted {
        from: String,
        to: String,
        amount: Money,
    },
}

/// The immutable output of one calculation. All monetary fields are
/// non-negative and rounded to 2 decimal places at emission. Two calls with
/// identical inputs over an unchanged snapshot serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    pub fingerprint: String,
    pub order_type: OrderType,
    pub items: Vec<PricedLineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub tax_breakdown: Vec<TaxBreakdownEntry>,
    pub delivery_fee: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryBreakdown>,
    pub platform_fee: Money,
    pub platform_fee_rule: PlatformFeeRule,
    pub tip: Money,
    pub driver_tip: Money,
    pub total: Money,
    pub currency: String,
    pub currency_symbol: String,
    pub warnings: Vec<CalculationWarning>,
}

/// Compute the canonical fingerprint of one calculation's inputs: the request
/// plus the configuration snapshot it was priced against. The same inputs
/// always hash to the same value, so a charge can be checked against the
/// quote it claims to honor.
pub fn compute_fingerprint(
    tenant: &TenantId,
    order_type: OrderType,
    items: &[LineItemSpec],
    dropoff_address: Option<&str>,
    tip: Money,
    driver_tip: Money,
    snapshot: &TenantSnapshot,
) -> String {
    use sha2::{Digest, Sha256};

    fn hash_var(hasher: &mut Sha256, data: &str) {
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data.as_bytes());
    }

    let mut hasher = Sha256::new();
    hash_var(&mut hasher, tenant.as_str());
    hash_var(&mut hasher, &order_type.to_string());
    for item in items {
        hash_var(&mut hasher, item.item_id.as_str());
        hasher.update(item.quantity.to_le_bytes());
        for choice in &item.choices {
            hash_var(&mut hasher, choice.option_id.as_str());
            hash_var(&mut hasher, choice.choice_id.as_str());
            hasher.update(choice.quantity.to_le_bytes());
        }
    }
    hash_var(&mut hasher, dropoff_address.unwrap_or(""));
    hash_var(&mut hasher, &tip.to_canonical_string());
    hash_var(&mut hasher, &driver_tip.to_canonical_string());

    // Snapshot side: financial + delivery settings and the priced items'
    // catalog entries. Struct field order is stable, so the JSON is canonical.
    hash_var(
        &mut hasher,
        &serde_json::to_string(&snapshot.financial).unwrap_or_default(),
    );
    hash_var(
        &mut hasher,
        &serde_json::to_string(&snapshot.delivery).unwrap_or_default(),
    );
    // Option definitions carry selection/quantity bounds that change pricing,
    // so they are part of the fingerprinted configuration.
    hash_var(
        &mut hasher,
        &serde_json::to_string(&snapshot.options).unwrap_or_default(),
    );
    for item in items {
        if let Some(menu_item) = snapshot.menu_items.get(&item.item_id) {
            hash_var(
                &mut hasher,
                &serde_json::to_string(menu_item).unwrap_or_default(),
            );
        }
        if let Some(rules) = snapshot.option_rules.get(&item.item_id) {
            hash_var(
                &mut hasher,
                &serde_json::to_string(rules).unwrap_or_default(),
            );
        }
    }

    let hash = hasher.finalize();
    hex::encode(&hash[..16])
}
