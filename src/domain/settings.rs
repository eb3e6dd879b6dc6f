//! Tenant financial and delivery configuration.
//!
//! Every knob is a closed enum or a validated struct: an unrecognized tax
//! kind, scope, distance unit, or provider is a deserialization failure, not
//! a runtime string comparison.

use super::catalog::{AppliedOptionRule, MenuItem, OptionDef};
use super::cart::ItemId;
use super::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Percentage (0-100 scale) or a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    Percentage,
    Fixed,
}

impl std::fmt::Display for TaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxKind::Percentage => write!(f, "percentage"),
            TaxKind::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for TaxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(TaxKind::Percentage),
            "fixed" => Ok(TaxKind::Fixed),
            other => Err(format!("unknown tax kind: {}", other)),
        }
    }
}

/// Whether a tax rule applies once to the whole order or per line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxScope {
    EntireOrder,
    PerItem,
}

impl std::fmt::Display for TaxScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxScope::EntireOrder => write!(f, "entire_order"),
            TaxScope::PerItem => write!(f, "per_item"),
        }
    }
}

impl std::str::FromStr for TaxScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entire_order" => Ok(TaxScope::EntireOrder),
            "per_item" => Ok(TaxScope::PerItem),
            other => Err(format!("unknown tax scope: {}", other)),
        }
    }
}

/// One configured tax rule. Rules are additive, not compounding; configured
/// order matters only for the breakdown list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRule {
    pub name: String,
    pub enabled: bool,
    pub rate: Money,
    pub kind: TaxKind,
    pub scope: TaxScope,
}

/// Distance unit for radius checks and tier pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Miles,
    Km,
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnit::Miles => write!(f, "miles"),
            DistanceUnit::Km => write!(f, "km"),
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miles" => Ok(DistanceUnit::Miles),
            "km" => Ok(DistanceUnit::Km),
            other => Err(format!("unknown distance unit: {}", other)),
        }
    }
}

/// Who prices the delivery leg: local distance tiers or an external
/// delivery-quote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryProviderKind {
    Local,
    External,
}

impl std::fmt::Display for DeliveryProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryProviderKind::Local => write!(f, "local"),
            DeliveryProviderKind::External => write!(f, "external"),
        }
    }
}

impl std::str::FromStr for DeliveryProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(DeliveryProviderKind::Local),
            "external" => Ok(DeliveryProviderKind::External),
            other => Err(format!("unknown delivery provider: {}", other)),
        }
    }
}

/// A distance-banded delivery pricing rule: `base_fee` covers everything up
/// to `distance_covered`, beyond that `additional_fee_per_unit` accrues per
/// unit of distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: String,
    pub distance_covered: Money,
    pub base_fee: Money,
    pub additional_fee_per_unit: Money,
    pub is_default: bool,
}

/// Select the tier used for one calculation: the tier flagged default, else
/// the first tier in the configured list. The tie-break is deliberate and
/// documented here rather than left to incidental list ordering.
pub fn active_tier(tiers: &[PricingTier]) -> Option<&PricingTier> {
    tiers.iter().find(|t| t.is_default).or_else(|| tiers.first())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    pub enabled: bool,
    pub distance_unit: DistanceUnit,
    pub maximum_radius: Money,
    pub provider: DeliveryProviderKind,
    pub pricing_tiers: Vec<PricingTier>,
}

/// Threshold-switched platform fee: percentage below the threshold, flat at
/// or above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFeeSettings {
    pub enabled: bool,
    pub threshold: Money,
    pub below_percent: Money,
    pub above_flat: Money,
}

/// Tenant-level financial configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSettings {
    pub tax_rules: Vec<TaxRule>,
    pub platform_fee: PlatformFeeSettings,
    pub currency: String,
    pub currency_symbol: String,
}

/// Everything one calculation reads: loaded once at the start of the call and
/// never mutated. The engine is a pure function of this plus the request.
#[derive(Debug, Clone)]
pub struct TenantSnapshot {
    pub financial: FinancialSettings,
    pub delivery: DeliverySettings,
    pub restaurant_address: String,
    pub restaurant_name: String,
    pub menu_items: HashMap<ItemId, MenuItem>,
    pub option_rules: HashMap<ItemId, Vec<AppliedOptionRule>>,
    pub options: Vec<OptionDef>,
}
