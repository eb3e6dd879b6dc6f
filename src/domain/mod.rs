//! Domain types for the pricing engine.
//!
//! This module provides:
//! - Exact monetary arithmetic via the Money wrapper
//! - Request-side cart types and identifier newtypes
//! - Catalog and tenant-configuration snapshot types (closed enums throughout)
//! - The OrderQuote output with its canonical input fingerprint

pub mod cart;
pub mod catalog;
pub mod money;
pub mod quote;
pub mod settings;

pub use cart::{ChoiceId, ItemId, LineItemSpec, OptionId, OrderType, SelectedChoice, TenantId};
pub use catalog::{AppliedOptionRule, ChoiceAdjustment, MenuItem, OptionChoice, OptionDef};
pub use money::Money;
pub use quote::{
    compute_fingerprint, CalculationWarning, ChoiceBreakdownEntry, DeliveryBreakdown, OrderQuote,
    PlatformFeeRule, PricedLineItem, TaxBreakdownEntry,
};
pub use settings::{
    active_tier, DeliveryProviderKind, DeliverySettings, DistanceUnit, FinancialSettings,
    PlatformFeeSettings, PricingTier, TaxKind, TaxRule, TaxScope, TenantSnapshot,
};
