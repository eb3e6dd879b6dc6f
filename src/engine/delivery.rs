//! Delivery fee evaluation: short-circuit checks and local distance-tier
//! pricing.
//!
//! External-provider quoting is I/O and lives in the orchestrator; this
//! module owns everything that can be computed from the snapshot and a
//! resolved distance alone.

use crate::datasource::DistanceQuote;
use crate::domain::{active_tier, DeliverySettings, DistanceUnit, Money, PricingTier};

/// Why delivery pricing cannot proceed for this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryRejection {
    NotEnabled,
    OutsideRadius {
        distance: Money,
        maximum_radius: Money,
        unit: DistanceUnit,
    },
}

/// Gate delivery pricing on the tenant's settings and the resolved distance.
/// A rejection always means fee 0; it never degrades to a partial fee.
pub fn check_deliverable(
    settings: &DeliverySettings,
    quote: &DistanceQuote,
) -> Result<(), DeliveryRejection> {
    if !settings.enabled {
        return Err(DeliveryRejection::NotEnabled);
    }
    if !quote.within_radius {
        return Err(DeliveryRejection::OutsideRadius {
            distance: quote.distance,
            maximum_radius: settings.maximum_radius,
            unit: settings.distance_unit,
        });
    }
    Ok(())
}

/// A locally priced delivery fee with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFee {
    pub fee: Money,
    pub tier_used: String,
    pub calculation_details: String,
}

/// Price a delivery against the active tier: `base_fee` up to
/// `distance_covered`, then `additional_fee_per_unit` per unit beyond it.
/// Returns None when no tiers are configured (a configuration error for the
/// caller to surface).
pub fn local_fee(
    tiers: &[PricingTier],
    distance: Money,
    unit: DistanceUnit,
) -> Option<LocalFee> {
    let tier = active_tier(tiers)?;
    Some(price_against_tier(tier, distance, unit))
}

fn price_against_tier(tier: &PricingTier, distance: Money, unit: DistanceUnit) -> LocalFee {
    let (fee, calculation_details) = if distance <= tier.distance_covered {
        (
            tier.base_fee,
            format!(
                "{}{} within {}{} covered: base fee {}",
                distance, unit, tier.distance_covered, unit, tier.base_fee
            ),
        )
    } else {
        let excess = distance - tier.distance_covered;
        let fee = tier.base_fee + excess * tier.additional_fee_per_unit;
        (
            fee,
            format!(
                "base fee {} + ({}{} - {}{}) x {} per {}",
                tier.base_fee,
                distance,
                unit,
                tier.distance_covered,
                unit,
                tier.additional_fee_per_unit,
                unit
            ),
        )
    };

    LocalFee {
        fee: fee.round2(),
        tier_used: tier.name.clone(),
        calculation_details,
    }
}
