//! Platform Fee Calculator: a pure threshold step function on the subtotal.
//!
//! Percentage below the threshold, flat at or above it. The boundary is
//! inclusive of the flat side and has no hysteresis or smoothing.

use crate::domain::{Money, PlatformFeeRule, PlatformFeeSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFeeOutcome {
    pub fee: Money,
    pub applied_rule: PlatformFeeRule,
    pub percentage_used: Option<Money>,
    pub flat_amount_used: Option<Money>,
}

pub fn calculate(subtotal: Money, settings: &PlatformFeeSettings) -> PlatformFeeOutcome {
    if !settings.enabled {
        return PlatformFeeOutcome {
            fee: Money::zero(),
            applied_rule: PlatformFeeRule::None,
            percentage_used: None,
            flat_amount_used: None,
        };
    }

    if subtotal < settings.threshold {
        PlatformFeeOutcome {
            fee: subtotal.percent(settings.below_percent).round2(),
            applied_rule: PlatformFeeRule::Percentage,
            percentage_used: Some(settings.below_percent),
            flat_amount_used: None,
        }
    } else {
        PlatformFeeOutcome {
            fee: settings.above_flat.round2(),
            applied_rule: PlatformFeeRule::Flat,
            percentage_used: None,
            flat_amount_used: Some(settings.above_flat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str_canonical(s).unwrap()
    }

    fn settings() -> PlatformFeeSettings {
        PlatformFeeSettings {
            enabled: true,
            threshold: money("10.0"),
            below_percent: money("10.0"),
            above_flat: money("1.95"),
        }
    }

    #[test]
    fn test_below_threshold_uses_percentage() {
        let outcome = calculate(money("8.00"), &settings());
        assert_eq!(outcome.fee, money("0.80"));
        assert_eq!(outcome.applied_rule, PlatformFeeRule::Percentage);
        assert_eq!(outcome.percentage_used, Some(money("10.0")));
        assert!(outcome.flat_amount_used.is_none());
    }

    #[test]
    fn test_boundary_is_inclusive_of_flat_side() {
        let outcome = calculate(money("10.00"), &settings());
        assert_eq!(outcome.fee, money("1.95"));
        assert_eq!(outcome.applied_rule, PlatformFeeRule::Flat);
        assert_eq!(outcome.flat_amount_used, Some(money("1.95")));
        assert!(outcome.percentage_used.is_none());
    }

    #[test]
    fn test_above_threshold_uses_flat() {
        let outcome = calculate(money("42.00"), &settings());
        assert_eq!(outcome.fee, money("1.95"));
        assert_eq!(outcome.applied_rule, PlatformFeeRule::Flat);
    }

    #[test]
    fn test_disabled_yields_zero_and_no_rule() {
        let mut s = settings();
        s.enabled = false;
        let outcome = calculate(money("8.00"), &s);
        assert!(outcome.fee.is_zero());
        assert_eq!(outcome.applied_rule, PlatformFeeRule::None);
    }

    #[test]
    fn test_zero_subtotal_below_threshold() {
        let outcome = calculate(Money::zero(), &settings());
        assert!(outcome.fee.is_zero());
        assert_eq!(outcome.applied_rule, PlatformFeeRule::Percentage);
    }
}
