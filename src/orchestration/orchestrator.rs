//! Order Pricing Orchestrator: loads the tenant snapshot, runs the
//! calculators in a fixed sequence, and assembles the authoritative
//! breakdown.
//!
//! The sequence is not reorderable: snapshot load -> request validation ->
//! per-item modifier pricing -> subtotal -> taxes -> (delivery orders only)
//! distance then delivery fee -> platform fee -> totals. Any required-step
//! failure aborts with a typed error; a partial total is worse than no total.

use crate::datasource::{
    DeliveryQuoteProvider, DeliveryQuoteRequest, DistanceQuote, DistanceResolver,
    ExchangeRateSource,
};
use crate::db::Repository;
use crate::domain::{
    compute_fingerprint, CalculationWarning, DeliveryBreakdown, DeliveryProviderKind,
    DistanceUnit, LineItemSpec, Money, OptionDef, OrderQuote, OrderType, TenantId, TenantSnapshot,
};
use crate::engine::{self, DeliveryRejection, TaxCalculationItem};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// One pricing request, as handed over by the checkout flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub tenant_id: TenantId,
    pub order_type: OrderType,
    pub items: Vec<LineItemSpec>,
    #[serde(default)]
    pub dropoff_address: Option<String>,
    #[serde(default)]
    pub dropoff_phone: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub tip: Money,
    #[serde(default)]
    pub driver_tip: Money,
}

/// Typed failure taxonomy for one calculation.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Catalog mismatch: {0}")]
    CatalogMismatch(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Distance unavailable: {0}")]
    DistanceUnavailable(String),
    #[error("{address} is outside the {radius}{unit} delivery radius")]
    DeliveryRadiusExceeded {
        address: String,
        radius: Money,
        unit: DistanceUnit,
        distance: Money,
    },
    #[error("Delivery quote failed: {0}")]
    DeliveryQuote(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Orchestrates one request-scoped, synchronous calculation. Providers are
/// injected at construction time; tests substitute mocks.
#[derive(Clone)]
pub struct PricingOrchestrator {
    repo: Arc<Repository>,
    distance: Arc<dyn DistanceResolver>,
    courier: Arc<dyn DeliveryQuoteProvider>,
    exchange: Option<Arc<dyn ExchangeRateSource>>,
}

impl PricingOrchestrator {
    pub fn new(
        repo: Arc<Repository>,
        distance: Arc<dyn DistanceResolver>,
        courier: Arc<dyn DeliveryQuoteProvider>,
        exchange: Option<Arc<dyn ExchangeRateSource>>,
    ) -> Self {
        Self {
            repo,
            distance,
            courier,
            exchange,
        }
    }

    /// Price one order. Pure with respect to the snapshot it loads: calling
    /// twice with identical inputs and an unchanged snapshot yields an
    /// identical quote.
    pub async fn price_order(&self, request: &PricingRequest) -> Result<OrderQuote, PricingError> {
        let calculation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "price_order",
            %calculation_id,
            tenant = %request.tenant_id,
            order_type = %request.order_type,
        );
        self.price_order_inner(request).instrument(span).await
    }

    async fn price_order_inner(
        &self,
        request: &PricingRequest,
    ) -> Result<OrderQuote, PricingError> {
        validate_request(request)?;

        let item_ids: Vec<_> = request.items.iter().map(|i| i.item_id.clone()).collect();
        let snapshot = self
            .repo
            .load_snapshot(&request.tenant_id, &item_ids)
            .await?
            .ok_or_else(|| {
                PricingError::Configuration(format!("unknown tenant {}", request.tenant_id))
            })?;

        validate_selections(&request.items, &snapshot)?;

        let mut warnings = Vec::new();
        let mut priced_items = Vec::with_capacity(request.items.len());
        for spec in &request.items {
            let item = snapshot.menu_items.get(&spec.item_id).ok_or_else(|| {
                PricingError::CatalogMismatch(format!("menu item {} not found", spec.item_id))
            })?;
            let rules = snapshot
                .option_rules
                .get(&spec.item_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let resolved = engine::price_line_item(item, rules, &snapshot.options, spec);
            warnings.extend(resolved.warnings);
            priced_items.push(resolved.priced);
        }

        let subtotal: Money = priced_items.iter().map(|i| i.line_total).sum();
        let subtotal = subtotal.round2();

        let tax_items: Vec<TaxCalculationItem> = priced_items
            .iter()
            .map(|item| TaxCalculationItem {
                name: item.name.clone(),
                price: item.unit_price,
                quantity: item.quantity,
                total: item.line_total,
            })
            .collect();
        let tax_outcome =
            engine::tax::calculate(subtotal, &tax_items, &snapshot.financial.tax_rules);
        warnings.extend(tax_outcome.warnings);

        let (delivery_fee, delivery) = if request.order_type == OrderType::Delivery {
            let (fee, breakdown, delivery_warnings) = self
                .price_delivery(request, &snapshot, subtotal)
                .await?;
            warnings.extend(delivery_warnings);
            (fee, Some(breakdown))
        } else {
            (Money::zero(), None)
        };

        let platform = engine::platform_fee::calculate(subtotal, &snapshot.financial.platform_fee);

        let tip = request.tip.round2();
        let driver_tip = request.driver_tip.round2();
        let total = subtotal + tax_outcome.total + delivery_fee + platform.fee + tip + driver_tip;

        let fingerprint = compute_fingerprint(
            &request.tenant_id,
            request.order_type,
            &request.items,
            request.dropoff_address.as_deref(),
            tip,
            driver_tip,
            &snapshot,
        );

        info!(
            %subtotal,
            tax = %tax_outcome.total,
            %delivery_fee,
            platform_fee = %platform.fee,
            %total,
            %fingerprint,
            warning_count = warnings.len(),
            "calculation complete"
        );

        Ok(OrderQuote {
            fingerprint,
            order_type: request.order_type,
            items: priced_items,
            subtotal,
            tax: tax_outcome.total,
            tax_breakdown: tax_outcome.breakdown,
            delivery_fee: delivery_fee.round2(),
            delivery,
            platform_fee: platform.fee,
            platform_fee_rule: platform.applied_rule,
            tip,
            driver_tip,
            total: total.round2(),
            currency: snapshot.financial.currency.clone(),
            currency_symbol: snapshot.financial.currency_symbol.clone(),
            warnings,
        })
    }

    /// Delivery leg: resolve distance, gate on settings and radius, then
    /// price locally or via the external partner. Distance comes first; a
    /// delivery fee is never requested against an unverified distance.
    async fn price_delivery(
        &self,
        request: &PricingRequest,
        snapshot: &TenantSnapshot,
        subtotal: Money,
    ) -> Result<(Money, DeliveryBreakdown, Vec<CalculationWarning>), PricingError> {
        let settings = &snapshot.delivery;
        if !settings.enabled {
            return Err(PricingError::Configuration("Delivery not enabled".to_string()));
        }

        // Presence checked in validate_request.
        let dropoff = request.dropoff_address.as_deref().unwrap_or_default();

        let distance_quote: DistanceQuote = self
            .distance
            .resolve(
                &snapshot.restaurant_address,
                dropoff,
                settings.maximum_radius,
                settings.distance_unit,
            )
            .await
            .map_err(|e| PricingError::DistanceUnavailable(e.to_string()))?;

        if let Err(rejection) = engine::check_deliverable(settings, &distance_quote) {
            return Err(match rejection {
                DeliveryRejection::NotEnabled => {
                    PricingError::Configuration("Delivery not enabled".to_string())
                }
                DeliveryRejection::OutsideRadius {
                    distance,
                    maximum_radius,
                    unit,
                } => PricingError::DeliveryRadiusExceeded {
                    address: dropoff.to_string(),
                    radius: maximum_radius,
                    unit,
                    distance,
                },
            });
        }

        match settings.provider {
            DeliveryProviderKind::Local => {
                let local = engine::local_fee(
                    &settings.pricing_tiers,
                    distance_quote.distance,
                    settings.distance_unit,
                )
                .ok_or_else(|| {
                    PricingError::Configuration("no pricing tiers configured".to_string())
                })?;

                Ok((
                    local.fee,
                    DeliveryBreakdown {
                        provider: DeliveryProviderKind::Local,
                        distance: distance_quote.distance,
                        unit: distance_quote.unit,
                        tier_used: Some(local.tier_used),
                        calculation_details: Some(local.calculation_details),
                        original_fee: None,
                        original_currency: None,
                        estimated_minutes: None,
                        carrier_id: None,
                        carrier_name: None,
                    },
                    Vec::new(),
                ))
            }
            DeliveryProviderKind::External => {
                let quote_request = DeliveryQuoteRequest {
                    pickup_address: snapshot.restaurant_address.clone(),
                    dropoff_address: dropoff.to_string(),
                    pickup_name: Some(snapshot.restaurant_name.clone()),
                    dropoff_name: request.customer_name.clone(),
                    dropoff_phone: request.dropoff_phone.clone(),
                    order_value: Some(subtotal),
                };

                let quote = self
                    .courier
                    .quote(&quote_request)
                    .await
                    .map_err(|e| PricingError::DeliveryQuote(e.to_string()))?;

                let mut warnings = Vec::new();
                let mut breakdown = DeliveryBreakdown {
                    provider: DeliveryProviderKind::External,
                    distance: distance_quote.distance,
                    unit: distance_quote.unit,
                    tier_used: None,
                    calculation_details: None,
                    original_fee: None,
                    original_currency: None,
                    estimated_minutes: quote.estimated_minutes,
                    carrier_id: quote.carrier_id.clone(),
                    carrier_name: quote.carrier_name.clone(),
                };

                let tenant_currency = &snapshot.financial.currency;
                let fee = if quote.currency != *tenant_currency {
                    breakdown.original_fee = Some(quote.fee.round2());
                    breakdown.original_currency = Some(quote.currency.clone());

                    let converted = match &self.exchange {
                        Some(exchange) => exchange
                            .convert(quote.fee, &quote.currency, tenant_currency)
                            .await
                            .ok(),
                        None => None,
                    };
                    match converted {
                        Some(converted) => converted,
                        None => {
                            warn!(
                                from = %quote.currency,
                                to = %tenant_currency,
                                amount = %quote.fee,
                                "currency conversion unavailable, using unconverted fee"
                            );
                            warnings.push(CalculationWarning::CurrencyUnconverted {
                                from: quote.currency.clone(),
                                to: tenant_currency.clone(),
                                amount: quote.fee.round2(),
                            });
                            quote.fee
                        }
                    }
                } else {
                    quote.fee
                };

                Ok((fee.round2(), breakdown, warnings))
            }
        }
    }
}

fn validate_request(request: &PricingRequest) -> Result<(), PricingError> {
    if request.items.is_empty() {
        return Err(PricingError::InvalidRequest("cart is empty".to_string()));
    }
    for item in &request.items {
        if item.quantity < 1 {
            return Err(PricingError::InvalidRequest(format!(
                "quantity for {} must be at least 1",
                item.item_id
            )));
        }
        for choice in &item.choices {
            if choice.quantity < 1 {
                return Err(PricingError::InvalidRequest(format!(
                    "choice quantity for {} must be at least 1",
                    choice.choice_id
                )));
            }
        }
    }
    if request.tip.is_negative() || request.driver_tip.is_negative() {
        return Err(PricingError::InvalidRequest(
            "tips must be non-negative".to_string(),
        ));
    }
    if request.order_type == OrderType::Delivery
        && request
            .dropoff_address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none()
    {
        return Err(PricingError::InvalidRequest(
            "delivery orders require a dropoff address".to_string(),
        ));
    }
    Ok(())
}

/// Enforce required options and selection-count/quantity bounds before the
/// resolver runs; the resolver itself only prices what it is given.
fn validate_selections(
    items: &[LineItemSpec],
    snapshot: &TenantSnapshot,
) -> Result<(), PricingError> {
    for item in items {
        let rules = snapshot
            .option_rules
            .get(&item.item_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for rule in rules {
            let selected = item
                .choices
                .iter()
                .filter(|c| c.option_id == rule.option_id)
                .count() as i64;

            if rule.required && selected == 0 {
                return Err(PricingError::InvalidRequest(format!(
                    "required option {} has no selection for {}",
                    rule.option_id, item.item_id
                )));
            }

            let Some(def) = option_def(&snapshot.options, rule) else {
                continue;
            };

            if !def.multi_select && selected > 1 {
                return Err(PricingError::InvalidRequest(format!(
                    "option {} allows a single selection",
                    def.name
                )));
            }
            if def.multi_select {
                if rule.required && selected < def.min_selections {
                    return Err(PricingError::InvalidRequest(format!(
                        "option {} requires at least {} selections",
                        def.name, def.min_selections
                    )));
                }
                if def.max_selections > 0 && selected > def.max_selections {
                    return Err(PricingError::InvalidRequest(format!(
                        "option {} allows at most {} selections",
                        def.name, def.max_selections
                    )));
                }
            }
            if def.allow_quantity {
                for choice in item.choices.iter().filter(|c| c.option_id == rule.option_id) {
                    if choice.quantity < def.min_quantity
                        || (def.max_quantity > 0 && choice.quantity > def.max_quantity)
                    {
                        return Err(PricingError::InvalidRequest(format!(
                            "choice quantity for {} is outside [{}, {}]",
                            choice.choice_id, def.min_quantity, def.max_quantity
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

fn option_def<'a>(
    options: &'a [OptionDef],
    rule: &crate::domain::AppliedOptionRule,
) -> Option<&'a OptionDef> {
    options.iter().find(|o| o.id == rule.option_id)
}
