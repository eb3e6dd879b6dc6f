//! Tenant profile and financial/delivery configuration operations.

use super::{Repository, TenantProfile};
use crate::domain::{
    DeliveryProviderKind, DeliverySettings, DistanceUnit, Money, PlatformFeeSettings, PricingTier,
    TaxKind, TaxRule, TaxScope, TenantId,
};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

impl Repository {
    /// Insert or update a tenant's identity row.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_tenant(
        &self,
        tenant: &TenantId,
        profile: &TenantProfile,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, name, address, currency, currency_symbol, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                currency = excluded.currency,
                currency_symbol = excluded.currency_symbol
            "#,
        )
        .bind(tenant.as_str())
        .bind(&profile.name)
        .bind(&profile.address)
        .bind(&profile.currency)
        .bind(&profile.currency_symbol)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch a tenant's identity row, if the tenant exists.
    pub async fn fetch_tenant(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantProfile>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT name, address, currency, currency_symbol FROM tenants WHERE id = ?",
        )
        .bind(tenant.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| TenantProfile {
            name: row.get("name"),
            address: row.get("address"),
            currency: row.get("currency"),
            currency_symbol: row.get("currency_symbol"),
        }))
    }

    /// Replace a tenant's tax rules with the given ordered list.
    pub async fn replace_tax_rules(
        &self,
        tenant: &TenantId,
        rules: &[TaxRule],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tax_rules WHERE tenant_id = ?")
            .bind(tenant.as_str())
            .execute(self.pool())
            .await?;

        for (position, rule) in rules.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO tax_rules (tenant_id, position, name, enabled, rate, kind, scope)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(tenant.as_str())
            .bind(position as i64)
            .bind(&rule.name)
            .bind(rule.enabled)
            .bind(rule.rate.to_canonical_string())
            .bind(rule.kind.to_string())
            .bind(rule.scope.to_string())
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    /// Fetch a tenant's tax rules in configured order.
    ///
    /// A row with an unrecognized kind/scope or an unparsable rate is a
    /// configuration error: it is skipped with a recorded warning rather than
    /// failing the read, since one malformed tax must not block checkout.
    pub async fn fetch_tax_rules(&self, tenant: &TenantId) -> Result<Vec<TaxRule>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT name, enabled, rate, kind, scope
            FROM tax_rules
            WHERE tenant_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(tenant.as_str())
        .fetch_all(self.pool())
        .await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            let rate_str: String = row.get("rate");
            let kind_str: String = row.get("kind");
            let scope_str: String = row.get("scope");

            let rate = match Money::from_str(&rate_str) {
                Ok(rate) => rate,
                Err(e) => {
                    warn!(tenant = %tenant, rule = %name, "skipping tax rule with bad rate: {}", e);
                    continue;
                }
            };
            let kind = match TaxKind::from_str(&kind_str) {
                Ok(kind) => kind,
                Err(e) => {
                    warn!(tenant = %tenant, rule = %name, "skipping tax rule: {}", e);
                    continue;
                }
            };
            let scope = match TaxScope::from_str(&scope_str) {
                Ok(scope) => scope,
                Err(e) => {
                    warn!(tenant = %tenant, rule = %name, "skipping tax rule: {}", e);
                    continue;
                }
            };

            rules.push(TaxRule {
                name,
                enabled: row.get("enabled"),
                rate,
                kind,
                scope,
            });
        }

        Ok(rules)
    }

    /// Replace a tenant's delivery settings and pricing tiers.
    pub async fn upsert_delivery_settings(
        &self,
        tenant: &TenantId,
        settings: &DeliverySettings,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO delivery_settings (tenant_id, enabled, distance_unit, maximum_radius, provider)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(tenant_id) DO UPDATE SET
                enabled = excluded.enabled,
                distance_unit = excluded.distance_unit,
                maximum_radius = excluded.maximum_radius,
                provider = excluded.provider
            "#,
        )
        .bind(tenant.as_str())
        .bind(settings.enabled)
        .bind(settings.distance_unit.to_string())
        .bind(settings.maximum_radius.to_canonical_string())
        .bind(settings.provider.to_string())
        .execute(self.pool())
        .await?;

        sqlx::query("DELETE FROM pricing_tiers WHERE tenant_id = ?")
            .bind(tenant.as_str())
            .execute(self.pool())
            .await?;

        for (position, tier) in settings.pricing_tiers.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO pricing_tiers (
                    tenant_id, position, name, distance_covered, base_fee,
                    additional_fee_per_unit, is_default
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(tenant.as_str())
            .bind(position as i64)
            .bind(&tier.name)
            .bind(tier.distance_covered.to_canonical_string())
            .bind(tier.base_fee.to_canonical_string())
            .bind(tier.additional_fee_per_unit.to_canonical_string())
            .bind(tier.is_default)
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    /// Fetch a tenant's delivery settings with tiers in configured order.
    /// Returns None if the tenant has none configured (delivery off).
    pub async fn fetch_delivery_settings(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<DeliverySettings>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT enabled, distance_unit, maximum_radius, provider
            FROM delivery_settings
            WHERE tenant_id = ?
            "#,
        )
        .bind(tenant.as_str())
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let unit_str: String = row.get("distance_unit");
        let radius_str: String = row.get("maximum_radius");
        let provider_str: String = row.get("provider");

        let (Ok(distance_unit), Ok(maximum_radius), Ok(provider)) = (
            DistanceUnit::from_str(&unit_str),
            Money::from_str(&radius_str),
            DeliveryProviderKind::from_str(&provider_str),
        ) else {
            warn!(tenant = %tenant, "delivery settings row is malformed, treating as unconfigured");
            return Ok(None);
        };

        let tier_rows = sqlx::query(
            r#"
            SELECT name, distance_covered, base_fee, additional_fee_per_unit, is_default
            FROM pricing_tiers
            WHERE tenant_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(tenant.as_str())
        .fetch_all(self.pool())
        .await?;

        let mut pricing_tiers = Vec::with_capacity(tier_rows.len());
        for tier_row in tier_rows {
            let name: String = tier_row.get("name");
            let covered: String = tier_row.get("distance_covered");
            let base: String = tier_row.get("base_fee");
            let per_unit: String = tier_row.get("additional_fee_per_unit");

            let (Ok(distance_covered), Ok(base_fee), Ok(additional_fee_per_unit)) = (
                Money::from_str(&covered),
                Money::from_str(&base),
                Money::from_str(&per_unit),
            ) else {
                warn!(tenant = %tenant, tier = %name, "skipping malformed pricing tier");
                continue;
            };

            pricing_tiers.push(PricingTier {
                name,
                distance_covered,
                base_fee,
                additional_fee_per_unit,
                is_default: tier_row.get("is_default"),
            });
        }

        Ok(Some(DeliverySettings {
            enabled: row.get("enabled"),
            distance_unit,
            maximum_radius,
            provider,
            pricing_tiers,
        }))
    }

    /// Insert or update a tenant's platform-fee settings.
    pub async fn upsert_platform_fee_settings(
        &self,
        tenant: &TenantId,
        settings: &PlatformFeeSettings,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO platform_fee_settings (tenant_id, enabled, threshold, below_percent, above_flat)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(tenant_id) DO UPDATE SET
                enabled = excluded.enabled,
                threshold = excluded.threshold,
                below_percent = excluded.below_percent,
                above_flat = excluded.above_flat
            "#,
        )
        .bind(tenant.as_str())
        .bind(settings.enabled)
        .bind(settings.threshold.to_canonical_string())
        .bind(settings.below_percent.to_canonical_string())
        .bind(settings.above_flat.to_canonical_string())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch a tenant's platform-fee settings. Returns None when the tenant
    /// has none configured (no platform fee charged).
    pub async fn fetch_platform_fee_settings(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<PlatformFeeSettings>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT enabled, threshold, below_percent, above_flat
            FROM platform_fee_settings
            WHERE tenant_id = ?
            "#,
        )
        .bind(tenant.as_str())
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let threshold_str: String = row.get("threshold");
        let percent_str: String = row.get("below_percent");
        let flat_str: String = row.get("above_flat");

        let (Ok(threshold), Ok(below_percent), Ok(above_flat)) = (
            Money::from_str(&threshold_str),
            Money::from_str(&percent_str),
            Money::from_str(&flat_str),
        ) else {
            warn!(tenant = %tenant, "platform fee settings row is malformed, treating as unconfigured");
            return Ok(None);
        };

        Ok(Some(PlatformFeeSettings {
            enabled: row.get("enabled"),
            threshold,
            below_percent,
            above_flat,
        }))
    }
}
