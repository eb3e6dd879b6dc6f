//! Catalog operations and snapshot assembly.

use super::Repository;
use crate::domain::{
    AppliedOptionRule, ChoiceAdjustment, DeliveryProviderKind, DeliverySettings, DistanceUnit,
    FinancialSettings, ItemId, MenuItem, Money, OptionDef, OptionId, PlatformFeeSettings, TenantId,
    TenantSnapshot,
};
use sqlx::Row;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

impl Repository {
    /// Insert or update a menu item.
    pub async fn upsert_menu_item(
        &self,
        tenant: &TenantId,
        item: &MenuItem,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (tenant_id, id, name, price)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(tenant_id, id) DO UPDATE SET
                name = excluded.name,
                price = excluded.price
            "#,
        )
        .bind(tenant.as_str())
        .bind(item.id.as_str())
        .bind(&item.name)
        .bind(item.price.to_canonical_string())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch menu items by id. Items not present in the catalog are simply
    /// absent from the result; the caller decides whether that aborts.
    pub async fn fetch_menu_items(
        &self,
        tenant: &TenantId,
        ids: &[ItemId],
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let mut items = Vec::with_capacity(ids.len());

        for id in ids {
            let row = sqlx::query(
                "SELECT id, name, price FROM menu_items WHERE tenant_id = ? AND id = ?",
            )
            .bind(tenant.as_str())
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;

            let Some(row) = row else {
                continue;
            };

            let price_str: String = row.get("price");
            let Ok(price) = Money::from_str(&price_str) else {
                warn!(tenant = %tenant, item = %id, "skipping menu item with bad price");
                continue;
            };

            items.push(MenuItem {
                id: ItemId::new(row.get("id")),
                name: row.get("name"),
                price,
            });
        }

        Ok(items)
    }

    /// Insert or update an option definition (stored as canonical JSON).
    pub async fn upsert_option(
        &self,
        tenant: &TenantId,
        option: &OptionDef,
    ) -> Result<(), sqlx::Error> {
        let definition = serde_json::to_string(option)
            .map_err(|e| sqlx::Error::Protocol(format!("option serialization failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO options (tenant_id, id, definition)
            VALUES (?, ?, ?)
            ON CONFLICT(tenant_id, id) DO UPDATE SET definition = excluded.definition
            "#,
        )
        .bind(tenant.as_str())
        .bind(option.id.as_str())
        .bind(definition)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch all option definitions for a tenant.
    pub async fn fetch_options(&self, tenant: &TenantId) -> Result<Vec<OptionDef>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, definition FROM options WHERE tenant_id = ? ORDER BY id")
            .bind(tenant.as_str())
            .fetch_all(self.pool())
            .await?;

        let mut options = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let definition: String = row.get("definition");
            match serde_json::from_str::<OptionDef>(&definition) {
                Ok(option) => options.push(option),
                Err(e) => {
                    warn!(tenant = %tenant, option = %id, "skipping malformed option definition: {}", e);
                }
            }
        }

        Ok(options)
    }

    /// Insert or update one applied option rule for a menu item.
    pub async fn upsert_option_rule(
        &self,
        tenant: &TenantId,
        menu_item: &ItemId,
        rule: &AppliedOptionRule,
    ) -> Result<(), sqlx::Error> {
        let adjustments = serde_json::to_string(&rule.choice_adjustments)
            .map_err(|e| sqlx::Error::Protocol(format!("rule serialization failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO item_option_rules (
                tenant_id, menu_item_id, option_id, required, position, choice_adjustments
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(tenant_id, menu_item_id, option_id) DO UPDATE SET
                required = excluded.required,
                position = excluded.position,
                choice_adjustments = excluded.choice_adjustments
            "#,
        )
        .bind(tenant.as_str())
        .bind(menu_item.as_str())
        .bind(rule.option_id.as_str())
        .bind(rule.required)
        .bind(rule.order)
        .bind(adjustments)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch applied option rules for the given items, each item's rules in
    /// configured order.
    pub async fn fetch_applied_option_rules(
        &self,
        tenant: &TenantId,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, Vec<AppliedOptionRule>>, sqlx::Error> {
        let mut rules_by_item: HashMap<ItemId, Vec<AppliedOptionRule>> = HashMap::new();

        for item_id in item_ids {
            let rows = sqlx::query(
                r#"
                SELECT option_id, required, position, choice_adjustments
                FROM item_option_rules
                WHERE tenant_id = ? AND menu_item_id = ?
                ORDER BY position ASC
                "#,
            )
            .bind(tenant.as_str())
            .bind(item_id.as_str())
            .fetch_all(self.pool())
            .await?;

            let mut rules = Vec::with_capacity(rows.len());
            for row in rows {
                let option_id: String = row.get("option_id");
                let adjustments_json: String = row.get("choice_adjustments");
                let choice_adjustments =
                    match serde_json::from_str::<Vec<ChoiceAdjustment>>(&adjustments_json) {
                        Ok(adjustments) => adjustments,
                        Err(e) => {
                            warn!(
                                tenant = %tenant, item = %item_id, option = %option_id,
                                "skipping malformed option rule: {}", e
                            );
                            continue;
                        }
                    };

                rules.push(AppliedOptionRule {
                    option_id: OptionId::new(option_id),
                    required: row.get("required"),
                    order: row.get("position"),
                    choice_adjustments,
                });
            }

            if !rules.is_empty() {
                rules_by_item.insert(item_id.clone(), rules);
            }
        }

        Ok(rules_by_item)
    }

    /// Assemble the immutable snapshot one calculation reads. Returns None
    /// when the tenant does not exist. Missing delivery or platform-fee
    /// configuration degrades to the disabled defaults; a delivery order
    /// against the disabled default fails predictably downstream.
    pub async fn load_snapshot(
        &self,
        tenant: &TenantId,
        item_ids: &[ItemId],
    ) -> Result<Option<TenantSnapshot>, sqlx::Error> {
        let Some(profile) = self.fetch_tenant(tenant).await? else {
            return Ok(None);
        };

        let tax_rules = self.fetch_tax_rules(tenant).await?;
        let platform_fee = self
            .fetch_platform_fee_settings(tenant)
            .await?
            .unwrap_or(PlatformFeeSettings {
                enabled: false,
                threshold: Money::zero(),
                below_percent: Money::zero(),
                above_flat: Money::zero(),
            });
        let delivery = self
            .fetch_delivery_settings(tenant)
            .await?
            .unwrap_or(DeliverySettings {
                enabled: false,
                distance_unit: DistanceUnit::Km,
                maximum_radius: Money::from_i64(1),
                provider: DeliveryProviderKind::Local,
                pricing_tiers: Vec::new(),
            });

        let menu_items = self
            .fetch_menu_items(tenant, item_ids)
            .await?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        let option_rules = self.fetch_applied_option_rules(tenant, item_ids).await?;
        let options = self.fetch_options(tenant).await?;

        Ok(Some(TenantSnapshot {
            financial: FinancialSettings {
                tax_rules,
                platform_fee,
                currency: profile.currency,
                currency_symbol: profile.currency_symbol,
            },
            delivery,
            restaurant_address: profile.address,
            restaurant_name: profile.name,
            menu_items,
            option_rules,
            options,
        }))
    }
}
