//! Request-side cart types: what the checkout flow hands to the engine.

use serde::{Deserialize, Serialize};

/// Identifier newtypes keep tenant, item, option, and choice ids from being
/// swapped for one another at call sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: String) -> Self {
        TenantId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: String) -> Self {
        ItemId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn new(id: String) -> Self {
        OptionId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChoiceId(pub String);

impl ChoiceId {
    pub fn new(id: String) -> Self {
        ChoiceId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the order will be fulfilled. Only `Delivery` triggers distance
/// resolution and delivery-fee pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Pickup,
    Delivery,
    DineIn,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Pickup => write!(f, "pickup"),
            OrderType::Delivery => write!(f, "delivery"),
            OrderType::DineIn => write!(f, "dine_in"),
        }
    }
}

/// A customer's pick within an option (e.g. "Size" -> "Large").
///
/// `quantity` only matters when the option definition allows per-choice
/// quantity; otherwise it is treated as 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedChoice {
    pub option_id: OptionId,
    pub choice_id: ChoiceId,
    #[serde(default = "default_choice_quantity")]
    pub quantity: i64,
}

fn default_choice_quantity() -> i64 {
    1
}

/// One cart line as submitted by the checkout flow. Immutable once passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSpec {
    pub item_id: ItemId,
    pub quantity: i64,
    #[serde(default)]
    pub choices: Vec<SelectedChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
