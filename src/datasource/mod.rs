//! Provider abstraction for the engine's external dependencies: distance
//! resolution, delivery quoting, and currency conversion.
//!
//! Implementations are injected into the orchestrator at construction time,
//! so tests substitute mocks without touching process-wide state. Each call
//! carries a bounded timeout and makes exactly one attempt; retry policy
//! belongs to the caller, because a retried delivery quote may return a
//! different fee and must be an explicit, auditable decision.

use crate::domain::{DistanceUnit, Money};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod courier;
pub mod exchange;
pub mod geocode;
pub mod mock;

pub use courier::HttpDeliveryQuoteProvider;
pub use exchange::HttpExchangeRateSource;
pub use geocode::HttpDistanceResolver;
pub use mock::{MockDeliveryQuoteProvider, MockDistanceResolver, MockExchangeRateSource};

/// Error type for provider operations. A timeout surfaces as `Network`.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Error: {0}")]
    Other(String),
}

/// A resolved distance between two endpoints, in the tenant's unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceQuote {
    pub distance: Money,
    pub unit: DistanceUnit,
    pub within_radius: bool,
}

/// Resolves two addresses or coordinate pairs into a distance and a
/// radius-compliance flag.
///
/// Absence of a verified distance is always a hard stop for delivery
/// pricing; implementations must never substitute a default distance.
#[async_trait]
pub trait DistanceResolver: Send + Sync + fmt::Debug {
    async fn resolve(
        &self,
        origin: &str,
        destination: &str,
        max_radius: Money,
        unit: DistanceUnit,
    ) -> Result<DistanceQuote, ProviderError>;
}

/// Quote request sent to an external delivery partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryQuoteRequest {
    pub pickup_address: String,
    pub dropoff_address: String,
    pub pickup_name: Option<String>,
    pub dropoff_name: Option<String>,
    pub dropoff_phone: Option<String>,
    pub order_value: Option<Money>,
}

/// A delivery-fee quote from an external partner, in the partner's currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryQuote {
    pub fee: Money,
    pub currency: String,
    pub estimated_minutes: Option<i64>,
    pub carrier_id: Option<String>,
    pub carrier_name: Option<String>,
}

/// Requests delivery-fee quotes from an external delivery partner.
#[async_trait]
pub trait DeliveryQuoteProvider: Send + Sync + fmt::Debug {
    async fn quote(&self, request: &DeliveryQuoteRequest) -> Result<DeliveryQuote, ProviderError>;
}

/// Best-effort currency conversion. Callers treat a failure as "use the
/// original amount and flag it", never as an abort.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync + fmt::Debug {
    async fn convert(&self, amount: Money, from: &str, to: &str) -> Result<Money, ProviderError>;
}
