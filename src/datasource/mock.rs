//! Mock providers for testing without network calls.

use super::{
    DeliveryQuote, DeliveryQuoteProvider, DeliveryQuoteRequest, DistanceQuote, DistanceResolver,
    ExchangeRateSource, ProviderError,
};
use crate::domain::{DistanceUnit, Money};
use async_trait::async_trait;

/// Mock distance resolver returning a fixed distance or a fixed failure.
#[derive(Debug, Clone)]
pub struct MockDistanceResolver {
    distance: Option<Money>,
    error: Option<ProviderError>,
}

impl MockDistanceResolver {
    /// Resolver that always reports the given distance; `within_radius` is
    /// derived from the max radius the caller passes, like the real service.
    pub fn with_distance(distance: Money) -> Self {
        Self {
            distance: Some(distance),
            error: None,
        }
    }

    /// Resolver that always fails.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            distance: None,
            error: Some(error),
        }
    }
}

#[async_trait]
impl DistanceResolver for MockDistanceResolver {
    async fn resolve(
        &self,
        _origin: &str,
        _destination: &str,
        max_radius: Money,
        unit: DistanceUnit,
    ) -> Result<DistanceQuote, ProviderError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let distance = self
            .distance
            .ok_or_else(|| ProviderError::Other("mock has no distance".to_string()))?;
        Ok(DistanceQuote {
            distance,
            unit,
            within_radius: distance <= max_radius,
        })
    }
}

/// Mock delivery-quote provider returning a fixed quote or a fixed failure.
#[derive(Debug, Clone)]
pub struct MockDeliveryQuoteProvider {
    quote: Option<DeliveryQuote>,
    error: Option<ProviderError>,
}

impl MockDeliveryQuoteProvider {
    pub fn with_quote(quote: DeliveryQuote) -> Self {
        Self {
            quote: Some(quote),
            error: None,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            quote: None,
            error: Some(error),
        }
    }
}

#[async_trait]
impl DeliveryQuoteProvider for MockDeliveryQuoteProvider {
    async fn quote(&self, _request: &DeliveryQuoteRequest) -> Result<DeliveryQuote, ProviderError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.quote
            .clone()
            .ok_or_else(|| ProviderError::Other("mock has no quote".to_string()))
    }
}

/// Mock exchange-rate source applying a fixed rate or failing.
#[derive(Debug, Clone)]
pub struct MockExchangeRateSource {
    rate: Option<Money>,
    error: Option<ProviderError>,
}

impl MockExchangeRateSource {
    /// Converts by multiplying with a fixed rate, regardless of currencies.
    pub fn with_rate(rate: Money) -> Self {
        Self {
            rate: Some(rate),
            error: None,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            rate: None,
            error: Some(error),
        }
    }
}

#[async_trait]
impl ExchangeRateSource for MockExchangeRateSource {
    async fn convert(&self, amount: Money, _from: &str, _to: &str) -> Result<Money, ProviderError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let rate = self
            .rate
            .ok_or_else(|| ProviderError::Other("mock has no rate".to_string()))?;
        Ok(amount * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str_canonical(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_distance_derives_within_radius() {
        let resolver = MockDistanceResolver::with_distance(money("12"));
        let quote = resolver
            .resolve("a", "b", money("10"), DistanceUnit::Km)
            .await
            .unwrap();
        assert!(!quote.within_radius);

        let quote = resolver
            .resolve("a", "b", money("15"), DistanceUnit::Km)
            .await
            .unwrap();
        assert!(quote.within_radius);
    }

    #[tokio::test]
    async fn test_mock_distance_failure() {
        let resolver =
            MockDistanceResolver::failing(ProviderError::Network("unreachable".to_string()));
        let err = resolver
            .resolve("a", "b", money("10"), DistanceUnit::Km)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[tokio::test]
    async fn test_mock_exchange_applies_rate() {
        let source = MockExchangeRateSource::with_rate(money("0.9"));
        let converted = source.convert(money("10"), "USD", "EUR").await.unwrap();
        assert_eq!(converted, money("9"));
    }

    #[tokio::test]
    async fn test_mock_courier_returns_quote() {
        let provider = MockDeliveryQuoteProvider::with_quote(DeliveryQuote {
            fee: money("7.20"),
            currency: "USD".to_string(),
            estimated_minutes: Some(30),
            carrier_id: None,
            carrier_name: Some("FleetCo".to_string()),
        });
        let request = DeliveryQuoteRequest {
            pickup_address: "1 Main St".to_string(),
            dropoff_address: "2 Side St".to_string(),
            pickup_name: None,
            dropoff_name: None,
            dropoff_phone: None,
            order_value: None,
        };
        let quote = provider.quote(&request).await.unwrap();
        assert_eq!(quote.fee, money("7.20"));
    }
}
