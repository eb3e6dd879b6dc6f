//! HTTP client for the external delivery-quote partner.

use super::{geocode::parse_money, DeliveryQuote, DeliveryQuoteProvider, DeliveryQuoteRequest, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Delivery-quote client calling the partner's `/v1/quotes` endpoint.
///
/// A missing fee in an otherwise successful response is a parse error, not a
/// zero-fee quote; the orchestrator must never fall back to local tiers for
/// an externally routed order.
#[derive(Debug, Clone)]
pub struct HttpDeliveryQuoteProvider {
    client: Client,
    base_url: String,
}

impl HttpDeliveryQuoteProvider {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DeliveryQuoteProvider for HttpDeliveryQuoteProvider {
    async fn quote(&self, request: &DeliveryQuoteRequest) -> Result<DeliveryQuote, ProviderError> {
        debug!(
            pickup = %request.pickup_address,
            dropoff = %request.dropoff_address,
            "requesting delivery quote"
        );

        let url = format!("{}/v1/quotes", self.base_url);
        let payload = serde_json::json!({
            "pickupAddress": request.pickup_address,
            "dropoffAddress": request.dropoff_address,
            "pickupName": request.pickup_name,
            "dropoffName": request.dropoff_name,
            "dropoffPhone": request.dropoff_phone,
            "orderValue": request.order_value,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: if status.is_server_error() {
                    "Server error".to_string()
                } else {
                    "Client error".to_string()
                },
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parse_quote_response(&body)
    }
}

fn parse_quote_response(body: &serde_json::Value) -> Result<DeliveryQuote, ProviderError> {
    let fee = body
        .get("fee")
        .and_then(parse_money)
        .ok_or_else(|| ProviderError::Parse("missing or invalid fee".to_string()))?;

    if fee.is_negative() {
        return Err(ProviderError::Parse(format!("negative fee {}", fee)));
    }

    let currency = body
        .get("currency")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::Parse("missing currency".to_string()))?
        .to_string();

    Ok(DeliveryQuote {
        fee,
        currency,
        estimated_minutes: body.get("estimatedMinutes").and_then(|v| v.as_i64()),
        carrier_id: body
            .get("carrierId")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        carrier_name: body
            .get("carrierName")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    })
}
