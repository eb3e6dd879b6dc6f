//! Best-effort currency conversion client.

use super::{geocode::parse_money, ExchangeRateSource, ProviderError};
use crate::domain::Money;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Conversion client calling the exchange service's `/v1/convert` endpoint.
///
/// The orchestrator treats any error here as "keep the original amount and
/// flag the quote"; this client only reports, it never substitutes.
#[derive(Debug, Clone)]
pub struct HttpExchangeRateSource {
    client: Client,
    base_url: String,
}

impl HttpExchangeRateSource {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl ExchangeRateSource for HttpExchangeRateSource {
    async fn convert(&self, amount: Money, from: &str, to: &str) -> Result<Money, ProviderError> {
        debug!(%amount, from, to, "converting currency");

        let url = format!("{}/v1/convert", self.base_url);
        let payload = serde_json::json!({
            "amount": amount,
            "from": from,
            "to": to,
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

        parse_convert_response(&body)
    }
}

fn parse_convert_response(body: &serde_json::Value) -> Result<Money, ProviderError> {
    let amount = body
        .get("amount")
        .and_then(parse_money)
        .ok_or_else(|| ProviderError::Parse("missing or invalid amount".to_string()))?;

    if amount.is_negative() {
        return Err(ProviderError::Parse(format!("negative amount {}", amount)));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_response() {
        let body = serde_json::json!({"amount": 6.61});
        let amount = parse_convert_response(&body).unwrap();
        assert_eq!(amount.to_canonical_string(), "6.61");
    }

    #[test]
    fn test_parse_convert_missing_amount_is_error() {
        let body = serde_json::json!({"rate": 0.92});
        let err = parse_convert_response(&body).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
