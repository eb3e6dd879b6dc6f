//! HTTP distance resolver backed by the geocoding/distance service.

use super::{DistanceQuote, DistanceResolver, ProviderError};
use crate::domain::{DistanceUnit, Money};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Distance resolver calling the geocoding service's `/v1/distance` endpoint.
///
/// One attempt per call; the shared client carries the bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpDistanceResolver {
    client: Client,
    base_url: String,
}

impl HttpDistanceResolver {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DistanceResolver for HttpDistanceResolver {
    async fn resolve(
        &self,
        origin: &str,
        destination: &str,
        max_radius: Money,
        unit: DistanceUnit,
    ) -> Result<DistanceQuote, ProviderError> {
        debug!(origin, destination, %max_radius, %unit, "resolving distance");

        let url = format!("{}/v1/distance", self.base_url);
        let payload = serde_json::json!({
            "origin": origin,
            "destination": destination,
            "maxRadius": max_radius,
            "unit": unit,
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

        parse_distance_response(&body, unit)
    }
}

fn parse_distance_response(
    body: &serde_json::Value,
    unit: DistanceUnit,
) -> Result<DistanceQuote, ProviderError> {
    let distance = body
        .get("distance")
        .and_then(parse_money)
        .ok_or_else(|| ProviderError::Parse("missing or invalid distance".to_string()))?;

    if distance.is_negative() {
        return Err(ProviderError::Parse(format!(
            "negative distance {}",
            distance
        )));
    }

    let within_radius = body
        .get("withinRadius")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| ProviderError::Parse("missing withinRadius".to_string()))?;

    Ok(DistanceQuote {
        distance,
        unit,
        within_radius,
    })
}

pub(super) fn parse_money(value: &serde_json::Value) -> Option<Money> {
    match value {
        serde_json::Value::String(s) => Money::from_str_canonical(s).ok(),
        serde_json::Value::Number(n) => Money::from_str_canonical(&n.to_string()).ok(),
        _ => None,
    }
}
