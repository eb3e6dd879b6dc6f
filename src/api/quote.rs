use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::OrderQuote;
use crate::error::AppError;
use crate::orchestration::PricingRequest;

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub data: OrderQuote,
}

/// Price an order. The same request against an unchanged configuration
/// snapshot returns an identical body, so callers can safely re-quote.
pub async fn post_quote(
    State(state): State<AppState>,
    Json(request): Json<PricingRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let quote = state.orchestrator.price_order(&request).await?;

    Ok(Json(QuoteResponse {
        success: true,
        data: quote,
    }))
}
