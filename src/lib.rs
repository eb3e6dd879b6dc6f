pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{
    DeliveryQuote, DeliveryQuoteProvider, DeliveryQuoteRequest, DistanceQuote, DistanceResolver,
    ExchangeRateSource, ProviderError,
};
pub use db::{init_db, Repository};
pub use domain::{
    LineItemSpec, Money, OrderQuote, OrderType, SelectedChoice, TenantId, TenantSnapshot,
};
pub use error::AppError;
pub use orchestration::{PricingError, PricingOrchestrator, PricingRequest};
