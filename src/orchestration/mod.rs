//! Orchestration: the fixed pricing pipeline over engine + providers + store.

pub mod orchestrator;

pub use orchestrator::{PricingError, PricingOrchestrator, PricingRequest};
