//! Pure calculators for deterministic pricing logic.
//!
//! Nothing here performs I/O. Each calculator is a pure function of the
//! snapshot types in `domain` plus the request, which is what makes one
//! calculation reproducible and independently testable.

pub mod delivery;
pub mod modifiers;
pub mod platform_fee;
pub mod tax;

pub use delivery::{check_deliverable, local_fee, DeliveryRejection, LocalFee};
pub use modifiers::{price_line_item, ResolvedLineItem};
pub use platform_fee::PlatformFeeOutcome;
pub use tax::{TaxCalculationItem, TaxOutcome};
