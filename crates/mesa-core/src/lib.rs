//! # mesa-core: Pure Pricing Logic for Mesa
//!
//! This crate is the **heart** of Mesa's pricing simulator. It contains the
//! tax engine, the menu-item pricing calculator and the advisory rules as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mesa Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Web frontend / pricing-sim (presentation)             │   │
//! │  │    Pricing form ──► Result table ──► Alert panel                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ RestaurantConfig + PricingRequest      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mesa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────┐          │   │
//! │  │   │    tax    │ ───► │  pricing  │ ───► │ advisory  │          │   │
//! │  │   │ TaxPolicy │      │ Calculator│      │  review   │          │   │
//! │  │   └───────────┘      └───────────┘      └───────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL CONFIG • PURE FUNCTIONS                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Value records (RestaurantConfig, PricingResult, ...)
//! - [`tax`] - Tax engine per regime
//! - [`pricing`] - Price / margin / break-even calculator
//! - [`advisory`] - Healthy-pricing rules
//! - [`policy`] - Overridable rates and thresholds
//! - [`validation`] - Validated input types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, bit for bit
//! 2. **Explicit Configuration**: `RestaurantConfig` and `PricingPolicy`
//!    are parameters, never ambient state
//! 3. **Validate at the Boundary**: formulas only see validated types
//! 4. **Explicit Errors**: invalid input and infeasible pricing are
//!    distinct, typed errors; nothing silently becomes `NaN` or `Infinity`
//!
//! ## Example Usage
//!
//! ```rust
//! use mesa_core::advisory::review_pricing;
//! use mesa_core::pricing::price_item;
//! use mesa_core::{PricingPolicy, PricingRequest, RestaurantConfig, TaxRegime};
//!
//! let config = RestaurantConfig::from_json(r#"{"fixedExpenses": 15000}"#).unwrap();
//! let policy = PricingPolicy::default();
//!
//! let request = PricingRequest {
//!     name: Some("Risoto".to_string()),
//!     cost_per_unit: 18.0,
//!     unit_size: 1.0,
//!     waste_percentage: 10.0,
//!     operational_cost_percentage: 25.0,
//!     desired_margin_percentage: 30.0,
//!     monthly_sales_volume: 2000,
//!     tax_regime: TaxRegime::SimplesNacional,
//! };
//!
//! let result = price_item(&request, &config, &policy).unwrap();
//! let advisories = review_pricing(&result, &policy.advisory);
//!
//! assert_eq!(result.total_cost, result.total_cost_before_tax + result.taxes.total);
//! assert!(!advisories.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod advisory;
pub mod error;
pub mod policy;
pub mod pricing;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mesa_core::PricingResult` instead of
// `use mesa_core::types::PricingResult`

pub use advisory::{Advisory, AdvisoryKind, Severity};
pub use error::{CoreError, CoreResult, ValidationError};
pub use policy::{AdvisoryThresholds, PricingPolicy, TaxPolicy};
pub use types::*;
