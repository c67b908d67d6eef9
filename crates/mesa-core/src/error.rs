//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError::InvalidInput      - a single input is out of bounds    │
//! │  │     └── ValidationError        - which field, and why               │
//! │  ├── CoreError::InfeasiblePricing - inputs valid, but jointly          │
//! │  │                                  impossible to price                │
//! │  └── CoreError::Overflow          - a derived figure left f64 range    │
//! │                                                                         │
//! │  simulator errors (separate crate)                                     │
//! │  └── SimError                     - settings, files, CLI               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SimError → user                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Advisory conditions (high food cost, thin margins) are NOT errors. They
//! are reported by [`crate::advisory`] on a successfully computed result.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
///
/// The two variants are deliberately distinct: `InvalidInput` means the
/// caller sent a value that can never be priced, `InfeasiblePricing` means
/// every value was individually fine but the combination cannot produce a
/// finite, positive price.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An input failed validation.
    ///
    /// ## When This Occurs
    /// - Desired margin of 100% or more
    /// - Negative monthly sales volume
    /// - Unrecognized tax regime string
    /// - Negative or non-finite money amounts
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The tax burden consumes the whole base price.
    ///
    /// ## When This Occurs
    /// ```text
    /// basePrice = 10.00
    ///      │
    ///      ▼
    /// taxes(basePrice) = 10.00 or more
    ///      │
    ///      ▼
    /// suggestedPrice = basePrice / (1 - taxes/basePrice) → ∞ or negative
    ///      │
    ///      ▼
    /// InfeasiblePricing { base_price: 10.00, tax_total: 10.00 }
    /// ```
    /// A zero base price (nothing to cover) also lands here.
    #[error("Infeasible pricing: taxes of {tax_total:.2} consume the base price of {base_price:.2}")]
    InfeasiblePricing { base_price: f64, tax_total: f64 },

    /// A derived figure is NaN or infinite.
    ///
    /// ## When This Occurs
    /// - Astronomical inputs, e.g. a cost near `f64::MAX` or a sales volume
    ///   near `i64::MAX`, whose products no longer fit in an `f64`
    #[error("Pricing overflow: {field} is not a finite number")]
    Overflow { field: String },
}

impl CoreError {
    /// Returns true for jointly-infeasible inputs (as opposed to a bad field).
    pub fn is_infeasible(&self) -> bool {
        matches!(self, CoreError::InfeasiblePricing { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any formula runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is outside its inclusive range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Numeric value must stay strictly below a bound.
    #[error("{field} must be below {max}, got {value}")]
    MustBeBelow { field: String, max: f64, value: f64 },

    /// Value must be zero or more.
    #[error("{field} must not be negative, got {value}")]
    MustBeNonNegative { field: String, value: f64 },

    /// NaN or infinity.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value is not in allowed set.
    #[error("{field} '{value}' is not one of: {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Invalid format (e.g., malformed JSON document).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
