//! # Validation Module
//!
//! Input validation for the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend / CLI                                               │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: PricingRequest::validate                                     │
//! │  └── THIS MODULE: builds Percentage / MarginPercentage / SalesVolume   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Formulas                                                     │
//! │  └── Only see validated types, so no division-by-zero checks for      │
//! │      margin or volume are scattered through the math                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::validation::{MarginPercentage, SalesVolume};
//!
//! let margin = MarginPercentage::new(30.0).unwrap();
//! assert!((margin.fraction() - 0.3).abs() < 1e-12);
//!
//! assert!(MarginPercentage::new(100.0).is_err());
//! assert!(SalesVolume::from_signed(-1).is_err());
//! ```

use serde::Serialize;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a money amount or physical quantity.
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative (zero is allowed)
///
/// ## Example
/// ```rust
/// use mesa_core::validation::validate_amount;
///
/// assert!(validate_amount("cost_per_unit", 18.0).is_ok());
/// assert!(validate_amount("cost_per_unit", 0.0).is_ok());
/// assert!(validate_amount("cost_per_unit", -1.0).is_err());
/// assert!(validate_amount("cost_per_unit", f64::NAN).is_err());
/// ```
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
            value,
        });
    }

    Ok(value)
}

/// Validates a percentage in the inclusive range 0-100.
pub fn validate_percentage(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
            value,
        });
    }

    Ok(value)
}

// =============================================================================
// Validated Types
// =============================================================================

/// A percentage guaranteed to be finite and within 0-100.
///
/// Used for waste and operational overhead.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Creates a percentage, rejecting values outside 0-100.
    pub fn new(value: f64) -> ValidationResult<Self> {
        Self::for_field("percentage", value)
    }

    /// Same as [`Percentage::new`], naming the field in the error.
    pub fn for_field(field: &str, value: f64) -> ValidationResult<Self> {
        validate_percentage(field, value).map(Percentage)
    }

    /// Returns the value in percent (e.g. `12.5`).
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value as a fraction (e.g. `0.125`).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

/// A target margin guaranteed to satisfy `0 <= m < 100`.
///
/// ## Why Strictly Below 100?
/// ```text
/// basePrice = totalCostBeforeTax / (1 - margin/100)
///
///   margin = 100  →  division by zero
///   margin > 100  →  negative price
/// ```
/// Constructing this type is the only place that check happens.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MarginPercentage(f64);

impl MarginPercentage {
    /// Creates a margin, rejecting values outside `[0, 100)`.
    pub fn new(value: f64) -> ValidationResult<Self> {
        Self::for_field("desired_margin_percentage", value)
    }

    /// Same as [`MarginPercentage::new`], naming the field in the error.
    pub fn for_field(field: &str, value: f64) -> ValidationResult<Self> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }

        if value < 0.0 {
            return Err(ValidationError::MustBeNonNegative {
                field: field.to_string(),
                value,
            });
        }

        if value >= 100.0 {
            return Err(ValidationError::MustBeBelow {
                field: field.to_string(),
                max: 100.0,
                value,
            });
        }

        Ok(MarginPercentage(value))
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

/// Monthly number of units sold. Zero is valid and disables fixed-cost
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct SalesVolume(u64);

impl SalesVolume {
    /// Creates a volume from an unsigned count.
    #[inline]
    pub const fn new(units: u64) -> Self {
        SalesVolume(units)
    }

    /// Creates a volume from a signed count, rejecting negatives.
    ///
    /// ## Example
    /// ```rust
    /// use mesa_core::validation::SalesVolume;
    ///
    /// assert_eq!(SalesVolume::from_signed(2000).unwrap().units(), 2000);
    /// assert!(SalesVolume::from_signed(-10).is_err());
    /// ```
    pub fn from_signed(units: i64) -> ValidationResult<Self> {
        u64::try_from(units)
            .map(SalesVolume)
            .map_err(|_| ValidationError::MustBeNonNegative {
                field: "monthly_sales_volume".to_string(),
                value: units as f64,
            })
    }

    #[inline]
    pub const fn units(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the volume as a float for use in the formulas.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("x", 0.0).is_ok());
        assert!(validate_amount("x", 15000.0).is_ok());

        assert!(validate_amount("x", -0.01).is_err());
        assert!(validate_amount("x", f64::INFINITY).is_err());
        assert!(validate_amount("x", f64::NAN).is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(Percentage::new(0.0).is_ok());
        assert!(Percentage::new(100.0).is_ok());
        assert!(Percentage::new(12.5).is_ok());

        assert!(Percentage::new(-1.0).is_err());
        assert!(Percentage::new(100.01).is_err());
        assert!(Percentage::new(f64::NAN).is_err());
    }

    #[test]
    fn test_percentage_error_names_field() {
        let err = Percentage::for_field("waste_percentage", 150.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "waste_percentage".to_string(),
                min: 0.0,
                max: 100.0,
                value: 150.0,
            }
        );
    }

    #[test]
    fn test_margin_bounds() {
        assert!(MarginPercentage::new(0.0).is_ok());
        assert!(MarginPercentage::new(99.99).is_ok());

        assert!(matches!(
            MarginPercentage::new(100.0),
            Err(ValidationError::MustBeBelow { .. })
        ));
        assert!(matches!(
            MarginPercentage::new(150.0),
            Err(ValidationError::MustBeBelow { .. })
        ));
        assert!(matches!(
            MarginPercentage::new(-5.0),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[test]
    fn test_sales_volume() {
        assert!(SalesVolume::from_signed(0).unwrap().is_zero());
        assert_eq!(SalesVolume::from_signed(2000).unwrap().units(), 2000);
        assert!(SalesVolume::from_signed(-1).is_err());
        assert_eq!(SalesVolume::new(3).as_f64(), 3.0);
    }
}
