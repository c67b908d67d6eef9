//! # Pricing Policy
//!
//! Named, overridable policy constants used by the formulas.
//!
//! Tax law changes over time and differs between states, so none of the
//! rates live inline in the formulas. Defaults reproduce the reference
//! behavior; a settings file can override any single value.
//!
//! ## Policy Layout
//! ```toml
//! break_even_buffer_percentage = 5.0
//!
//! [tax]
//! default_state_icms_rate = 12.0
//! simples_nacional_rate = 12.0
//!
//! [advisory]
//! food_cost_max = 35.0
//! net_margin_min = 15.0
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::validation::validate_percentage;

// =============================================================================
// Tax Policy
// =============================================================================

/// Fixed-rate approximation of each regime's taxes, in percent of revenue.
///
/// This is not a tax-law implementation: every rate is applied flat to
/// revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    /// ICMS used when neither the call nor the restaurant names one.
    pub default_state_icms_rate: f64,

    /// Unified Simples Nacional rate.
    pub simples_nacional_rate: f64,
    /// ISS share reported inside the Simples Nacional total.
    pub simples_nacional_iss_share: f64,

    pub presumido_iss_rate: f64,
    pub presumido_pis_rate: f64,
    pub presumido_cofins_rate: f64,
    pub presumido_irpj_rate: f64,
    pub presumido_csll_rate: f64,

    pub real_iss_rate: f64,
    pub real_pis_rate: f64,
    pub real_cofins_rate: f64,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            default_state_icms_rate: 12.0,
            simples_nacional_rate: 12.0,
            simples_nacional_iss_share: 2.0,
            presumido_iss_rate: 5.0,
            presumido_pis_rate: 0.65,
            presumido_cofins_rate: 3.0,
            presumido_irpj_rate: 1.5,
            presumido_csll_rate: 0.9,
            real_iss_rate: 5.0,
            real_pis_rate: 1.65,
            real_cofins_rate: 7.6,
        }
    }
}

impl TaxPolicy {
    /// Every rate must be a percentage in 0-100.
    pub fn validate(&self) -> CoreResult<()> {
        let rates = [
            ("tax.default_state_icms_rate", self.default_state_icms_rate),
            ("tax.simples_nacional_rate", self.simples_nacional_rate),
            ("tax.simples_nacional_iss_share", self.simples_nacional_iss_share),
            ("tax.presumido_iss_rate", self.presumido_iss_rate),
            ("tax.presumido_pis_rate", self.presumido_pis_rate),
            ("tax.presumido_cofins_rate", self.presumido_cofins_rate),
            ("tax.presumido_irpj_rate", self.presumido_irpj_rate),
            ("tax.presumido_csll_rate", self.presumido_csll_rate),
            ("tax.real_iss_rate", self.real_iss_rate),
            ("tax.real_pis_rate", self.real_pis_rate),
            ("tax.real_cofins_rate", self.real_cofins_rate),
        ];

        for (field, rate) in rates {
            validate_percentage(field, rate)?;
        }

        Ok(())
    }
}

// =============================================================================
// Advisory Thresholds
// =============================================================================

/// Boundaries used by [`crate::advisory::review_pricing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryThresholds {
    /// Food cost above this is an error.
    pub food_cost_max: f64,
    /// Food cost above this (and up to `food_cost_max`) is a warning.
    pub food_cost_warning: f64,
    /// Net margin below this is an error.
    pub net_margin_min: f64,
    /// Net margin below this (and at least `net_margin_min`) is a warning.
    pub net_margin_warning: f64,
    /// Distance between suggested and break-even price below this is an error.
    pub safety_margin_min: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        AdvisoryThresholds {
            food_cost_max: 35.0,
            food_cost_warning: 30.0,
            net_margin_min: 15.0,
            net_margin_warning: 20.0,
            safety_margin_min: 10.0,
        }
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Everything the engine treats as policy rather than input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Safety buffer applied on top of total cost to get the break-even
    /// price, in percent. 5.0 means `break_even = total_cost × 1.05`.
    pub break_even_buffer_percentage: f64,

    pub tax: TaxPolicy,

    pub advisory: AdvisoryThresholds,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            break_even_buffer_percentage: 5.0,
            tax: TaxPolicy::default(),
            advisory: AdvisoryThresholds::default(),
        }
    }
}

impl PricingPolicy {
    /// Validates rates and thresholds.
    ///
    /// ## Rules
    /// - All rates and thresholds are percentages in 0-100
    /// - Warning thresholds must sit on the safe side of their error
    ///   threshold (`food_cost_warning <= food_cost_max`,
    ///   `net_margin_warning >= net_margin_min`)
    pub fn validate(&self) -> CoreResult<()> {
        validate_percentage(
            "break_even_buffer_percentage",
            self.break_even_buffer_percentage,
        )?;
        self.tax.validate()?;

        let a = &self.advisory;
        validate_percentage("advisory.food_cost_max", a.food_cost_max)?;
        validate_percentage("advisory.net_margin_min", a.net_margin_min)?;
        validate_percentage("advisory.safety_margin_min", a.safety_margin_min)?;

        if !(0.0..=a.food_cost_max).contains(&a.food_cost_warning) {
            return Err(ValidationError::OutOfRange {
                field: "advisory.food_cost_warning".to_string(),
                min: 0.0,
                max: a.food_cost_max,
                value: a.food_cost_warning,
            }
            .into());
        }
        if !(a.net_margin_min..=100.0).contains(&a.net_margin_warning) {
            return Err(ValidationError::OutOfRange {
                field: "advisory.net_margin_warning".to_string(),
                min: a.net_margin_min,
                max: 100.0,
                value: a.net_margin_warning,
            }
            .into());
        }

        Ok(())
    }

    /// Multiplier applied to total cost for the break-even price.
    #[inline]
    pub fn break_even_factor(&self) -> f64 {
        1.0 + self.break_even_buffer_percentage / 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
