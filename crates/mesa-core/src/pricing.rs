//! # Pricing Calculator
//!
//! Computes the full cost / price / margin breakdown for one menu item.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cost_per_unit × unit_size                     → base_cost              │
//! │  base_cost × (1 + waste%)                      → cost_with_waste        │
//! │  cost_with_waste × operational%                → operational_cost       │
//! │  fixed_expenses / volume  (0 if volume = 0)    → fixed_cost_per_unit    │
//! │  sum of the three above                        → total_cost_before_tax  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_cost_before_tax / (1 - margin%)         → base_price             │
//! │  TaxEngine(base_price, regime)                 → taxes                  │
//! │  base_price / (1 - taxes/base_price)           → suggested_price        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_cost_before_tax + taxes                 → total_cost             │
//! │  total_cost × (1 + buffer%)                    → break_even_price       │
//! │  margins, food cost %, monthly figures, contribution margin             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The order matters: later steps use the unrounded values of earlier ones.
//! Nothing is rounded inside the engine; rounding is a display concern.
//!
//! ## Example
//! ```rust
//! use mesa_core::pricing::price_item;
//! use mesa_core::{PricingPolicy, PricingRequest, RestaurantConfig, TaxRegime};
//!
//! let config = RestaurantConfig {
//!     fixed_expenses: 15000.0,
//!     ..RestaurantConfig::default()
//! };
//! let request = PricingRequest {
//!     name: None,
//!     cost_per_unit: 18.0,
//!     unit_size: 1.0,
//!     waste_percentage: 10.0,
//!     operational_cost_percentage: 25.0,
//!     desired_margin_percentage: 30.0,
//!     monthly_sales_volume: 2000,
//!     tax_regime: TaxRegime::SimplesNacional,
//! };
//!
//! let result = price_item(&request, &config, &PricingPolicy::default()).unwrap();
//! assert!((result.suggested_price - 52.3539).abs() < 1e-3);
//! assert!((result.net_margin - 27.84).abs() < 1e-9);
//! ```

use crate::error::{CoreError, CoreResult};
use crate::policy::PricingPolicy;
use crate::types::{PricingInput, PricingRequest, PricingResult, RestaurantConfig, TaxRegime};
use crate::validation::validate_amount;

/// Validates a raw request and prices it.
pub fn price_item(
    request: &PricingRequest,
    config: &RestaurantConfig,
    policy: &PricingPolicy,
) -> CoreResult<PricingResult> {
    let input = request.validate()?;
    calculate_pricing(&input, config, policy)
}

/// Prices one item from validated input.
///
/// ## Arguments
/// * `input` - Validated item costs, margin target, volume and regime
/// * `config` - Restaurant settings; `fixed_expenses` and `state_icms_rate`
///   are read
/// * `policy` - Tax rates and break-even buffer
///
/// ## Errors
/// * [`CoreError::InvalidInput`] - `config.fixed_expenses` is negative or
///   not finite, or `policy` fails [`PricingPolicy::validate`]
/// * [`CoreError::InfeasiblePricing`] - taxes on the base price are at
///   least the base price itself (this includes a zero base price)
/// * [`CoreError::Overflow`] - a derived figure does not fit in an `f64`
///
/// Results are never cached; calling twice with identical arguments
/// yields bit-identical results.
pub fn calculate_pricing(
    input: &PricingInput,
    config: &RestaurantConfig,
    policy: &PricingPolicy,
) -> CoreResult<PricingResult> {
    policy.validate()?;
    let fixed_expenses = validate_amount("fixed_expenses", config.fixed_expenses)?;
    let volume = input.monthly_sales_volume();

    // Direct costs
    let base_cost = input.cost_per_unit() * input.unit_size();
    let cost_with_waste = base_cost * (1.0 + input.waste().fraction());
    let operational_cost = cost_with_waste * input.operational_cost().fraction();

    // Fixed overhead allocation
    let fixed_cost_per_unit = if volume.is_zero() {
        0.0
    } else {
        fixed_expenses / volume.as_f64()
    };

    let total_cost_before_tax = cost_with_waste + operational_cost + fixed_cost_per_unit;

    // Margin, then gross up for taxes
    let base_price = total_cost_before_tax / (1.0 - input.desired_margin().fraction());
    let taxes = policy
        .tax
        .calculate(base_price, input.tax_regime(), config.state_icms_rate)?;

    if taxes.total >= base_price {
        return Err(CoreError::InfeasiblePricing {
            base_price,
            tax_total: taxes.total,
        });
    }

    let suggested_price = base_price / (1.0 - taxes.total / base_price);

    let total_cost = total_cost_before_tax + taxes.total;
    let break_even_price = total_cost * policy.break_even_factor();

    let gross_margin = (suggested_price - total_cost_before_tax) / suggested_price * 100.0;
    let net_margin = (suggested_price - total_cost) / suggested_price * 100.0;
    let food_cost_percentage = base_cost / suggested_price * 100.0;

    let monthly_revenue = suggested_price * volume.as_f64();
    let monthly_profit = (suggested_price - total_cost) * volume.as_f64();
    let contribution_margin = suggested_price - (cost_with_waste + operational_cost);

    let result = PricingResult {
        base_cost,
        cost_with_waste,
        operational_cost,
        fixed_cost_per_unit,
        total_cost_before_tax,
        taxes,
        total_cost,
        suggested_price,
        break_even_price,
        net_margin,
        gross_margin,
        food_cost_percentage,
        monthly_revenue,
        monthly_profit,
        contribution_margin,
    };
    ensure_finite(&result)?;

    Ok(result)
}

/// Rejects results where any figure overflowed to infinity or NaN.
fn ensure_finite(result: &PricingResult) -> CoreResult<()> {
    let figures = [
        ("base_cost", result.base_cost),
        ("cost_with_waste", result.cost_with_waste),
        ("operational_cost", result.operational_cost),
        ("fixed_cost_per_unit", result.fixed_cost_per_unit),
        ("total_cost_before_tax", result.total_cost_before_tax),
        ("taxes.total", result.taxes.total),
        ("total_cost", result.total_cost),
        ("suggested_price", result.suggested_price),
        ("break_even_price", result.break_even_price),
        ("net_margin", result.net_margin),
        ("gross_margin", result.gross_margin),
        ("food_cost_percentage", result.food_cost_percentage),
        ("monthly_revenue", result.monthly_revenue),
        ("monthly_profit", result.monthly_profit),
        ("contribution_margin", result.contribution_margin),
    ];

    match figures.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(CoreError::Overflow {
            field: field.to_string(),
        }),
        None => Ok(()),
    }
}

/// One regime's outcome in a [`compare_regimes`] run.
#[derive(Debug)]
pub struct RegimeComparison {
    pub regime: TaxRegime,
    pub outcome: CoreResult<PricingResult>,
}

/// Prices the same input under every regime, in [`TaxRegime::ALL`] order.
///
/// A regime that makes pricing infeasible does not stop the others; its
/// error is kept in `outcome`.
pub fn compare_regimes(
    input: &PricingInput,
    config: &RestaurantConfig,
    policy: &PricingPolicy,
) -> Vec<RegimeComparison> {
    TaxRegime::ALL
        .iter()
        .map(|&regime| RegimeComparison {
            regime,
            outcome: calculate_pricing(&input.with_regime(regime), config, policy),
        })
        .collect()
}

/// Returns the regime with the lowest suggested price among the feasible
/// outcomes, if any.
pub fn cheapest_regime(comparisons: &[RegimeComparison]) -> Option<(TaxRegime, &PricingResult)> {
    comparisons
        .iter()
        .filter_map(|c| c.outcome.as_ref().ok().map(|r| (c.regime, r)))
        .min_by(|a, b| a.1.suggested_price.total_cmp(&b.1.suggested_price))
}

/// Monthly units needed for the contribution margin to cover the
/// restaurant's fixed expenses.
///
/// ## Returns
/// * `Some(0)` - no fixed expenses to cover
/// * `Some(n)` - sell at least `n` units per month
/// * `None` - contribution margin is zero or negative; no volume breaks even
///
/// ## Example
/// ```text
/// fixed_expenses      = 15000.00
/// contribution_margin =    27.60 per unit
///      │
///      ▼
/// ceil(15000 / 27.60) = 544 units
/// ```
pub fn break_even_volume(result: &PricingResult, config: &RestaurantConfig) -> Option<u64> {
    if config.fixed_expenses <= 0.0 {
        return Some(0);
    }

    if result.contribution_margin <= 0.0 || !result.contribution_margin.is_finite() {
        return None;
    }

    let units = (config.fixed_expenses / result.contribution_margin).ceil();
    if units.is_finite() && units <= u64::MAX as f64 {
        Some(units as u64)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn config(fixed_expenses: f64) -> RestaurantConfig {
        RestaurantConfig {
            business_name: "Cantina da Praça".to_string(),
            fixed_expenses,
            ..RestaurantConfig::default()
        }
    }

    fn request() -> PricingRequest {
        PricingRequest {
            name: Some("Filé à parmegiana".to_string()),
            cost_per_unit: 18.0,
            unit_size: 1.0,
            waste_percentage: 10.0,
            operational_cost_percentage: 25.0,
            desired_margin_percentage: 30.0,
            monthly_sales_volume: 2000,
            tax_regime: TaxRegime::SimplesNacional,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = price_item(&request(), &config(15000.0), &PricingPolicy::default()).unwrap();

        // Hand-computed from the formula chain:
        //   total before tax = 19.8 + 4.95 + 7.5     = 32.25
        //   base price       = 32.25 / 0.7
        //   suggested        = base / (1 - 0.12)     = 32.25 / 0.616
        assert!((result.base_cost - 18.0).abs() < EPS);
        assert!((result.cost_with_waste - 19.8).abs() < EPS);
        assert!((result.operational_cost - 4.95).abs() < EPS);
        assert!((result.fixed_cost_per_unit - 7.5).abs() < EPS);
        assert!((result.total_cost_before_tax - 32.25).abs() < EPS);
        assert!((result.taxes.total - 32.25 / 0.7 * 0.12).abs() < EPS);
        assert!((result.suggested_price - 32.25 / 0.616).abs() < EPS);
        assert!((result.total_cost - 32.25 * (1.0 + 0.12 / 0.7)).abs() < EPS);
        assert!((result.food_cost_percentage - 18.0 * 0.616 / 32.25 * 100.0).abs() < EPS);
        assert!((result.net_margin - 27.84).abs() < EPS);
        assert!((result.gross_margin - 38.4).abs() < EPS);
        assert!((result.contribution_margin - (32.25 / 0.616 - 24.75)).abs() < EPS);
    }

    #[test]
    fn test_total_cost_invariant() {
        for regime in TaxRegime::ALL {
            let mut req = request();
            req.tax_regime = regime;
            let result = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap();

            assert_eq!(
                result.total_cost,
                result.total_cost_before_tax + result.taxes.total
            );
            assert_eq!(result.break_even_price, result.total_cost * 1.05);
        }
    }

    #[test]
    fn test_no_waste_no_overhead() {
        let mut req = request();
        req.waste_percentage = 0.0;
        req.operational_cost_percentage = 0.0;
        let result = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap();

        assert_eq!(result.cost_with_waste, result.base_cost);
        assert_eq!(result.operational_cost, 0.0);
    }

    #[test]
    fn test_zero_volume_skips_fixed_allocation() {
        let mut req = request();
        req.monthly_sales_volume = 0;
        let result = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap();

        assert_eq!(result.fixed_cost_per_unit, 0.0);
        assert_eq!(result.monthly_revenue, 0.0);
        assert_eq!(result.monthly_profit, 0.0);
        assert!(result.suggested_price.is_finite());
    }

    #[test]
    fn test_margin_of_100_is_invalid_input() {
        let mut req = request();
        req.desired_margin_percentage = 100.0;
        let err = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_volume_is_invalid_input() {
        let mut req = request();
        req.monthly_sales_volume = -10;
        let err = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_confiscatory_tax_is_infeasible() {
        // Every rate is legal, but 100% ICMS alone eats the base price
        let mut req = request();
        req.tax_regime = TaxRegime::LucroPresumido;
        let cfg = RestaurantConfig {
            state_icms_rate: Some(100.0),
            ..config(15000.0)
        };
        let err = price_item(&req, &cfg, &PricingPolicy::default()).unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_out_of_range_policy_rejected() {
        let mut negative_buffer = PricingPolicy::default();
        negative_buffer.break_even_buffer_percentage = -50.0;
        let err = price_item(&request(), &config(15000.0), &negative_buffer).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let mut negative_tax = PricingPolicy::default();
        negative_tax.tax.simples_nacional_rate = -20.0;
        let err = price_item(&request(), &config(15000.0), &negative_tax).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_figures_rejected() {
        let mut req = request();
        req.cost_per_unit = 1e300;
        req.monthly_sales_volume = i64::MAX;
        let err = price_item(&req, &config(15000.0), &PricingPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Overflow { ref field } if field == "monthly_revenue"
        ));
        assert!(!err.is_infeasible());
    }

    #[test]
    fn test_zero_cost_item_is_infeasible() {
        let mut req = request();
        req.cost_per_unit = 0.0;
        let err = price_item(&req, &config(0.0), &PricingPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InfeasiblePricing {
                base_price,
                tax_total
            } if base_price == 0.0 && tax_total == 0.0
        ));
    }

    #[test]
    fn test_negative_fixed_expenses_rejected() {
        let err = price_item(&request(), &config(-1.0), &PricingPolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_idempotent() {
        let policy = PricingPolicy::default();
        let cfg = config(15000.0);
        let a = price_item(&request(), &cfg, &policy).unwrap();
        let b = price_item(&request(), &cfg, &policy).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.suggested_price.to_bits(), b.suggested_price.to_bits());
    }

    #[test]
    fn test_config_change_is_reflected() {
        let policy = PricingPolicy::default();
        let a = price_item(&request(), &config(15000.0), &policy).unwrap();
        let b = price_item(&request(), &config(30000.0), &policy).unwrap();
        assert!(b.suggested_price > a.suggested_price);
    }

    #[test]
    fn test_restaurant_icms_used_by_presumido() {
        let mut req = request();
        req.tax_regime = TaxRegime::LucroPresumido;
        let policy = PricingPolicy::default();

        let default_icms = price_item(&req, &config(15000.0), &policy).unwrap();
        let cfg = RestaurantConfig {
            state_icms_rate: Some(18.0),
            ..config(15000.0)
        };
        let high_icms = price_item(&req, &cfg, &policy).unwrap();

        assert!(high_icms.taxes.icms > default_icms.taxes.icms);
        assert!(high_icms.suggested_price > default_icms.suggested_price);
    }

    #[test]
    fn test_compare_regimes() {
        let input = request().validate().unwrap();
        let comparisons = compare_regimes(&input, &config(15000.0), &PricingPolicy::default());

        assert_eq!(comparisons.len(), 3);
        let regimes: Vec<_> = comparisons.iter().map(|c| c.regime).collect();
        assert_eq!(regimes, TaxRegime::ALL.to_vec());
        assert!(comparisons.iter().all(|c| c.outcome.is_ok()));

        // 12% flat is the lightest burden under default rates
        let (cheapest, _) = cheapest_regime(&comparisons).unwrap();
        assert_eq!(cheapest, TaxRegime::SimplesNacional);
    }

    #[test]
    fn test_compare_regimes_keeps_failures() {
        let mut policy = PricingPolicy::default();
        policy.tax.real_cofins_rate = 100.0;
        let input = request().validate().unwrap();
        let comparisons = compare_regimes(&input, &config(15000.0), &policy);

        assert!(comparisons[0].outcome.is_ok());
        assert!(comparisons[1].outcome.is_ok());
        assert!(matches!(&comparisons[2].outcome, Err(e) if e.is_infeasible()));
        let (cheapest, _) = cheapest_regime(&comparisons).unwrap();
        assert_eq!(cheapest, TaxRegime::SimplesNacional);
    }

    #[test]
    fn test_break_even_volume() {
        let cfg = config(15000.0);
        let result = price_item(&request(), &cfg, &PricingPolicy::default()).unwrap();
        assert_eq!(break_even_volume(&result, &cfg), Some(544));

        assert_eq!(break_even_volume(&result, &config(0.0)), Some(0));

        let mut losing = result.clone();
        losing.contribution_margin = -1.0;
        assert_eq!(break_even_volume(&losing, &cfg), None);
    }
}
