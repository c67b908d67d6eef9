//! # Domain Types
//!
//! Core value records used throughout the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ RestaurantConfig │   │  PricingRequest  │   │  PricingResult   │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  fixed_expenses  │   │  cost_per_unit   │   │  base_cost       │    │
//! │  │  tax_regime      │   │  waste %         │   │  taxes ──────────┼─┐  │
//! │  │  state_icms_rate │   │  margin %        │   │  suggested_price │ │  │
//! │  └──────────────────┘   └────────┬─────────┘   └──────────────────┘ │  │
//! │                                  │ validate()                       │  │
//! │                                  ▼                                  │  │
//! │                         ┌──────────────────┐   ┌──────────────────┐ │  │
//! │                         │   PricingInput   │   │  TaxCalculation  │◄┘  │
//! │                         │ (validated only) │   │  iss icms pis …  │    │
//! │                         └──────────────────┘   └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Identity
//! None of these records have IDs or timestamps. A `PricingResult` exists
//! only for the call that produced it and is recomputed on every request,
//! so configuration changes show up immediately.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::validation::{
    validate_amount, validate_percentage, MarginPercentage, Percentage, SalesVolume,
};

// =============================================================================
// Tax Regime
// =============================================================================

/// Brazilian company tax regime. Selects which tax formula applies.
///
/// ## Regimes
/// ```text
/// ┌────────────────────┬───────────────────────────────────────────────┐
/// │ SimplesNacional    │ Single unified rate on revenue                │
/// │ LucroPresumido     │ Presumed profit: every tax is a revenue rate  │
/// │ LucroReal          │ Real profit: IRPJ/CSLL depend on actual       │
/// │                    │ profit and are not estimated from revenue     │
/// └────────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    #[default]
    #[serde(alias = "simplesNacional")]
    SimplesNacional,
    #[serde(alias = "lucroPresumido")]
    LucroPresumido,
    #[serde(alias = "lucroReal")]
    LucroReal,
}

impl TaxRegime {
    /// Every regime, in declaration order.
    pub const ALL: [TaxRegime; 3] = [
        TaxRegime::SimplesNacional,
        TaxRegime::LucroPresumido,
        TaxRegime::LucroReal,
    ];

    /// Machine name (matches the serde representation).
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::SimplesNacional => "simples_nacional",
            TaxRegime::LucroPresumido => "lucro_presumido",
            TaxRegime::LucroReal => "lucro_real",
        }
    }

    /// Human-readable name for reports.
    pub const fn label(&self) -> &'static str {
        match self {
            TaxRegime::SimplesNacional => "Simples Nacional",
            TaxRegime::LucroPresumido => "Lucro Presumido",
            TaxRegime::LucroReal => "Lucro Real",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxRegime {
    type Err = ValidationError;

    /// Parses a regime name. Case, `_`, `-` and spaces are ignored, so
    /// `simples_nacional`, `simplesNacional` and `Simples Nacional` all work.
    /// Anything else is rejected rather than defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "simplesnacional" | "simples" => Ok(TaxRegime::SimplesNacional),
            "lucropresumido" | "presumido" => Ok(TaxRegime::LucroPresumido),
            "lucroreal" | "real" => Ok(TaxRegime::LucroReal),
            "" => Err(ValidationError::Required {
                field: "tax_regime".to_string(),
            }),
            _ => Err(ValidationError::NotAllowed {
                field: "tax_regime".to_string(),
                value: s.to_string(),
                allowed: TaxRegime::ALL
                    .iter()
                    .map(|r| r.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Restaurant Configuration
// =============================================================================

/// Restaurant-wide settings consumed by the pricing calculator.
///
/// The calculator only reads `fixed_expenses` and `state_icms_rate`; the
/// remaining fields are carried so the whole settings blob round-trips and
/// so callers can derive defaults (regime, margin) for new simulations.
///
/// ## JSON Shape
/// Matches the web app's stored blob (camelCase keys):
/// ```json
/// {
///   "businessName": "Cantina da Praça",
///   "targetFoodCost": 30,
///   "fixedExpenses": 15000,
///   "taxRegime": "simples_nacional"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantConfig {
    /// Display name of the business.
    pub business_name: String,

    /// Target food cost as a percentage of price.
    pub target_food_cost: f64,

    /// Target beverage cost as a percentage of price.
    pub target_beverage_cost: f64,

    /// Average monthly revenue (currency).
    pub average_monthly_revenue: f64,

    /// Fixed monthly expenses (rent, salaries, ...). Allocated per unit.
    pub fixed_expenses: f64,

    /// Variable monthly expenses (currency).
    pub variable_expenses: f64,

    /// Desired profit margin, used as the default for new simulations.
    pub desired_profit_margin: f64,

    /// Regime used when a simulation does not name one.
    pub tax_regime: TaxRegime,

    /// State ICMS rate in percent. `None` uses the tax policy default.
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_icms_rate: Option<f64>,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        RestaurantConfig {
            business_name: String::new(),
            target_food_cost: 30.0,
            target_beverage_cost: 25.0,
            average_monthly_revenue: 0.0,
            fixed_expenses: 0.0,
            variable_expenses: 0.0,
            desired_profit_margin: 20.0,
            tax_regime: TaxRegime::SimplesNacional,
            state_icms_rate: None,
        }
    }
}

impl RestaurantConfig {
    /// Parses and validates the JSON settings blob.
    ///
    /// ## Example
    /// ```rust
    /// use mesa_core::{RestaurantConfig, TaxRegime};
    ///
    /// let config = RestaurantConfig::from_json(
    ///     r#"{"businessName":"Cantina","fixedExpenses":15000,"taxRegime":"lucroPresumido"}"#,
    /// ).unwrap();
    /// assert_eq!(config.fixed_expenses, 15000.0);
    /// assert_eq!(config.tax_regime, TaxRegime::LucroPresumido);
    ///
    /// assert!(RestaurantConfig::from_json(r#"{"taxRegime":"mei"}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: RestaurantConfig =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
                field: "restaurant config".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field the engine might read.
    pub fn validate(&self) -> CoreResult<()> {
        validate_percentage("target_food_cost", self.target_food_cost)?;
        validate_percentage("target_beverage_cost", self.target_beverage_cost)?;
        validate_amount("average_monthly_revenue", self.average_monthly_revenue)?;
        validate_amount("fixed_expenses", self.fixed_expenses)?;
        validate_amount("variable_expenses", self.variable_expenses)?;
        MarginPercentage::for_field("desired_profit_margin", self.desired_profit_margin)?;

        if let Some(rate) = self.state_icms_rate {
            validate_percentage("state_icms_rate", rate)?;
        }

        Ok(())
    }
}

// =============================================================================
// Tax Calculation
// =============================================================================

/// Itemized taxes for one revenue amount under one regime.
///
/// ## Fields Per Regime
/// ```text
/// ┌──────────────────┬─────┬──────┬─────┬────────┬──────┬──────┐
/// │                  │ ISS │ ICMS │ PIS │ COFINS │ IRPJ │ CSLL │
/// ├──────────────────┼─────┼──────┼─────┼────────┼──────┼──────┤
/// │ SimplesNacional  │ (i) │  -   │  -  │   -    │  -   │  -   │
/// │ LucroPresumido   │  ✓  │  ✓   │  ✓  │   ✓    │  ✓   │  ✓   │
/// │ LucroReal        │  ✓  │  ✓   │  ✓  │   ✓    │  0   │  0   │
/// └──────────────────┴─────┴──────┴─────┴────────┴──────┴──────┘
/// (i) informational share, already inside `total`
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    pub iss: f64,
    pub icms: f64,
    pub pis: f64,
    pub cofins: f64,
    pub irpj: f64,
    pub csll: f64,
    /// Total tax owed.
    pub total: f64,
    pub regime: TaxRegime,
}

impl TaxCalculation {
    /// A zeroed breakdown for the given regime.
    pub const fn zero(regime: TaxRegime) -> Self {
        TaxCalculation {
            iss: 0.0,
            icms: 0.0,
            pis: 0.0,
            cofins: 0.0,
            irpj: 0.0,
            csll: 0.0,
            total: 0.0,
            regime,
        }
    }

    /// Total tax as a percentage of `revenue`. Zero revenue gives zero.
    pub fn effective_rate(&self, revenue: f64) -> f64 {
        if revenue == 0.0 {
            return 0.0;
        }
        self.total / revenue * 100.0
    }
}

// =============================================================================
// Pricing Request / Input
// =============================================================================

/// A raw pricing request as received from a form or file.
///
/// Nothing here is trusted; call [`PricingRequest::validate`] to obtain a
/// [`PricingInput`] the calculator accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    /// Optional item name, only used for reporting.
    #[ts(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Cost per base measure (e.g. per kg).
    pub cost_per_unit: f64,

    /// Base measure per sold unit (e.g. kg per portion).
    #[serde(default = "default_unit_size")]
    pub unit_size: f64,

    #[serde(default)]
    pub waste_percentage: f64,

    #[serde(default)]
    pub operational_cost_percentage: f64,

    pub desired_margin_percentage: f64,

    /// Signed so that negative counts from the frontend can be rejected
    /// with a proper error instead of failing deserialization. Whole
    /// numbers written as floats (`2000.0`) are accepted.
    #[serde(default, deserialize_with = "deserialize_volume")]
    pub monthly_sales_volume: i64,

    pub tax_regime: TaxRegime,
}

fn default_unit_size() -> f64 {
    1.0
}

/// A JavaScript `number` may arrive as `2000.0`; anything with a fraction
/// is still rejected.
fn deserialize_volume<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct VolumeVisitor;

    impl<'de> Visitor<'de> for VolumeVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number of units")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, hence the strict bound
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(VolumeVisitor)
}

impl PricingRequest {
    /// Validates every field and builds a [`PricingInput`].
    ///
    /// ## Example
    /// ```rust
    /// use mesa_core::{PricingRequest, TaxRegime};
    ///
    /// let request = PricingRequest {
    ///     name: None,
    ///     cost_per_unit: 18.0,
    ///     unit_size: 1.0,
    ///     waste_percentage: 10.0,
    ///     operational_cost_percentage: 25.0,
    ///     desired_margin_percentage: 100.0,
    ///     monthly_sales_volume: 2000,
    ///     tax_regime: TaxRegime::SimplesNacional,
    /// };
    /// assert!(request.validate().is_err());
    /// ```
    pub fn validate(&self) -> CoreResult<PricingInput> {
        Ok(PricingInput {
            cost_per_unit: validate_amount("cost_per_unit", self.cost_per_unit)?,
            unit_size: validate_amount("unit_size", self.unit_size)?,
            waste: Percentage::for_field("waste_percentage", self.waste_percentage)?,
            operational_cost: Percentage::for_field(
                "operational_cost_percentage",
                self.operational_cost_percentage,
            )?,
            desired_margin: MarginPercentage::for_field(
                "desired_margin_percentage",
                self.desired_margin_percentage,
            )?,
            monthly_sales_volume: SalesVolume::from_signed(self.monthly_sales_volume)?,
            tax_regime: self.tax_regime,
        })
    }
}

/// Validated calculator input. Only constructible through
/// [`PricingRequest::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingInput {
    cost_per_unit: f64,
    unit_size: f64,
    waste: Percentage,
    operational_cost: Percentage,
    desired_margin: MarginPercentage,
    monthly_sales_volume: SalesVolume,
    tax_regime: TaxRegime,
}

impl PricingInput {
    #[inline]
    pub fn cost_per_unit(&self) -> f64 {
        self.cost_per_unit
    }

    #[inline]
    pub fn unit_size(&self) -> f64 {
        self.unit_size
    }

    #[inline]
    pub fn waste(&self) -> Percentage {
        self.waste
    }

    #[inline]
    pub fn operational_cost(&self) -> Percentage {
        self.operational_cost
    }

    #[inline]
    pub fn desired_margin(&self) -> MarginPercentage {
        self.desired_margin
    }

    #[inline]
    pub fn monthly_sales_volume(&self) -> SalesVolume {
        self.monthly_sales_volume
    }

    #[inline]
    pub fn tax_regime(&self) -> TaxRegime {
        self.tax_regime
    }

    /// Same input under a different regime. Every other field is already
    /// validated, so this cannot fail.
    pub fn with_regime(mut self, regime: TaxRegime) -> Self {
        self.tax_regime = regime;
        self
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Full cost / price / margin breakdown for one menu item.
///
/// All percentages are in percent (27.84, not 0.2784).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub base_cost: f64,
    pub cost_with_waste: f64,
    pub operational_cost: f64,
    pub fixed_cost_per_unit: f64,
    pub total_cost_before_tax: f64,
    pub taxes: TaxCalculation,
    /// `total_cost_before_tax + taxes.total`
    pub total_cost: f64,
    pub suggested_price: f64,
    /// `total_cost` plus the policy safety buffer.
    pub break_even_price: f64,
    pub net_margin: f64,
    pub gross_margin: f64,
    pub food_cost_percentage: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
    pub contribution_margin: f64,
}

impl PricingResult {
    /// How far the suggested price sits above break-even, in percent of the
    /// suggested price.
    pub fn safety_margin(&self) -> f64 {
        (self.suggested_price - self.break_even_price) / self.suggested_price * 100.0
    }

    /// Profit per unit sold after all costs and taxes.
    pub fn unit_profit(&self) -> f64 {
        self.suggested_price - self.total_cost
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
