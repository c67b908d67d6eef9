//! # Pricing Advisories
//!
//! Turns a computed [`PricingResult`] into a prioritized list of
//! human-readable advisories.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule                                  Severity   (default thresholds)  │
//! │  ────────────────────────────────────  ────────   ───────────────────   │
//! │  food cost % > 35                      error                            │
//! │  30 < food cost % <= 35                warning                          │
//! │  net margin % < 15                     error                            │
//! │  15 <= net margin % < 20               warning                          │
//! │  safety margin % < 10                  error                            │
//! │  none of the above                     success                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Every rule is evaluated independently. The output is ordered
//! errors → warnings → success.
//!
//! Advisories are never errors in the `Result` sense: an unhealthy price is
//! still a valid price.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::policy::AdvisoryThresholds;
use crate::types::PricingResult;

// =============================================================================
// Types
// =============================================================================

/// How urgent an advisory is. Ordered most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Success,
}

/// Which rule produced an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    FoodCostHigh,
    FoodCostAtLimit,
    MarginUnsustainable,
    MarginLow,
    SafetyMarginThin,
    Healthy,
}

/// A single advisory for the alert panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Advisory {
    pub severity: Severity,
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    fn new(severity: Severity, kind: AdvisoryKind, message: String) -> Self {
        Advisory {
            severity,
            kind,
            message,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// =============================================================================
// Review
// =============================================================================

/// Reviews a result against the default thresholds.
///
/// ## Example
/// ```rust,ignore
/// let advisories = review_pricing_default(&result);
/// if advisories.iter().any(|a| a.is_error()) {
///     // show red banner
/// }
/// ```
pub fn review_pricing_default(result: &PricingResult) -> Vec<Advisory> {
    review_pricing(result, &AdvisoryThresholds::default())
}

/// Reviews a result against the given thresholds.
pub fn review_pricing(result: &PricingResult, thresholds: &AdvisoryThresholds) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    let food_cost = result.food_cost_percentage;
    if food_cost > thresholds.food_cost_max {
        advisories.push(Advisory::new(
            Severity::Error,
            AdvisoryKind::FoodCostHigh,
            format!(
                "Food cost of {:.1}% is too high; recommended maximum is {:.0}%",
                food_cost, thresholds.food_cost_max
            ),
        ));
    } else if food_cost > thresholds.food_cost_warning {
        advisories.push(Advisory::new(
            Severity::Warning,
            AdvisoryKind::FoodCostAtLimit,
            format!(
                "Food cost of {:.1}% is at the upper limit ({:.0}%)",
                food_cost, thresholds.food_cost_max
            ),
        ));
    }

    let net_margin = result.net_margin;
    if net_margin < thresholds.net_margin_min {
        advisories.push(Advisory::new(
            Severity::Error,
            AdvisoryKind::MarginUnsustainable,
            format!(
                "Net margin of {:.1}% is unsustainable; minimum is {:.0}%",
                net_margin, thresholds.net_margin_min
            ),
        ));
    } else if net_margin < thresholds.net_margin_warning {
        advisories.push(Advisory::new(
            Severity::Warning,
            AdvisoryKind::MarginLow,
            format!(
                "Net margin of {:.1}% is low; aim for at least {:.0}%",
                net_margin, thresholds.net_margin_warning
            ),
        ));
    }

    let safety_margin = result.safety_margin();
    if safety_margin < thresholds.safety_margin_min {
        advisories.push(Advisory::new(
            Severity::Error,
            AdvisoryKind::SafetyMarginThin,
            format!(
                "Insufficient safety margin: price is only {:.1}% above break-even (minimum {:.0}%)",
                safety_margin, thresholds.safety_margin_min
            ),
        ));
    }

    if advisories.is_empty() {
        advisories.push(Advisory::new(
            Severity::Success,
            AdvisoryKind::Healthy,
            "Pricing is within healthy limits".to_string(),
        ));
    }

    // Stable: rule order is kept within a severity
    advisories.sort_by_key(|a| a.severity);
    advisories
}

// =============================================================================
// Unit Tests
// =============================================================================
