//! # Report Rendering
//!
//! Turns engine output into what `pricing-sim` prints.
//!
//! ```text
//! PricingResult + Vec<Advisory>
//!        │
//!        ├──► write_price_report()      text, money via DisplaySettings
//!        ├──► write_comparison_table()  one row per regime
//!        └──► PriceReport / ComparisonReport   JSON (camelCase)
//! ```

use std::io::Write;

use mesa_core::pricing::RegimeComparison;
use mesa_core::{Advisory, PricingResult, Severity, TaxRegime};
use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::settings::DisplaySettings;

// =============================================================================
// JSON Output
// =============================================================================

/// JSON document printed by `pricing-sim price --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub result: &'a PricingResult,
    pub safety_margin: f64,
    /// `null` when no volume can cover fixed expenses.
    pub break_even_volume: Option<u64>,
    pub advisories: &'a [Advisory],
}

/// One regime in `pricing-sim compare --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow<'a> {
    pub regime: TaxRegime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a PricingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON document printed by `pricing-sim compare --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport<'a> {
    pub rows: Vec<ComparisonRow<'a>>,
    /// Feasible regime with the lowest suggested price.
    pub cheapest: Option<TaxRegime>,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(comparisons: &'a [RegimeComparison], cheapest: Option<TaxRegime>) -> Self {
        let rows = comparisons
            .iter()
            .map(|c| match &c.outcome {
                Ok(result) => ComparisonRow {
                    regime: c.regime,
                    result: Some(result),
                    error: None,
                },
                Err(e) => ComparisonRow {
                    regime: c.regime,
                    result: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        ComparisonReport { rows, cheapest }
    }
}

/// Writes any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> SimResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(SimError::Output)
}

// =============================================================================
// Text Output
// =============================================================================

/// Writes the full breakdown for one priced item.
pub fn write_price_report<W: Write>(
    out: &mut W,
    report: &PriceReport<'_>,
    display: &DisplaySettings,
) -> SimResult<()> {
    write_price_report_inner(out, report, display).map_err(SimError::Output)
}

fn write_price_report_inner<W: Write>(
    out: &mut W,
    report: &PriceReport<'_>,
    display: &DisplaySettings,
) -> std::io::Result<()> {
    let r = report.result;
    let money = |v: f64| display.format_currency(v);

    writeln!(
        out,
        "{} ({})",
        report.name.unwrap_or("Menu item"),
        r.taxes.regime.label()
    )?;
    writeln!(out)?;

    writeln!(out, "Costs")?;
    writeln!(out, "  {:<26}{:>16}", "Ingredient cost", money(r.base_cost))?;
    writeln!(out, "  {:<26}{:>16}", "With waste", money(r.cost_with_waste))?;
    writeln!(out, "  {:<26}{:>16}", "Operational cost", money(r.operational_cost))?;
    writeln!(out, "  {:<26}{:>16}", "Fixed cost per unit", money(r.fixed_cost_per_unit))?;
    writeln!(out, "  {:<26}{:>16}", "Total before tax", money(r.total_cost_before_tax))?;
    writeln!(out)?;

    writeln!(out, "Taxes")?;
    for (label, amount) in [
        ("ISS", r.taxes.iss),
        ("ICMS", r.taxes.icms),
        ("PIS", r.taxes.pis),
        ("COFINS", r.taxes.cofins),
        ("IRPJ", r.taxes.irpj),
        ("CSLL", r.taxes.csll),
    ] {
        if amount != 0.0 {
            writeln!(out, "  {:<26}{:>16}", label, money(amount))?;
        }
    }
    writeln!(
        out,
        "  {:<26}{:>16}  ({:.2}% of price)",
        "Total taxes",
        money(r.taxes.total),
        r.taxes.effective_rate(r.suggested_price)
    )?;
    writeln!(out)?;

    writeln!(out, "Prices")?;
    writeln!(out, "  {:<26}{:>16}", "Suggested price", money(r.suggested_price))?;
    writeln!(out, "  {:<26}{:>16}", "Total cost", money(r.total_cost))?;
    writeln!(out, "  {:<26}{:>16}", "Break-even price", money(r.break_even_price))?;
    writeln!(out, "  {:<26}{:>16}", "Profit per unit", money(r.unit_profit()))?;
    writeln!(out)?;

    writeln!(out, "Margins")?;
    writeln!(out, "  {:<26}{:>15.2}%", "Net margin", r.net_margin)?;
    writeln!(out, "  {:<26}{:>15.2}%", "Gross margin", r.gross_margin)?;
    writeln!(out, "  {:<26}{:>15.2}%", "Food cost", r.food_cost_percentage)?;
    writeln!(out, "  {:<26}{:>15.2}%", "Safety margin", report.safety_margin)?;
    writeln!(out)?;

    writeln!(out, "Monthly")?;
    writeln!(out, "  {:<26}{:>16}", "Revenue", money(r.monthly_revenue))?;
    writeln!(out, "  {:<26}{:>16}", "Profit", money(r.monthly_profit))?;
    writeln!(out, "  {:<26}{:>16}", "Contribution per unit", money(r.contribution_margin))?;
    match report.break_even_volume {
        Some(units) => writeln!(out, "  {:<26}{:>16}", "Break-even volume", format!("{units} units"))?,
        None => writeln!(out, "  {:<26}{:>16}", "Break-even volume", "never")?,
    }
    writeln!(out)?;

    writeln!(out, "Advisories")?;
    for advisory in report.advisories {
        writeln!(out, "  [{}] {}", severity_tag(advisory.severity), advisory.message)?;
    }

    Ok(())
}

/// Writes one row per regime, marking the cheapest feasible one.
pub fn write_comparison_table<W: Write>(
    out: &mut W,
    comparisons: &[RegimeComparison],
    cheapest: Option<TaxRegime>,
    display: &DisplaySettings,
) -> SimResult<()> {
    write_comparison_inner(out, comparisons, cheapest, display).map_err(SimError::Output)
}

fn write_comparison_inner<W: Write>(
    out: &mut W,
    comparisons: &[RegimeComparison],
    cheapest: Option<TaxRegime>,
    display: &DisplaySettings,
) -> std::io::Result<()> {
    writeln!(
        out,
        "  {:<18}{:>16}{:>16}{:>12}{:>12}",
        "Regime", "Price", "Taxes", "Net", "Food cost"
    )?;

    for comparison in comparisons {
        let marker = if Some(comparison.regime) == cheapest { "*" } else { " " };
        match &comparison.outcome {
            Ok(r) => writeln!(
                out,
                "{} {:<18}{:>16}{:>16}{:>11.2}%{:>11.2}%",
                marker,
                comparison.regime.label(),
                display.format_currency(r.suggested_price),
                display.format_currency(r.taxes.total),
                r.net_margin,
                r.food_cost_percentage
            )?,
            Err(e) => writeln!(out, "{} {:<18}{}", marker, comparison.regime.label(), e)?,
        }
    }

    if cheapest.is_some() {
        writeln!(out)?;
        writeln!(out, "* lowest suggested price")?;
    }

    Ok(())
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARN",
        Severity::Success => "OK",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_core::advisory::review_pricing_default;
    use mesa_core::pricing::{cheapest_regime, compare_regimes, price_item};
    use mesa_core::{PricingPolicy, PricingRequest, RestaurantConfig};

    fn reference() -> (PricingResult, RestaurantConfig) {
        let config = RestaurantConfig {
            fixed_expenses: 15000.0,
            ..RestaurantConfig::default()
        };
        let request = PricingRequest {
            name: Some("Risoto".to_string()),
            cost_per_unit: 18.0,
            unit_size: 1.0,
            waste_percentage: 10.0,
            operational_cost_percentage: 25.0,
            desired_margin_percentage: 30.0,
            monthly_sales_volume: 2000,
            tax_regime: TaxRegime::SimplesNacional,
        };
        let result = price_item(&request, &config, &PricingPolicy::default()).unwrap();
        (result, config)
    }

    #[test]
    fn test_text_report_contains_key_figures() {
        let (result, _) = reference();
        let advisories = review_pricing_default(&result);
        let report = PriceReport {
            name: Some("Risoto"),
            result: &result,
            safety_margin: result.safety_margin(),
            break_even_volume: Some(544),
            advisories: &advisories,
        };

        let mut out = Vec::new();
        write_price_report(&mut out, &report, &DisplaySettings::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Risoto (Simples Nacional)"));
        assert!(text.contains("R$ 52,35"));
        assert!(text.contains("27.84%"));
        assert!(text.contains("544 units"));
        // 52.3539 suggested - 37.7786 total cost
        assert!(text.contains("R$ 14,58"));
        assert!(text.contains("[WARN] Food cost of 34.4%"));
        // Simples only breaks out ISS
        assert!(!text.contains("COFINS"));
    }

    #[test]
    fn test_json_report_shape() {
        let (result, _) = reference();
        let advisories = review_pricing_default(&result);
        let report = PriceReport {
            name: None,
            result: &result,
            safety_margin: result.safety_margin(),
            break_even_volume: None,
            advisories: &advisories,
        };

        let mut out = Vec::new();
        write_json(&mut out, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert!(value.get("name").is_none());
        assert!(value["breakEvenVolume"].is_null());
        assert_eq!(value["result"]["taxes"]["regime"], "simples_nacional");
        assert_eq!(value["advisories"][0]["kind"], "food_cost_at_limit");
        assert!((value["result"]["netMargin"].as_f64().unwrap() - 27.84).abs() < 1e-9);
    }

    #[test]
    fn test_comparison_table_marks_cheapest() {
        let (_, config) = reference();
        let input = PricingRequest {
            name: None,
            cost_per_unit: 18.0,
            unit_size: 1.0,
            waste_percentage: 10.0,
            operational_cost_percentage: 25.0,
            desired_margin_percentage: 30.0,
            monthly_sales_volume: 2000,
            tax_regime: TaxRegime::SimplesNacional,
        }
        .validate()
        .unwrap();
        let comparisons = compare_regimes(&input, &config, &PricingPolicy::default());
        let cheapest = cheapest_regime(&comparisons).map(|(regime, _)| regime);
        assert_eq!(cheapest, Some(TaxRegime::SimplesNacional));

        let mut out = Vec::new();
        write_comparison_table(&mut out, &comparisons, cheapest, &DisplaySettings::default())
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("* Simples Nacional"));
        assert!(text.contains("  Lucro Presumido"));
        assert!(text.contains("  Lucro Real"));

        let json = ComparisonReport::new(&comparisons, cheapest);
        assert_eq!(json.rows.len(), 3);
        assert!(json.rows.iter().all(|row| row.error.is_none()));
    }
}
