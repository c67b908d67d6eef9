//! # Mesa Pricing Simulator
//!
//! Command line front end for `mesa-core`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pricing-sim                                      │
//! │                                                                         │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌────────────┐    │
//! │  │    cli     │──►│  settings  │──►│ mesa-core  │──►│   report   │    │
//! │  │ clap args  │   │ TOML + env │   │ price/tax/ │   │ text/JSON  │    │
//! │  │            │   │            │   │ advisories │   │            │    │
//! │  └────────────┘   └────────────┘   └────────────┘   └────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`run`] loads settings and dispatches; [`execute`] takes settings
//! explicitly so it can be driven without touching the environment.

pub mod cli;
pub mod error;
pub mod report;
pub mod settings;

use std::io::Write;

use mesa_core::advisory::review_pricing;
use mesa_core::pricing::{break_even_volume, calculate_pricing, cheapest_regime, compare_regimes};
use mesa_core::{CoreError, PricingResult};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Command};
use crate::error::{SimError, SimResult};
use crate::report::{ComparisonReport, PriceReport};
use crate::settings::Settings;

/// Loads settings and runs the parsed command, writing to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> SimResult<()> {
    let settings = Settings::load(cli.config.clone())?;
    info!(
        business = %settings.restaurant.business_name,
        regime = %settings.restaurant.tax_regime,
        fixed_expenses = settings.restaurant.fixed_expenses,
        "Settings loaded"
    );

    execute(&cli, &settings, out)
}

/// Runs a command against already-loaded settings.
pub fn execute<W: Write>(cli: &Cli, settings: &Settings, out: &mut W) -> SimResult<()> {
    match &cli.command {
        Command::Price { item, regime, json } => {
            let request = item.to_request(&settings.restaurant, *regime)?;
            let input = request.validate().map_err(log_rejection)?;
            debug!(
                regime = %input.tax_regime(),
                cost = input.cost_per_unit(),
                volume = input.monthly_sales_volume().units(),
                "Pricing item"
            );

            let result = calculate_pricing(&input, &settings.restaurant, &settings.policy)
                .map_err(log_rejection)?;
            let advisories = review_pricing(&result, &settings.policy.advisory);
            log_summary(&result, advisories.iter().filter(|a| a.is_error()).count());

            let price_report = PriceReport {
                name: request.name.as_deref(),
                result: &result,
                safety_margin: result.safety_margin(),
                break_even_volume: break_even_volume(&result, &settings.restaurant),
                advisories: &advisories,
            };

            if *json {
                report::write_json(out, &price_report)
            } else {
                report::write_price_report(out, &price_report, &settings.display)
            }
        }

        Command::Compare { item, json } => {
            let request = item.to_request(&settings.restaurant, None)?;
            let input = request.validate().map_err(log_rejection)?;

            let comparisons = compare_regimes(&input, &settings.restaurant, &settings.policy);
            for comparison in &comparisons {
                if let Err(e) = &comparison.outcome {
                    warn!(regime = %comparison.regime, error = %e, "Regime is infeasible");
                }
            }

            let cheapest = cheapest_regime(&comparisons).map(|(regime, _)| regime);
            info!(cheapest = ?cheapest, "Regimes compared");

            if *json {
                report::write_json(out, &ComparisonReport::new(&comparisons, cheapest))
            } else {
                report::write_comparison_table(out, &comparisons, cheapest, &settings.display)
            }
        }

        Command::Config { write } => {
            if *write {
                settings.save(cli.config.clone())?;
            }
            out.write_all(settings.to_toml()?.as_bytes())
                .map_err(SimError::Output)
        }
    }
}

fn log_rejection(err: CoreError) -> CoreError {
    match &err {
        CoreError::InvalidInput(e) => warn!(error = %e, "Request rejected"),
        CoreError::InfeasiblePricing {
            base_price,
            tax_total,
        } => warn!(base_price, tax_total, "Taxes consume the whole base price"),
        CoreError::Overflow { field } => warn!(field = %field, "Pricing overflowed"),
    }
    err
}

fn log_summary(result: &PricingResult, errors: usize) {
    info!(
        suggested_price = result.suggested_price,
        net_margin = result.net_margin,
        food_cost = result.food_cost_percentage,
        errors,
        "Item priced"
    );
}
