//! Command line definition for `pricing-sim`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mesa_core::{PricingRequest, RestaurantConfig, TaxRegime};
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Mesa pricing simulator: prices menu items under Brazilian tax regimes.
#[derive(Parser, Debug)]
#[command(name = "pricing-sim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (defaults to the platform config directory).
    #[arg(short, long, global = true, env = "MESA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price one menu item and review the result.
    Price {
        #[command(flatten)]
        item: ItemArgs,

        /// Tax regime (defaults to the restaurant's regime).
        #[arg(long)]
        regime: Option<TaxRegime>,

        /// Print JSON instead of a text report.
        #[arg(long)]
        json: bool,
    },

    /// Price one menu item under every tax regime.
    Compare {
        #[command(flatten)]
        item: ItemArgs,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show the effective settings.
    Config {
        /// Also write them to the settings file.
        #[arg(long)]
        write: bool,
    },
}

/// Describes the item being priced, either inline or from a JSON request.
#[derive(Args, Debug, Clone, Default)]
pub struct ItemArgs {
    /// JSON file holding a full pricing request.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["name", "cost", "unit_size", "waste", "overhead", "margin", "volume"]
    )]
    pub request: Option<PathBuf>,

    /// Item name for the report.
    #[arg(long)]
    pub name: Option<String>,

    /// Ingredient cost per unit (e.g. per kg).
    #[arg(long, required_unless_present = "request")]
    pub cost: Option<f64>,

    /// Units used per portion [default: 1.0]
    #[arg(long)]
    pub unit_size: Option<f64>,

    /// Waste percentage [default: 0]
    #[arg(long)]
    pub waste: Option<f64>,

    /// Operational overhead percentage [default: 0]
    #[arg(long)]
    pub overhead: Option<f64>,

    /// Desired margin percentage (defaults to the restaurant's target).
    #[arg(long)]
    pub margin: Option<f64>,

    /// Expected monthly sales volume [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub volume: Option<i64>,
}

impl ItemArgs {
    /// Builds the raw request the engine validates.
    ///
    /// Missing values fall back to `config`: the margin to
    /// `desired_profit_margin`, the regime to `tax_regime`. An explicit
    /// `regime` wins over both the config and a request file.
    pub fn to_request(
        &self,
        config: &RestaurantConfig,
        regime: Option<TaxRegime>,
    ) -> SimResult<PricingRequest> {
        if let Some(path) = &self.request {
            debug!(path = %path.display(), "Reading pricing request");
            let contents = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
            let mut request: PricingRequest = serde_json::from_str(&contents)?;
            if let Some(regime) = regime {
                request.tax_regime = regime;
            }
            return Ok(request);
        }

        Ok(PricingRequest {
            name: self.name.clone(),
            cost_per_unit: self.cost.unwrap_or_default(),
            unit_size: self.unit_size.unwrap_or(1.0),
            waste_percentage: self.waste.unwrap_or_default(),
            operational_cost_percentage: self.overhead.unwrap_or_default(),
            desired_margin_percentage: self.margin.unwrap_or(config.desired_profit_margin),
            monthly_sales_volume: self.volume.unwrap_or_default(),
            tax_regime: regime.unwrap_or(config.tax_regime),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_flags() {
        let cli = Cli::try_parse_from([
            "pricing-sim",
            "price",
            "--cost",
            "18",
            "--waste",
            "10",
            "--overhead",
            "25",
            "--margin",
            "30",
            "--volume",
            "2000",
            "--regime",
            "lucroPresumido",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Price { item, regime, json } => {
                assert_eq!(item.cost, Some(18.0));
                assert_eq!(item.volume, Some(2000));
                assert_eq!(regime, Some(TaxRegime::LucroPresumido));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_negative_volume_reaches_the_engine() {
        let cli =
            Cli::try_parse_from(["pricing-sim", "price", "--cost", "10", "--volume", "-3"]).unwrap();
        let Command::Price { item, .. } = cli.command else {
            panic!("expected price");
        };
        assert_eq!(item.volume, Some(-3));
    }

    #[test]
    fn test_unknown_regime_rejected_by_parser() {
        let err = Cli::try_parse_from(["pricing-sim", "price", "--cost", "10", "--regime", "mei"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cost_or_request_required() {
        assert!(Cli::try_parse_from(["pricing-sim", "compare"]).is_err());
        assert!(Cli::try_parse_from([
            "pricing-sim",
            "compare",
            "--request",
            "item.json",
            "--cost",
            "3"
        ])
        .is_err());
    }

    #[test]
    fn test_to_request_uses_config_defaults() {
        let config = RestaurantConfig {
            desired_profit_margin: 25.0,
            tax_regime: TaxRegime::LucroReal,
            ..RestaurantConfig::default()
        };
        let item = ItemArgs {
            cost: Some(12.0),
            ..ItemArgs::default()
        };

        let request = item.to_request(&config, None).unwrap();
        assert_eq!(request.cost_per_unit, 12.0);
        assert_eq!(request.unit_size, 1.0);
        assert_eq!(request.desired_margin_percentage, 25.0);
        assert_eq!(request.monthly_sales_volume, 0);
        assert_eq!(request.tax_regime, TaxRegime::LucroReal);

        let request = item
            .to_request(&config, Some(TaxRegime::SimplesNacional))
            .unwrap();
        assert_eq!(request.tax_regime, TaxRegime::SimplesNacional);
    }

    #[test]
    fn test_to_request_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risoto.json");
        std::fs::write(
            &path,
            r#"{
                "name": "Risoto",
                "costPerUnit": 18,
                "wastePercentage": 10,
                "operationalCostPercentage": 25,
                "desiredMarginPercentage": 30,
                "monthlySalesVolume": 2000,
                "taxRegime": "simplesNacional"
            }"#,
        )
        .unwrap();

        let item = ItemArgs {
            request: Some(path),
            ..ItemArgs::default()
        };
        let request = item
            .to_request(&RestaurantConfig::default(), Some(TaxRegime::LucroReal))
            .unwrap();
        assert_eq!(request.name.as_deref(), Some("Risoto"));
        assert_eq!(request.waste_percentage, 10.0);
        assert_eq!(request.tax_regime, TaxRegime::LucroReal);
    }

    #[test]
    fn test_to_request_missing_file() {
        let item = ItemArgs {
            request: Some(PathBuf::from("/nonexistent/mesa/request.json")),
            ..ItemArgs::default()
        };
        assert!(matches!(
            item.to_request(&RestaurantConfig::default(), None),
            Err(SimError::Io { .. })
        ));
    }
}
