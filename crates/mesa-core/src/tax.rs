//! # Tax Engine
//!
//! Maps a revenue amount and a [`TaxRegime`] to an itemized
//! [`TaxCalculation`].
//!
//! ## Regime Formulas (defaults)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SIMPLES NACIONAL                                                       │
//! │    total = 12% × revenue                                                │
//! │    iss   =  2% × revenue   (informational, already inside total)        │
//! │                                                                         │
//! │  LUCRO PRESUMIDO                                                        │
//! │    iss 5% + icms (state, 12%) + pis 0.65% + cofins 3%                   │
//! │           + irpj 1.5% + csll 0.9%           = total                     │
//! │                                                                         │
//! │  LUCRO REAL                                                             │
//! │    iss 5% + icms (state, 12%) + pis 1.65% + cofins 7.6% = total         │
//! │    irpj / csll = 0                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lucro Real and IRPJ/CSLL
//! Under real-profit taxation IRPJ and CSLL are levied on the period's
//! actual profit, which a per-item revenue figure cannot know. They are
//! reported as zero and are not part of `total`. Callers that need them
//! must compute them from an actual profit statement.
//!
//! ## Example
//! ```rust
//! use mesa_core::tax::calculate_taxes;
//! use mesa_core::TaxRegime;
//!
//! let taxes = calculate_taxes(1000.0, TaxRegime::LucroPresumido, None).unwrap();
//! assert!((taxes.total - 230.5).abs() < 1e-9);
//! ```

use crate::error::CoreResult;
use crate::policy::TaxPolicy;
use crate::types::{TaxCalculation, TaxRegime};
use crate::validation::{validate_amount, validate_percentage};

/// Calculates taxes with the default [`TaxPolicy`].
///
/// ## Arguments
/// * `revenue` - Amount the taxes apply to. Must be finite and non-negative.
/// * `regime` - Which formula branch applies.
/// * `state_icms_rate` - ICMS in percent; `None` uses 12%.
pub fn calculate_taxes(
    revenue: f64,
    regime: TaxRegime,
    state_icms_rate: Option<f64>,
) -> CoreResult<TaxCalculation> {
    TaxPolicy::default().calculate(revenue, regime, state_icms_rate)
}

impl TaxPolicy {
    /// Calculates taxes under this policy's rates.
    ///
    /// Pure and deterministic: the same `(revenue, regime, icms)` always
    /// yields the same breakdown, so results may be memoized by callers.
    ///
    /// ## Errors
    /// Rejects the call before computing anything when a rate of this
    /// policy is outside 0-100, so a negative tax can never come out.
    pub fn calculate(
        &self,
        revenue: f64,
        regime: TaxRegime,
        state_icms_rate: Option<f64>,
    ) -> CoreResult<TaxCalculation> {
        self.validate()?;
        let revenue = validate_amount("revenue", revenue)?;
        let icms_rate = validate_percentage(
            "state_icms_rate",
            state_icms_rate.unwrap_or(self.default_state_icms_rate),
        )?;

        let share = |rate: f64| revenue * rate / 100.0;

        let taxes = match regime {
            TaxRegime::SimplesNacional => TaxCalculation {
                iss: share(self.simples_nacional_iss_share),
                total: share(self.simples_nacional_rate),
                ..TaxCalculation::zero(regime)
            },

            TaxRegime::LucroPresumido => {
                let iss = share(self.presumido_iss_rate);
                let icms = share(icms_rate);
                let pis = share(self.presumido_pis_rate);
                let cofins = share(self.presumido_cofins_rate);
                let irpj = share(self.presumido_irpj_rate);
                let csll = share(self.presumido_csll_rate);

                TaxCalculation {
                    iss,
                    icms,
                    pis,
                    cofins,
                    irpj,
                    csll,
                    total: iss + icms + pis + cofins + irpj + csll,
                    regime,
                }
            }

            TaxRegime::LucroReal => {
                let iss = share(self.real_iss_rate);
                let icms = share(icms_rate);
                let pis = share(self.real_pis_rate);
                let cofins = share(self.real_cofins_rate);

                TaxCalculation {
                    iss,
                    icms,
                    pis,
                    cofins,
                    total: iss + icms + pis + cofins,
                    ..TaxCalculation::zero(regime)
                }
            }
        };

        Ok(taxes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_lucro_presumido_breakdown() {
        let taxes = calculate_taxes(1000.0, TaxRegime::LucroPresumido, Some(12.0)).unwrap();

        assert!((taxes.iss - 50.0).abs() < EPS);
        assert!((taxes.icms - 120.0).abs() < EPS);
        assert!((taxes.pis - 6.5).abs() < EPS);
        assert!((taxes.cofins - 30.0).abs() < EPS);
        assert!((taxes.irpj - 15.0).abs() < EPS);
        assert!((taxes.csll - 9.0).abs() < EPS);
        assert!((taxes.total - 230.5).abs() < EPS);
        assert_eq!(taxes.regime, TaxRegime::LucroPresumido);
    }

    #[test]
    fn test_simples_nacional_total() {
        let taxes = calculate_taxes(1000.0, TaxRegime::SimplesNacional, None).unwrap();

        assert!((taxes.total - 120.0).abs() < EPS);
        // ISS is informational and already part of the total
        assert!((taxes.iss - 20.0).abs() < EPS);
        assert_eq!(taxes.icms, 0.0);
        assert_eq!(taxes.pis, 0.0);
        assert_eq!(taxes.cofins, 0.0);
    }

    #[test]
    fn test_simples_nacional_ignores_icms() {
        let a = calculate_taxes(1000.0, TaxRegime::SimplesNacional, Some(0.0)).unwrap();
        let b = calculate_taxes(1000.0, TaxRegime::SimplesNacional, Some(18.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lucro_real_omits_profit_taxes() {
        let taxes = calculate_taxes(1000.0, TaxRegime::LucroReal, None).unwrap();

        assert!((taxes.iss - 50.0).abs() < EPS);
        assert!((taxes.icms - 120.0).abs() < EPS);
        assert!((taxes.pis - 16.5).abs() < EPS);
        assert!((taxes.cofins - 76.0).abs() < EPS);
        assert_eq!(taxes.irpj, 0.0);
        assert_eq!(taxes.csll, 0.0);
        assert!((taxes.total - 262.5).abs() < EPS);
    }

    #[test]
    fn test_total_is_sum_of_components() {
        for regime in [TaxRegime::LucroPresumido, TaxRegime::LucroReal] {
            let t = calculate_taxes(873.21, regime, Some(17.0)).unwrap();
            let sum = t.iss + t.icms + t.pis + t.cofins + t.irpj + t.csll;
            assert!((t.total - sum).abs() < EPS, "{regime}");
        }
    }

    #[test]
    fn test_custom_icms_rate() {
        let taxes = calculate_taxes(1000.0, TaxRegime::LucroPresumido, Some(18.0)).unwrap();
        assert!((taxes.icms - 180.0).abs() < EPS);
        assert!((taxes.total - 290.5).abs() < EPS);
    }

    #[test]
    fn test_zero_revenue() {
        for regime in TaxRegime::ALL {
            let taxes = calculate_taxes(0.0, regime, None).unwrap();
            assert_eq!(taxes.total, 0.0);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(calculate_taxes(-1.0, TaxRegime::SimplesNacional, None).is_err());
        assert!(calculate_taxes(f64::NAN, TaxRegime::LucroReal, None).is_err());
        assert!(calculate_taxes(100.0, TaxRegime::LucroReal, Some(101.0)).is_err());
    }

    #[test]
    fn test_policy_override() {
        let policy = TaxPolicy {
            simples_nacional_rate: 8.0,
            ..TaxPolicy::default()
        };
        let taxes = policy
            .calculate(1000.0, TaxRegime::SimplesNacional, None)
            .unwrap();
        assert!((taxes.total - 80.0).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_policy_rejected() {
        let negative = TaxPolicy {
            simples_nacional_rate: -20.0,
            ..TaxPolicy::default()
        };
        let err = negative
            .calculate(1000.0, TaxRegime::SimplesNacional, None)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::OutOfRange { ref field, .. })
                if field == "tax.simples_nacional_rate"
        ));

        // A bad rate is rejected even when the regime would not read it
        let excessive = TaxPolicy {
            real_cofins_rate: 140.0,
            ..TaxPolicy::default()
        };
        assert!(excessive
            .calculate(1000.0, TaxRegime::SimplesNacional, None)
            .is_err());
    }
}
