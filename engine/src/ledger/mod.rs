// Monthly actuals recorded against a property, and the reports derived from them.
pub mod report;

use shared::models::{LedgerMonth, MonthlyLedgerEntry, OperatingExpenditure};

use crate::error::EngineError;
use crate::projection::validation::validate_opex;

/// Validates recorded actuals and builds the ledger entry for `month`.
///
/// Unlike projected occupancy, an actual occupancy outside `[0, 1]` is a data-entry
/// mistake and is rejected.
pub fn record_actuals(
    month: LedgerMonth,
    revenue: f64,
    occupancy_rate_actual: f64,
    opex_actual: OperatingExpenditure,
    total_payout_to_investors: f64,
) -> Result<MonthlyLedgerEntry, EngineError> {
    if !revenue.is_finite() || revenue < 0.0 {
        return Err(EngineError::invalid_input("revenue", format!("must be a non-negative amount, got {}", revenue)));
    }
    if !(0.0..=1.0).contains(&occupancy_rate_actual) {
        return Err(EngineError::invalid_input(
            "occupancyRateActual",
            format!("must be between 0 and 1, got {}", occupancy_rate_actual),
        ));
    }
    if !total_payout_to_investors.is_finite() || total_payout_to_investors < 0.0 {
        return Err(EngineError::invalid_input(
            "totalPayoutToInvestors",
            format!("must be a non-negative amount, got {}", total_payout_to_investors),
        ));
    }
    validate_opex(&opex_actual)?;

    Ok(MonthlyLedgerEntry::from_actuals(
        month,
        revenue,
        occupancy_rate_actual,
        opex_actual,
        total_payout_to_investors,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::DEFAULT_OPEX;

    fn march() -> LedgerMonth {
        LedgerMonth::new(2024, 3).unwrap()
    }

    #[test]
    fn test_record_actuals_derives_net_profit() {
        let entry = record_actuals(march(), 380_000.0, 0.74, DEFAULT_OPEX, 90_000.0).unwrap();
        assert_eq!(entry.total_operating_expenses_actual, 195_080.0);
        assert_eq!(entry.net_profit_actual, 184_920.0);
        assert_eq!(entry.total_payout_to_investors, 90_000.0);
    }

    #[test]
    fn test_record_actuals_allows_a_loss_month() {
        let entry = record_actuals(march(), 100_000.0, 0.2, DEFAULT_OPEX, 0.0).unwrap();
        assert_eq!(entry.net_profit_actual, -95_080.0);
    }

    #[test]
    fn test_record_actuals_rejects_bad_values() {
        assert!(record_actuals(march(), -1.0, 0.5, DEFAULT_OPEX, 0.0).is_err());
        assert!(record_actuals(march(), 1.0, 1.2, DEFAULT_OPEX, 0.0).is_err());
        assert!(record_actuals(march(), 1.0, f64::NAN, DEFAULT_OPEX, 0.0).is_err());
        assert!(record_actuals(march(), 1.0, 0.5, DEFAULT_OPEX, f64::INFINITY).is_err());
        let opex = OperatingExpenditure { staff: -5.0, ..DEFAULT_OPEX };
        assert!(record_actuals(march(), 1.0, 0.5, opex, 0.0).is_err());
    }
}
