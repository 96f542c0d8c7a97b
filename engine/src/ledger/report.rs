// Investor-facing performance reports built from recorded ledger actuals.
use serde::Serialize;
use shared::models::{Investor, LedgerMonth, OperatingExpenditure, Property, PropertyStatus};
use shared::utils::round2;
use std::collections::BTreeSet;

use crate::error::EngineError;
use crate::projection::DAYS_PER_MONTH_APPROXIMATION;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInvestorLine {
    pub month: LedgerMonth,
    pub investor_share: f64,
    pub occupancy_percentage: f64,
    pub revenue: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub ownership_percentage: f64,
    pub total_revenue: f64,
    pub total_opex: f64,
    pub aggregated_opex: OperatingExpenditure,
    pub total_net_profit: f64,
    pub total_investor_share: f64,
    pub average_occupancy_percentage: f64,
    pub investor_roi_for_period: f64,
    pub annualized_roi: f64,
    pub rev_par: f64,
    /// Number of distinct months selected, whether or not each has ledger data.
    pub months_covered: u32,
    /// One line per ledger month in the period, oldest first.
    pub monthly: Vec<MonthlyInvestorLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_capital_invested: f64,
    pub cumulative_profit_earned: f64,
    pub active_properties_count: u32,
    pub average_roi_to_date: f64,
}

/// Share of a property owned by an investment, in percent. Zero when the goal is zero.
pub fn ownership_percentage(investment_amount: f64, investment_goal: f64) -> f64 {
    if investment_goal > 0.0 {
        (investment_amount / investment_goal) * 100.0
    } else {
        0.0
    }
}

/// Longest window a report may cover: one hundred years.
pub const MAX_TRAILING_MONTHS: u32 = 1200;

/// The `count` months ending at `end` (inclusive), oldest first.
pub fn trailing_months(end: LedgerMonth, count: u32) -> Result<Vec<LedgerMonth>, EngineError> {
    if count > MAX_TRAILING_MONTHS {
        return Err(EngineError::invalid_input(
            "trailingMonths",
            format!("must be at most {}, got {}", MAX_TRAILING_MONTHS, count),
        ));
    }
    Ok((0..count).rev().filter_map(|back| end.months_back(back)).collect())
}

/// Summarises a property's actuals over the selected months for one investment.
pub fn period_report(property: &Property, investment_amount: f64, months: &[LedgerMonth]) -> Result<PeriodReport, EngineError> {
    if !investment_amount.is_finite() || investment_amount < 0.0 {
        return Err(EngineError::invalid_input(
            "investmentAmount",
            format!("must be a non-negative amount, got {}", investment_amount),
        ));
    }

    let selected: BTreeSet<LedgerMonth> = months.iter().copied().collect();
    let ownership = ownership_percentage(investment_amount, property.investment_goal);

    let mut entries: Vec<_> = property
        .monthly_ledger_data
        .iter()
        .filter(|entry| selected.contains(&entry.month))
        .collect();
    entries.sort_by_key(|entry| entry.month);

    let mut total_revenue = 0.0;
    let mut total_opex = 0.0;
    let mut aggregated_opex = OperatingExpenditure::default();
    let mut total_net_profit = 0.0;
    let mut total_investor_share = 0.0;
    let mut occupancy_sum = 0.0;
    let mut monthly = Vec::with_capacity(entries.len());

    for entry in &entries {
        let investor_share = entry.net_profit_actual * (ownership / 100.0);
        total_revenue += entry.revenue;
        total_opex += entry.total_operating_expenses_actual;
        total_net_profit += entry.net_profit_actual;
        total_investor_share += investor_share;
        occupancy_sum += entry.occupancy_rate_actual;
        aggregated_opex.accumulate(&entry.opex_actual);

        monthly.push(MonthlyInvestorLine {
            month: entry.month,
            investor_share: round2(investor_share),
            occupancy_percentage: round2(entry.occupancy_rate_actual * 100.0),
            revenue: round2(entry.revenue),
            expense: round2(entry.total_operating_expenses_actual),
        });
    }

    let months_covered = selected.len() as u32;
    let average_occupancy_percentage = if entries.is_empty() {
        0.0
    } else {
        (occupancy_sum / entries.len() as f64) * 100.0
    };
    let investor_roi_for_period = if investment_amount > 0.0 {
        (total_investor_share / investment_amount) * 100.0
    } else {
        0.0
    };
    // Periods shorter than a year are scaled up; a year or more is reported as-is.
    let annualized_roi = match months_covered {
        0 => 0.0,
        m if m < 12 => (investor_roi_for_period / f64::from(m)) * 12.0,
        _ => investor_roi_for_period,
    };

    let rooms = f64::from(property.revenue_assumptions.number_of_rooms);
    let days_in_period = f64::from(months_covered) * DAYS_PER_MONTH_APPROXIMATION;
    let rev_par = if rooms > 0.0 && days_in_period > 0.0 {
        total_revenue / (rooms * days_in_period)
    } else {
        0.0
    };

    tracing::debug!(
        property_id = %property.id,
        months_covered,
        ledger_months = entries.len(),
        total_investor_share,
        "Built investor period report"
    );

    Ok(PeriodReport {
        ownership_percentage: round2(ownership),
        total_revenue: round2(total_revenue),
        total_opex: round2(total_opex),
        aggregated_opex,
        total_net_profit: round2(total_net_profit),
        total_investor_share: round2(total_investor_share),
        average_occupancy_percentage: round2(average_occupancy_percentage),
        investor_roi_for_period: round2(investor_roi_for_period),
        annualized_roi: round2(annualized_roi),
        rev_par: round2(rev_par),
        months_covered,
        monthly,
    })
}

/// Aggregates an investor's holdings against the properties' full ledgers.
pub fn portfolio_summary(investor: &Investor, properties: &[Property]) -> PortfolioSummary {
    let mut total_capital = 0.0;
    let mut cumulative_profit = 0.0;
    let mut active_properties = 0u32;

    for investment in &investor.properties_invested {
        total_capital += investment.amount;
        let Some(property) = properties.iter().find(|p| p.id == investment.property_id) else {
            tracing::warn!(
                investor_id = %investor.id,
                property_id = %investment.property_id,
                "Investment references an unknown property; skipping its ledger"
            );
            continue;
        };
        if property.status != PropertyStatus::Closed {
            active_properties += 1;
        }
        let ownership = ownership_percentage(investment.amount, property.investment_goal);
        cumulative_profit += property
            .monthly_ledger_data
            .iter()
            .map(|entry| entry.net_profit_actual * (ownership / 100.0))
            .sum::<f64>();
    }

    let average_roi = if total_capital > 0.0 {
        (cumulative_profit / total_capital) * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        total_capital_invested: round2(total_capital),
        cumulative_profit_earned: round2(cumulative_profit),
        active_properties_count: active_properties,
        average_roi_to_date: round2(average_roi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::record_actuals;
    use shared::defaults::{DEFAULT_CAPEX, DEFAULT_OPEX, DEFAULT_REVENUE_ASSUMPTIONS};
    use shared::models::InvestorInvestment;

    fn month(s: &str) -> LedgerMonth {
        LedgerMonth::parse(s).unwrap()
    }

    fn property_with_ledger(id: &str) -> Property {
        let mut property = Property::new(id, "Koramangala Residency", "Bengaluru", DEFAULT_CAPEX, DEFAULT_OPEX, DEFAULT_REVENUE_ASSUMPTIONS, 10);
        property.status = PropertyStatus::Live;
        // Net profits: Feb 104920, Jan 204920, Mar 304920
        property.monthly_ledger_data = vec![
            record_actuals(month("2024-02"), 300_000.0, 0.6, DEFAULT_OPEX, 0.0).unwrap(),
            record_actuals(month("2024-01"), 400_000.0, 0.8, DEFAULT_OPEX, 0.0).unwrap(),
            record_actuals(month("2024-03"), 500_000.0, 1.0, DEFAULT_OPEX, 0.0).unwrap(),
        ];
        property
    }

    #[test]
    fn test_ownership_percentage() {
        assert_eq!(ownership_percentage(176_016.0, 1_760_160.0), 10.0);
        assert_eq!(ownership_percentage(176_016.0, 0.0), 0.0);
    }

    #[test]
    fn test_trailing_months() {
        let months = trailing_months(month("2024-02"), 3).unwrap();
        let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
        assert!(trailing_months(month("2024-02"), 0).unwrap().is_empty());
        assert_eq!(trailing_months(month("2024-02"), MAX_TRAILING_MONTHS).unwrap().len(), 1200);
        assert!(matches!(
            trailing_months(month("2024-02"), u32::MAX),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "trailingMonths"
        ));
    }

    #[test]
    fn test_period_report_for_ten_percent_owner() {
        let property = property_with_ledger("p1");
        let months = trailing_months(month("2024-03"), 3).unwrap();
        let report = period_report(&property, 176_016.0, &months).unwrap();

        assert_eq!(report.ownership_percentage, 10.0);
        assert_eq!(report.total_revenue, 1_200_000.0);
        assert_eq!(report.total_opex, 585_240.0);
        assert_eq!(report.aggregated_opex.rent, 390_000.0);
        assert_eq!(report.total_net_profit, 614_760.0);
        assert_eq!(report.total_investor_share, 61_476.0);
        assert_eq!(report.average_occupancy_percentage, 80.0);
        // 61476 / 176016 * 100 = 34.9269...
        assert_eq!(report.investor_roi_for_period, 34.93);
        assert_eq!(report.annualized_roi, 139.71);
        // 1,200,000 / (4 rooms * 90 days)
        assert_eq!(report.rev_par, 3333.33);
        assert_eq!(report.months_covered, 3);

        let lines: Vec<String> = report.monthly.iter().map(|l| l.month.to_string()).collect();
        assert_eq!(lines, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(report.monthly[0].investor_share, 20_492.0);
        assert_eq!(report.monthly[1].occupancy_percentage, 60.0);
    }

    #[test]
    fn test_period_report_counts_selected_months_without_data() {
        let property = property_with_ledger("p1");
        let months = vec![month("2024-03"), month("2024-04"), month("2024-03")];
        let report = period_report(&property, 176_016.0, &months).unwrap();
        assert_eq!(report.months_covered, 2);
        assert_eq!(report.monthly.len(), 1);
        assert_eq!(report.total_revenue, 500_000.0);
        // 30492 / 176016 * 100 = 17.3234...; annualized over the two selected months.
        assert_eq!(report.investor_roi_for_period, 17.32);
        assert_eq!(report.annualized_roi, 103.94);
    }

    #[test]
    fn test_period_report_empty_selection() {
        let property = property_with_ledger("p1");
        let report = period_report(&property, 176_016.0, &[]).unwrap();
        assert_eq!(report.months_covered, 0);
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.annualized_roi, 0.0);
        assert_eq!(report.rev_par, 0.0);
        assert_eq!(report.average_occupancy_percentage, 0.0);
        assert!(report.monthly.is_empty());
    }

    #[test]
    fn test_period_report_rejects_bad_amount() {
        let property = property_with_ledger("p1");
        assert!(period_report(&property, -10.0, &[]).is_err());
        assert!(period_report(&property, f64::NAN, &[]).is_err());
    }

    #[test]
    fn test_portfolio_summary() {
        let live = property_with_ledger("p1");
        let mut closed = property_with_ledger("p2");
        closed.status = PropertyStatus::Closed;
        closed.monthly_ledger_data.truncate(1);

        let mut investor = Investor::new("inv-1", "Asha Rao", "asha@example.com");
        investor.properties_invested = vec![
            InvestorInvestment { property_id: "p1".to_string(), amount: 176_016.0, date_invested: None },
            InvestorInvestment { property_id: "p2".to_string(), amount: 352_032.0, date_invested: None },
            InvestorInvestment { property_id: "gone".to_string(), amount: 1_000.0, date_invested: None },
        ];

        let summary = portfolio_summary(&investor, &[live, closed]);
        assert_eq!(summary.total_capital_invested, 529_048.0);
        assert_eq!(summary.active_properties_count, 1);
        // 10% of 614760 plus 20% of the one remaining February month (104920)
        assert_eq!(summary.cumulative_profit_earned, 82_460.0);
        assert_eq!(summary.average_roi_to_date, 15.59);
    }

    #[test]
    fn test_portfolio_summary_without_investments() {
        let investor = Investor::new("inv-2", "Ravi", "ravi@example.com");
        let summary = portfolio_summary(&investor, &[]);
        assert_eq!(summary.total_capital_invested, 0.0);
        assert_eq!(summary.average_roi_to_date, 0.0);
    }
}
