// Conversions between wire messages and domain types.
use shared::models::{
    CalculatedMetrics, CapitalExpenditure, MonthlyLedgerEntry, OperatingExpenditure, PolicyRates, Property,
    RevenueAssumptions,
};

use crate::error::EngineError;
use crate::ledger::report::PortfolioSummary;
use crate::projection::{self, validation};
use crate::services::{
    LedgerEntryMessage, MetricsResponse, PortfolioSummaryResponse, PropertyResponse, ProtoCapex, ProtoOpex, ProtoRates,
    ProtoRevenue, ProtoRoiProjection,
};

fn required<T>(message: Option<T>, field: &str) -> Result<T, EngineError> {
    message.ok_or_else(|| EngineError::invalid_input(field, "is required"))
}

pub fn capex_from_proto(capex: Option<ProtoCapex>) -> Result<CapitalExpenditure, EngineError> {
    let capex = required(capex, "capex")?;
    Ok(CapitalExpenditure {
        setup_cost: capex.setup_cost,
        security_deposit: capex.security_deposit,
        working_capital: capex.working_capital,
        emergency_fund: capex.emergency_fund,
    })
}

pub fn opex_from_proto(opex: Option<ProtoOpex>) -> Result<OperatingExpenditure, EngineError> {
    let opex = required(opex, "opex")?;
    Ok(OperatingExpenditure {
        rent: opex.rent,
        staff: opex.staff,
        food_staff: opex.food_staff,
        utilities: opex.utilities,
        maintenance: opex.maintenance,
        other_operating_costs: opex.other_operating_costs,
    })
}

pub fn revenue_from_proto(revenue: Option<ProtoRevenue>) -> Result<RevenueAssumptions, EngineError> {
    let revenue = required(revenue, "revenue")?;
    let number_of_rooms = u32::try_from(revenue.number_of_rooms).map_err(|_| {
        EngineError::invalid_input(
            "numberOfRooms",
            format!("must be a whole number between 0 and {}, got {}", u32::MAX, revenue.number_of_rooms),
        )
    })?;
    Ok(RevenueAssumptions {
        tariff_per_room: revenue.tariff_per_room,
        occupancy_rate: revenue.occupancy_rate,
        number_of_rooms,
    })
}

/// Rates carried by the request, or the engine defaults when the request has none.
pub fn rates_from_proto(rates: Option<ProtoRates>, defaults: &PolicyRates) -> Result<PolicyRates, EngineError> {
    let Some(rates) = rates else {
        return Ok(*defaults);
    };
    let rates = PolicyRates {
        gst_rate: rates.gst_rate,
        commission_rate: rates.commission_rate,
        investor_share_rate: rates.investor_share_rate,
        projection_years: rates.projection_years,
    };
    validation::validate_rates(&rates)?;
    Ok(rates)
}

pub fn to_metrics_response(metrics: &CalculatedMetrics) -> MetricsResponse {
    MetricsResponse {
        total_capex: metrics.total_capex,
        total_opex_monthly: metrics.total_opex_monthly,
        annual_opex: metrics.annual_opex,
        monthly_gross_revenue: metrics.monthly_gross_revenue,
        monthly_gst_amount: metrics.monthly_gst_amount,
        monthly_commission_amount: metrics.monthly_commission_amount,
        monthly_net_revenue: metrics.monthly_net_revenue,
        annual_net_revenue: metrics.annual_net_revenue,
        annual_net_profit: metrics.annual_net_profit,
        annual_investor_share: metrics.annual_investor_share,
        monthly_investor_share: metrics.monthly_investor_share,
        roi_projections: metrics
            .roi_projections
            .iter()
            .map(|item| ProtoRoiProjection {
                year: item.year,
                annual_return_percentage: item.annual_return_percentage,
                cumulative_return_percentage: item.cumulative_return_percentage,
                annual_investor_share_amount: item.annual_investor_share_amount,
            })
            .collect(),
        rentable_rooms: metrics.rentable_rooms,
    }
}

pub fn to_proto_opex(opex: &OperatingExpenditure) -> ProtoOpex {
    ProtoOpex {
        rent: opex.rent,
        staff: opex.staff,
        food_staff: opex.food_staff,
        utilities: opex.utilities,
        maintenance: opex.maintenance,
        other_operating_costs: opex.other_operating_costs,
    }
}

pub fn to_ledger_message(entry: &MonthlyLedgerEntry) -> LedgerEntryMessage {
    LedgerEntryMessage {
        month: entry.month.to_string(),
        revenue: entry.revenue,
        occupancy_rate_actual: entry.occupancy_rate_actual,
        opex_actual: Some(to_proto_opex(&entry.opex_actual)),
        total_operating_expenses_actual: entry.total_operating_expenses_actual,
        net_profit_actual: entry.net_profit_actual,
        total_payout_to_investors: entry.total_payout_to_investors,
    }
}

/// Listing summary with freshly projected metrics.
pub fn to_property_response(property: &Property, rates: &PolicyRates) -> Result<PropertyResponse, EngineError> {
    let metrics = projection::compute_metrics(
        &property.capex_details,
        &property.opex_details,
        &property.revenue_assumptions,
        rates,
    )?;
    Ok(PropertyResponse {
        id: property.id.clone(),
        name: property.name.clone(),
        city: property.city.clone(),
        status: property.status.to_string(),
        investment_goal: property.investment_goal,
        amount_raised: property.amount_raised,
        value_per_slot: projection::value_per_slot(property.investment_goal, property.number_of_investment_slots)?,
        number_of_investment_slots: property.number_of_investment_slots,
        metrics: Some(to_metrics_response(&metrics)),
    })
}

pub fn to_portfolio_response(summary: &PortfolioSummary) -> PortfolioSummaryResponse {
    PortfolioSummaryResponse {
        total_capital_invested: summary.total_capital_invested,
        cumulative_profit_earned: summary.cumulative_profit_earned,
        active_properties_count: summary.active_properties_count,
        average_roi_to_date: summary.average_roi_to_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_messages_are_invalid_input() {
        assert!(matches!(capex_from_proto(None), Err(EngineError::InvalidInput { .. })));
        assert!(matches!(opex_from_proto(None), Err(EngineError::InvalidInput { .. })));
        assert!(matches!(revenue_from_proto(None), Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_room_count_bounds() {
        let revenue = |rooms: i64| Some(ProtoRevenue { tariff_per_room: 4250.0, occupancy_rate: 0.8, number_of_rooms: rooms });
        assert_eq!(revenue_from_proto(revenue(4)).unwrap().number_of_rooms, 4);
        assert!(revenue_from_proto(revenue(-1)).is_err());
        assert!(revenue_from_proto(revenue(i64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_rates_default_when_absent() {
        let defaults = PolicyRates::default();
        assert_eq!(rates_from_proto(None, &defaults).unwrap(), defaults);

        let custom = ProtoRates { gst_rate: 0.0, commission_rate: 0.1, investor_share_rate: 0.4, projection_years: 3 };
        assert_eq!(rates_from_proto(Some(custom), &defaults).unwrap().projection_years, 3);

        let bad = ProtoRates { gst_rate: -0.1, commission_rate: 0.1, investor_share_rate: 0.4, projection_years: 3 };
        assert!(rates_from_proto(Some(bad), &defaults).is_err());
    }
}
