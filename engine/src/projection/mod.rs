// Financial projection engine: revenue, OpEx, profit, investor share and the ROI table.
//
// `compute_metrics` is a pure function of its inputs. It holds no state, so it can be
// called from any number of tasks at once without coordination.
pub mod validation;

use shared::models::{
    CalculatedMetrics, CapitalExpenditure, OperatingExpenditure, PolicyRates, RevenueAssumptions,
    RoiProjectionItem,
};
use shared::utils::round2;

use crate::error::EngineError;

/// Every month is treated as 30 days. Not calendar accurate; swap here for real day counts.
pub const DAYS_PER_MONTH_APPROXIMATION: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// Upper bound on the projection horizon accepted from callers.
pub const MAX_PROJECTION_YEARS: u32 = 50;

/// Projects revenue, expenses, profit, investor distribution and a year-by-year ROI table.
///
/// Inputs are validated first; a bad field yields `EngineError::InvalidInput` and no
/// partial result. Occupancy outside `[0, 1]` is clamped rather than rejected.
///
/// All figures are computed at full precision and rounded to two decimals only when
/// written into the returned `CalculatedMetrics`. In particular the cumulative return is
/// the running sum of the unrounded annual returns.
///
/// The investor share is held flat across the horizon: every projected year repeats
/// the same annual return, with no depreciation, escalation or reinvestment.
pub fn compute_metrics(
    capex: &CapitalExpenditure,
    opex: &OperatingExpenditure,
    revenue: &RevenueAssumptions,
    rates: &PolicyRates,
) -> Result<CalculatedMetrics, EngineError> {
    validation::validate_capex(capex)?;
    validation::validate_opex(opex)?;
    validation::validate_revenue(revenue)?;
    validation::validate_rates(rates)?;

    let total_capex = capex.total();
    let total_opex_monthly = opex.total();
    let annual_opex = total_opex_monthly * MONTHS_PER_YEAR;

    let rentable_rooms = revenue.number_of_rooms;
    let occupancy = revenue.occupancy_rate.clamp(0.0, 1.0);

    let monthly_gross_revenue =
        revenue.tariff_per_room * occupancy * f64::from(rentable_rooms) * DAYS_PER_MONTH_APPROXIMATION;
    let monthly_gst_amount = monthly_gross_revenue * rates.gst_rate;
    let monthly_commission_amount = monthly_gross_revenue * rates.commission_rate;
    let monthly_net_revenue = monthly_gross_revenue - monthly_gst_amount - monthly_commission_amount;
    let annual_net_revenue = monthly_net_revenue * MONTHS_PER_YEAR;

    // No floor: a loss-making property reports a negative profit and share.
    let annual_net_profit = annual_net_revenue - annual_opex;
    let annual_investor_share = annual_net_profit * rates.investor_share_rate;
    let monthly_investor_share = annual_investor_share / MONTHS_PER_YEAR;

    let annual_return_percentage = if total_capex > 0.0 {
        (annual_investor_share / total_capex) * 100.0
    } else {
        0.0
    };

    let mut cumulative_return_percentage = 0.0;
    let mut roi_projections = Vec::with_capacity(rates.projection_years as usize);
    for year in 1..=rates.projection_years {
        cumulative_return_percentage += annual_return_percentage;
        roi_projections.push(RoiProjectionItem {
            year,
            annual_return_percentage: round2(annual_return_percentage),
            cumulative_return_percentage: round2(cumulative_return_percentage),
            annual_investor_share_amount: round2(annual_investor_share),
        });
    }

    tracing::debug!(
        total_capex,
        monthly_gross_revenue,
        annual_net_profit,
        annual_return_percentage,
        years = rates.projection_years,
        "Computed property metrics"
    );

    Ok(CalculatedMetrics {
        total_capex: round2(total_capex),
        total_opex_monthly: round2(total_opex_monthly),
        annual_opex: round2(annual_opex),
        monthly_gross_revenue: round2(monthly_gross_revenue),
        monthly_gst_amount: round2(monthly_gst_amount),
        monthly_commission_amount: round2(monthly_commission_amount),
        monthly_net_revenue: round2(monthly_net_revenue),
        annual_net_revenue: round2(annual_net_revenue),
        annual_net_profit: round2(annual_net_profit),
        annual_investor_share: round2(annual_investor_share),
        monthly_investor_share: round2(monthly_investor_share),
        roi_projections,
        rentable_rooms,
    })
}

/// Price of one investment slot: the investment goal split evenly across slots.
pub fn value_per_slot(total_capex: f64, number_of_slots: u32) -> Result<f64, EngineError> {
    if number_of_slots == 0 {
        return Err(EngineError::invalid_input("numberOfInvestmentSlots", "must be at least 1"));
    }
    if !total_capex.is_finite() || total_capex < 0.0 {
        return Err(EngineError::invalid_input("totalCapex", format!("must be a non-negative finite amount, got {}", total_capex)));
    }
    Ok(round2(total_capex / f64::from(number_of_slots)))
}

/// Amount committed when buying `requested` slots while `available_slots` remain unsold.
pub fn slot_investment(value_per_slot: f64, requested: u32, available_slots: u32) -> Result<f64, EngineError> {
    if !value_per_slot.is_finite() || value_per_slot <= 0.0 {
        return Err(EngineError::invalid_input(
            "valuePerSlot",
            format!("must be a positive amount to invest in, got {}", value_per_slot),
        ));
    }
    if available_slots == 0 {
        return Err(EngineError::invalid_input("slots", "no investment slots left"));
    }
    if requested == 0 || requested > available_slots {
        return Err(EngineError::invalid_input(
            "slots",
            format!("number of slots must be between 1 and {}, got {}", available_slots, requested),
        ));
    }
    Ok(round2(value_per_slot * f64::from(requested)))
}

/// Whole slots already paid for out of `amount_raised`.
pub fn slots_sold(amount_raised: f64, value_per_slot: f64) -> u32 {
    if value_per_slot > 0.0 && amount_raised > 0.0 {
        (amount_raised / value_per_slot).round() as u32
    } else {
        0
    }
}

/// Amount raised once every slot is sold. Off from the goal by at most the
/// rounding of `value_per_slot` times the slot count.
pub fn slot_funding_total(investment_goal: f64, number_of_slots: u32) -> Result<f64, EngineError> {
    let per_slot = value_per_slot(investment_goal, number_of_slots)?;
    Ok(round2(per_slot * f64::from(number_of_slots)))
}
