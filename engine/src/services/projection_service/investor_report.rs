// Handler for the GetInvestorReport RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use shared::models::LedgerMonth;
use shared::utils::indian_format::format_percentage;

use crate::data::property_store::PropertyStore;
use crate::error::EngineError;
use crate::ledger::report::{period_report, trailing_months, MAX_TRAILING_MONTHS};
use crate::services::{InvestorReportRequest, InvestorReportResponse};

pub async fn handle_investor_report(
    req_payload: InvestorReportRequest,
    store: Arc<RwLock<PropertyStore>>,
) -> Result<Response<InvestorReportResponse>, Status> {
    if req_payload.trailing_months > MAX_TRAILING_MONTHS {
        return Err(EngineError::invalid_input(
            "trailingMonths",
            format!("must be at most {}, got {}", MAX_TRAILING_MONTHS, req_payload.trailing_months),
        )
        .into());
    }
    let mut months = Vec::with_capacity(req_payload.months.len());
    for raw in &req_payload.months {
        let month = LedgerMonth::parse(raw).map_err(|e| EngineError::invalid_input("months", e.to_string()))?;
        months.push(month);
    }

    let store = store.read().await;
    let property = store.get_property(&req_payload.property_id)?;
    if months.is_empty() {
        let latest = property.monthly_ledger_data.iter().map(|entry| entry.month).max();
        months = match (req_payload.trailing_months, latest) {
            (0, _) | (_, None) => property.monthly_ledger_data.iter().map(|entry| entry.month).collect(),
            (count, Some(latest)) => trailing_months(latest, count)?,
        };
    }

    let report = period_report(property, req_payload.investment_amount, &months)?;
    tracing::debug!(
        property_id = %property.id,
        months_covered = report.months_covered,
        period_roi = %format_percentage(report.investor_roi_for_period, 2),
        annualized_roi = %format_percentage(report.annualized_roi, 2),
        "Investor report built (handler)"
    );
    Ok(Response::new(InvestorReportResponse {
        ownership_percentage: report.ownership_percentage,
        total_revenue: report.total_revenue,
        total_opex: report.total_opex,
        total_net_profit: report.total_net_profit,
        total_investor_share: report.total_investor_share,
        average_occupancy_percentage: report.average_occupancy_percentage,
        investor_roi_for_period: report.investor_roi_for_period,
        annualized_roi: report.annualized_roi,
        rev_par: report.rev_par,
        months_covered: report.months_covered,
    }))
}
