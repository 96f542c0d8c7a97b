// Handlers for the RecordInvestment and GetPortfolioSummary RPCs
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use shared::models::Investor;

use super::helpers::to_portfolio_response;
use crate::data::property_store::PropertyStore;
use crate::error::EngineError;
use crate::ledger::report::portfolio_summary;
use crate::projection::{slot_investment, slots_sold, value_per_slot};
use crate::services::{InvestorRequest, PortfolioSummaryResponse, RecordInvestmentRequest};

pub async fn handle_record_investment(
    req_payload: RecordInvestmentRequest,
    store: Arc<RwLock<PropertyStore>>,
) -> Result<Response<PortfolioSummaryResponse>, Status> {
    let mut store = store.write().await;

    let property = store.get_property(&req_payload.property_id)?;
    let slot_value = value_per_slot(property.investment_goal, property.number_of_investment_slots)?;
    let available_slots = property
        .number_of_investment_slots
        .saturating_sub(slots_sold(property.amount_raised, slot_value));
    let amount = slot_investment(slot_value, req_payload.slots, available_slots)?;
    store.check_investment(&req_payload.property_id, amount)?;

    // First investment registers the investor, only once the investment is known to go through.
    if store.get_investor(&req_payload.investor_id).is_err() {
        if req_payload.investor_name.trim().is_empty() {
            return Err(EngineError::invalid_input("investorName", "is required for a new investor").into());
        }
        store.add_investor(Investor::new(
            req_payload.investor_id.clone(),
            req_payload.investor_name.trim(),
            req_payload.investor_email.trim(),
        ))?;
    }

    store.record_investment(&req_payload.investor_id, &req_payload.property_id, amount)?;

    let investor = store.get_investor(&req_payload.investor_id)?;
    let summary = portfolio_summary(investor, &store.list_properties());
    Ok(Response::new(to_portfolio_response(&summary)))
}

pub async fn handle_portfolio_summary(
    req_payload: InvestorRequest,
    store: Arc<RwLock<PropertyStore>>,
) -> Result<Response<PortfolioSummaryResponse>, Status> {
    let store = store.read().await;
    let investor = store.get_investor(&req_payload.investor_id)?;
    let summary = portfolio_summary(investor, &store.list_properties());
    Ok(Response::new(to_portfolio_response(&summary)))
}
