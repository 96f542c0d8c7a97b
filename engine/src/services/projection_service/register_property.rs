// Handler for the RegisterProperty RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use shared::models::{PolicyRates, Property};

use super::helpers::{capex_from_proto, opex_from_proto, revenue_from_proto, to_property_response};
use crate::data::property_store::PropertyStore;
use crate::services::{PropertyResponse, RegisterPropertyRequest};

pub async fn handle_register_property(
    req_payload: RegisterPropertyRequest,
    store: Arc<RwLock<PropertyStore>>,
    rates: PolicyRates,
) -> Result<Response<PropertyResponse>, Status> {
    let property = Property::new(
        req_payload.id,
        req_payload.name,
        req_payload.city,
        capex_from_proto(req_payload.capex)?,
        opex_from_proto(req_payload.opex)?,
        revenue_from_proto(req_payload.revenue)?,
        req_payload.number_of_investment_slots,
    );

    let mut store = store.write().await;
    let stored = store.add_property(property)?;
    Ok(Response::new(to_property_response(stored, &rates)?))
}
