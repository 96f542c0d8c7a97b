// Handler for the SetPropertyStatus RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use shared::models::{PolicyRates, PropertyStatus};

use super::helpers::to_property_response;
use crate::data::property_store::PropertyStore;
use crate::error::EngineError;
use crate::services::{PropertyResponse, SetPropertyStatusRequest};

pub async fn handle_set_property_status(
    req_payload: SetPropertyStatusRequest,
    store: Arc<RwLock<PropertyStore>>,
    rates: PolicyRates,
) -> Result<Response<PropertyResponse>, Status> {
    let status: PropertyStatus = req_payload
        .status
        .parse()
        .map_err(|e| EngineError::invalid_input("status", format!("{}", e)))?;

    let mut store = store.write().await;
    let property = store.set_status(&req_payload.property_id, status)?;
    Ok(Response::new(to_property_response(property, &rates)?))
}
