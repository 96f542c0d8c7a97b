// Handler for the GetPropertyMetrics RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use shared::models::PolicyRates;

use super::helpers::to_metrics_response;
use crate::data::property_store::PropertyStore;
use crate::services::{MetricsResponse, PropertyRequest};

pub async fn handle_get_property_metrics(
    req_payload: PropertyRequest,
    store: Arc<RwLock<PropertyStore>>,
    rates: PolicyRates,
) -> Result<Response<MetricsResponse>, Status> {
    let store = store.read().await;
    let metrics = store.metrics_for(&req_payload.property_id, &rates)?;
    Ok(Response::new(to_metrics_response(&metrics)))
}
