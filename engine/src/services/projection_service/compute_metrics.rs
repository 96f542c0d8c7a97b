// Handler for the ComputeMetrics RPC
use tonic::{Response, Status};

use shared::models::PolicyRates;

use super::helpers::{capex_from_proto, opex_from_proto, rates_from_proto, revenue_from_proto, to_metrics_response};
use crate::projection::compute_metrics;
use crate::services::{MetricsRequest, MetricsResponse};

pub async fn handle_compute_metrics(
    req_payload: MetricsRequest,
    default_rates: PolicyRates,
) -> Result<Response<MetricsResponse>, Status> {
    let capex = capex_from_proto(req_payload.capex)?;
    let opex = opex_from_proto(req_payload.opex)?;
    let revenue = revenue_from_proto(req_payload.revenue)?;
    let rates = rates_from_proto(req_payload.rates, &default_rates)?;

    let metrics = compute_metrics(&capex, &opex, &revenue, &rates)?;
    tracing::debug!(
        total_capex = metrics.total_capex,
        annual_investor_share = metrics.annual_investor_share,
        "Computed metrics (handler)"
    );
    Ok(Response::new(to_metrics_response(&metrics)))
}
