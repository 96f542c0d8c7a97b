// engine/src/services/projection_service/mod.rs
// MyProjectionEngine implements the generated ProjectionEngine trait and hands
// each RPC to its handler module.
use super::{
    InvestorReportRequest, InvestorReportResponse, InvestorRequest, LedgerEntryMessage, LoadLedgerCsvRequest,
    LoadLedgerCsvResponse, MetricsRequest, MetricsResponse, PortfolioSummaryResponse, ProjectionEngine,
    PropertyRequest, PropertyResponse, RecordInvestmentRequest, RegisterPropertyRequest, SetPropertyStatusRequest,
};
use crate::data::property_store::PropertyStore;
use shared::models::PolicyRates;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

pub mod compute_metrics;
pub mod get_property_metrics;
pub mod helpers;
pub mod investor_report;
pub mod load_ledger_csv;
pub mod portfolio;
pub mod register_property;
pub mod set_property_status;
pub mod stream_ledger;

pub struct MyProjectionEngine {
    store: Arc<RwLock<PropertyStore>>,
    default_rates: PolicyRates,
}

impl MyProjectionEngine {
    pub fn new(store: Arc<RwLock<PropertyStore>>, default_rates: PolicyRates) -> Self {
        MyProjectionEngine { store, default_rates }
    }
}

#[tonic::async_trait]
impl ProjectionEngine for MyProjectionEngine {
    async fn compute_metrics(&self, request: Request<MetricsRequest>) -> Result<Response<MetricsResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(custom_rates = req_payload.rates.is_some(), "Received ComputeMetrics request");
        compute_metrics::handle_compute_metrics(req_payload, self.default_rates).await
    }

    async fn register_property(
        &self,
        request: Request<RegisterPropertyRequest>,
    ) -> Result<Response<PropertyResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(property_id = %req_payload.id, name = %req_payload.name, "Received RegisterProperty request");
        register_property::handle_register_property(req_payload, self.store.clone(), self.default_rates).await
    }

    async fn set_property_status(
        &self,
        request: Request<SetPropertyStatusRequest>,
    ) -> Result<Response<PropertyResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(property_id = %req_payload.property_id, status = %req_payload.status, "Received SetPropertyStatus request");
        set_property_status::handle_set_property_status(req_payload, self.store.clone(), self.default_rates).await
    }

    async fn get_property_metrics(&self, request: Request<PropertyRequest>) -> Result<Response<MetricsResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(property_id = %req_payload.property_id, "Received GetPropertyMetrics request");
        get_property_metrics::handle_get_property_metrics(req_payload, self.store.clone(), self.default_rates).await
    }

    async fn load_ledger_csv(
        &self,
        request: Request<LoadLedgerCsvRequest>,
    ) -> Result<Response<LoadLedgerCsvResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            property_id = %req_payload.property_id,
            path = %req_payload.file_path,
            updated_by = %req_payload.updated_by,
            "Received LoadLedgerCsv request"
        );
        load_ledger_csv::handle_load_ledger_csv(req_payload, self.store.clone()).await
    }

    type StreamLedgerStream = ReceiverStream<Result<LedgerEntryMessage, Status>>;
    async fn stream_ledger(&self, request: Request<PropertyRequest>) -> Result<Response<Self::StreamLedgerStream>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(property_id = %req_payload.property_id, "Received StreamLedger request");
        stream_ledger::handle_stream_ledger(req_payload, self.store.clone()).await
    }

    async fn get_investor_report(
        &self,
        request: Request<InvestorReportRequest>,
    ) -> Result<Response<InvestorReportResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            property_id = %req_payload.property_id,
            investment_amount = req_payload.investment_amount,
            months = req_payload.months.len(),
            "Received GetInvestorReport request"
        );
        investor_report::handle_investor_report(req_payload, self.store.clone()).await
    }

    async fn record_investment(
        &self,
        request: Request<RecordInvestmentRequest>,
    ) -> Result<Response<PortfolioSummaryResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            investor_id = %req_payload.investor_id,
            property_id = %req_payload.property_id,
            slots = req_payload.slots,
            "Received RecordInvestment request"
        );
        portfolio::handle_record_investment(req_payload, self.store.clone()).await
    }

    async fn get_portfolio_summary(
        &self,
        request: Request<InvestorRequest>,
    ) -> Result<Response<PortfolioSummaryResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(investor_id = %req_payload.investor_id, "Received GetPortfolioSummary request");
        portfolio::handle_portfolio_summary(req_payload, self.store.clone()).await
    }
}
