// gRPC surface of the engine. Generated types are re-exported here so handlers
// import them from one place.
pub mod projection_service;

pub mod generated {
    tonic::include_proto!("projection");
}

pub use generated::projection_engine_server::{ProjectionEngine, ProjectionEngineServer};
pub use generated::{
    Capex as ProtoCapex, InvestorReportRequest, InvestorReportResponse, InvestorRequest, LedgerEntryMessage,
    LoadLedgerCsvRequest, LoadLedgerCsvResponse, MetricsRequest, MetricsResponse, Opex as ProtoOpex,
    PortfolioSummaryResponse, PropertyRequest, PropertyResponse, Rates as ProtoRates, RecordInvestmentRequest,
    RegisterPropertyRequest, Revenue as ProtoRevenue, RoiProjection as ProtoRoiProjection, SetPropertyStatusRequest,
};
