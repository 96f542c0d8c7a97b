// Engine main entry point
use engine::config::settings::EngineSettings;
use engine::data::property_store::PropertyStore;
use engine::services::projection_service::MyProjectionEngine;
use engine::services::ProjectionEngineServer;
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::transport::Server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting Projection Engine...");

    let settings = EngineSettings::load()?;
    let addr = settings.socket_addr()?;
    info!(
        %addr,
        max_connections = settings.max_connections,
        projection_years = settings.rates.projection_years,
        "Engine will listen on {}", addr
    );

    let store = if settings.seed_demo_data {
        info!("Seeding store with demo property");
        PropertyStore::with_demo_data()
    } else {
        PropertyStore::new()
    };
    let store = Arc::new(RwLock::new(store));

    let projection_service = MyProjectionEngine::new(store.clone(), settings.rates);

    Server::builder()
        .concurrency_limit_per_connection(settings.max_connections)
        .add_service(ProjectionEngineServer::new(projection_service))
        .serve(addr)
        .await?;

    Ok(())
}
