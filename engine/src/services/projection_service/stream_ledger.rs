// Handler for the StreamLedger RPC
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Response, Status};

use super::helpers::to_ledger_message;
use crate::data::property_store::PropertyStore;
use crate::services::{LedgerEntryMessage, PropertyRequest};

pub async fn handle_stream_ledger(
    req_payload: PropertyRequest,
    store: Arc<RwLock<PropertyStore>>,
) -> Result<Response<ReceiverStream<Result<LedgerEntryMessage, Status>>>, Status> {
    let store = store.read().await;
    let entries = store.get_property(&req_payload.property_id)?.monthly_ledger_data.clone();
    drop(store);

    let (tx, rx) = mpsc::channel(4);
    let property_id = req_payload.property_id;

    tokio::spawn(async move {
        tracing::debug!(property_id = %property_id, count = entries.len(), "Streaming ledger entries (handler).");
        for entry in &entries {
            if let Err(e) = tx.send(Ok(to_ledger_message(entry))).await {
                tracing::warn!(error = ?e, property_id = %property_id, "Ledger stream closed by client");
                return;
            }
        }
    });

    Ok(Response::new(ReceiverStream::new(rx)))
}
