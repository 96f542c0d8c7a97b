// Handler for the LoadLedgerCsv RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use crate::data::ledger_csv::LedgerCsvParser;
use crate::data::property_store::PropertyStore;
use crate::error::EngineError;
use crate::services::{LoadLedgerCsvRequest, LoadLedgerCsvResponse};

pub async fn handle_load_ledger_csv(
    req_payload: LoadLedgerCsvRequest,
    store: Arc<RwLock<PropertyStore>>,
) -> Result<Response<LoadLedgerCsvResponse>, Status> {
    if req_payload.notes.trim().is_empty() {
        return Err(EngineError::invalid_input("notes", "describe the update (e.g. 'Monthly data entry')").into());
    }
    // Fail before touching the file when the property does not exist.
    store.read().await.get_property(&req_payload.property_id)?;

    let entries = LedgerCsvParser::load_entries_from_csv(&req_payload.file_path)?;
    let entries_loaded = loaded_count(entries.len())?;
    let updated_by = if req_payload.updated_by.trim().is_empty() {
        "unknown"
    } else {
        req_payload.updated_by.trim()
    };

    // Every row is validated by the parser, so the whole file is applied under one lock.
    let mut store = store.write().await;
    for entry in entries {
        store.upsert_ledger_entry(&req_payload.property_id, entry, updated_by, &req_payload.notes)?;
    }
    tracing::info!(
        property_id = %req_payload.property_id,
        count = entries_loaded,
        updated_by = %updated_by,
        "Ledger entries loaded from CSV"
    );

    Ok(Response::new(LoadLedgerCsvResponse {
        success: true,
        message: format!("Loaded {} ledger entries for property {}", entries_loaded, req_payload.property_id),
        entries_loaded,
    }))
}

fn loaded_count(rows: usize) -> Result<i32, EngineError> {
    i32::try_from(rows)
        .map_err(|_| EngineError::CsvDataFormatError(format!("{} rows exceed the per-file limit of {}", rows, i32::MAX)))
}
