// Engine library root: projection maths, ledger reporting, storage and the gRPC service.
pub mod config;
pub mod data;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod services;
