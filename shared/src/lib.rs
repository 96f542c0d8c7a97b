// Domain records shared by the projection engine and any client of it.
pub mod defaults;
pub mod models;
pub mod utils;
