//! dynorm - active-record data-mapper over DynamoDB-compatible stores.
//!
//! Models declare their schema through [`dynorm_core::model::Model`]; this crate
//! supplies the storage backends, the demo models and the command-line front end.

pub mod cli;
pub mod commands;
pub mod config;
pub mod mock_data;
pub mod models;
pub mod output;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;
