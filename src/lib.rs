// CASE registry client - library root

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod report;

pub use client::CaseClient;
pub use error::{CaseError, Result};
