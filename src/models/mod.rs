// Data models for CASE API responses

pub mod case;

pub use case::{CfDocumentsPage, Document};
