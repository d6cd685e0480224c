use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::PageEnvelope;

// ==================================================================================================
// Response Envelopes
// ==================================================================================================

/// One page of `GET /CFDocuments`
/// Records stay opaque JSON; only reporting decodes them
#[derive(Debug, Clone, Deserialize)]
pub struct CfDocumentsPage {
    #[serde(rename = "CFDocuments")]
    pub documents: Vec<Value>,
}

impl PageEnvelope for CfDocumentsPage {
    type Item = Value;

    fn into_items(self) -> Vec<Value> {
        self.documents
    }
}

// ==================================================================================================
// Domain Records
// ==================================================================================================

/// Fields of a CFDocument used for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub identifier: String,
    pub title: String,
    pub creator: String,
    pub adoption_status: String,
}
