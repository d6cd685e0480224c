// Grouping of fetched documents by creator

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CaseError, Result};
use crate::models::Document;

/// Documents published by one creator, ordered by title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorGroup {
    pub creator: String,
    pub documents: Vec<Document>,
}

/// Decode raw CFDocument records
pub fn decode_documents(records: &[Value]) -> Result<Vec<Document>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Document::deserialize(record)
                .map_err(|e| CaseError::serialization(format!("CFDocument #{}", i), e))
        })
        .collect()
}

/// Sort by (creator, title) and group consecutive documents by creator
pub fn group_by_creator(records: &[Value]) -> Result<Vec<CreatorGroup>> {
    let mut documents = decode_documents(records)?;
    documents.sort_by(|a, b| (&a.creator, &a.title).cmp(&(&b.creator, &b.title)));

    let mut groups: Vec<CreatorGroup> = Vec::new();
    for document in documents {
        match groups.last_mut() {
            Some(group) if group.creator == document.creator => group.documents.push(document),
            _ => groups.push(CreatorGroup {
                creator: document.creator.clone(),
                documents: vec![document],
            }),
        }
    }

    Ok(groups)
}
