//! Registry of documents attached to the token (prospectus, terms,
//! disclosures), keyed by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tranche_core::{Timestamp, TokenError};

/// One registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub uri: String,
    /// Content hash of the referenced document.
    pub hash: Vec<u8>,
    /// When the document was last set or replaced.
    pub updated_at: Timestamp,
}

/// Name-keyed document store with insertion-ordered name enumeration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRegistry {
    documents: HashMap<String, Document>,
    names: Vec<String>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a document. Empty name, URI or hash fail.
    pub fn set_document(
        &mut self,
        name: &str,
        uri: &str,
        hash: Vec<u8>,
        now: Timestamp,
    ) -> Result<(), TokenError> {
        if name.is_empty() {
            return Err(TokenError::EmptyName);
        }
        if uri.is_empty() {
            return Err(TokenError::EmptyUri);
        }
        if hash.is_empty() {
            return Err(TokenError::EmptyHash);
        }
        if !self.documents.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.documents.insert(
            name.to_string(),
            Document {
                uri: uri.to_string(),
                hash,
                updated_at: now,
            },
        );
        Ok(())
    }

    /// Remove a document, returning it.
    pub fn remove_document(&mut self, name: &str) -> Result<Document, TokenError> {
        let document = self
            .documents
            .remove(name)
            .ok_or_else(|| TokenError::DocumentDoesNotExist {
                name: name.to_string(),
            })?;
        self.names.retain(|n| n != name);
        Ok(document)
    }

    pub fn get_document(&self, name: &str) -> Result<&Document, TokenError> {
        self.documents
            .get(name)
            .ok_or_else(|| TokenError::DocumentDoesNotExist {
                name: name.to_string(),
            })
    }

    pub fn document_count(&self) -> usize {
        self.names.len()
    }

    /// Document names in insertion order.
    pub fn document_names(&self) -> &[String] {
        &self.names
    }
}
