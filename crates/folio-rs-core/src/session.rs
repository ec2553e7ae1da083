//! Editing lifecycle for a single content document.
//!
//! A session starts from the definition's default shape, reconciles it once
//! with whatever the endpoint has stored, applies edits one path at a time,
//! and hands the result back to the endpoint on submit.

use crate::attachments::AttachmentRegistry;
use crate::catalog::ContentDefinition;
use crate::document::Document;
use crate::error::CoreError;
use folio_rs_protocol::{BinaryFile, RecordEndpoint, RecordEnvelope, RecordId, SaveRequest};
use log::{debug, info, warn};
use serde_json::Value;

/// In-memory state of one document being edited.
#[derive(Debug, Clone)]
pub struct EditSession {
    definition: ContentDefinition,
    document: Document,
    record_id: Option<RecordId>,
    attachments: AttachmentRegistry,
    revision: u64,
    dirty: bool,
}

impl EditSession {
    /// Start a session at the definition's default shape.
    pub fn new(definition: ContentDefinition) -> Self {
        let document = definition.default_shape.clone();
        Self {
            definition,
            document,
            record_id: None,
            attachments: AttachmentRegistry::new(),
            revision: 0,
            dirty: false,
        }
    }

    /// Definition this session edits.
    pub fn definition(&self) -> &ContentDefinition {
        &self.definition
    }

    /// Current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Id of the stored record, if the document has been saved.
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Attachments staged for the next submit.
    pub fn attachments(&self) -> &AttachmentRegistry {
        &self.attachments
    }

    /// Number of times the document has been replaced or edited.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether there are edits or attachments not yet submitted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the document has a stored record (submit updates instead of creating).
    pub fn is_persisted(&self) -> bool {
        self.record_id.is_some()
    }

    /// Read a field by dot path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.document.get(path)
    }

    /// Write a field by dot path. The document is unchanged on error.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        self.document.set_in_place(path, value)?;
        self.revision += 1;
        self.dirty = true;
        Ok(())
    }

    /// Apply several writes at once; either all land or none do.
    pub fn apply_edits<I, P>(&mut self, edits: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = (P, Value)>,
        P: AsRef<str>,
    {
        let mut edits = edits.into_iter().peekable();
        if edits.peek().is_none() {
            return Ok(());
        }
        let document = self.document.clone().apply_edits(edits)?;
        self.replace_document(document);
        self.dirty = true;
        Ok(())
    }

    /// Stage an attachment for `path`; `None` asks the endpoint to remove it.
    pub fn set_attachment(
        &mut self,
        path: &str,
        file: Option<BinaryFile>,
    ) -> Result<(), CoreError> {
        self.attachments.set(path, file)?;
        self.dirty = true;
        Ok(())
    }

    /// Replace the document with the stored record, merged against the defaults.
    pub async fn load<E>(&mut self, endpoint: &E) -> Result<(), CoreError>
    where
        E: RecordEndpoint + ?Sized,
    {
        let api_path = self.definition.api_path.clone();
        info!(
            "loading document (name={}, api_path={})",
            self.definition.name, api_path
        );
        match endpoint.fetch(&api_path).await? {
            Some(envelope) => {
                debug!(
                    "fetched record (id={:?}, values={})",
                    envelope.id,
                    envelope.values.len()
                );
                self.record_id = envelope.id.clone();
                self.replace_document(self.definition.merge(envelope.first()));
            }
            None => {
                debug!("no stored record; using defaults (name={})", self.definition.name);
                self.record_id = None;
                self.replace_document(self.definition.default_shape.clone());
            }
        }
        self.attachments.clear();
        self.dirty = false;
        Ok(())
    }

    /// Request that `submit` would send.
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest {
            kind: self.definition.kind.clone(),
            id: self.record_id.clone(),
            values: vec![self.document.as_value().clone()],
            parts: self.attachments.to_parts(self.definition.naming),
        }
    }

    /// Create or update the stored record and adopt the endpoint's response.
    pub async fn submit<E>(&mut self, endpoint: &E) -> Result<(), CoreError>
    where
        E: RecordEndpoint + ?Sized,
    {
        let request = self.save_request();
        let api_path = self.definition.api_path.clone();
        let response = if request.id.is_some() {
            info!(
                "updating document (name={}, id={:?}, attachments={})",
                self.definition.name,
                request.id,
                request.parts.len()
            );
            endpoint.update(&api_path, request).await?
        } else {
            info!(
                "creating document (name={}, attachments={})",
                self.definition.name,
                request.parts.len()
            );
            endpoint.create(&api_path, request).await?
        };
        self.adopt_response(response);
        self.attachments.clear();
        self.dirty = false;
        Ok(())
    }

    /// Delete the stored record and return to the default shape.
    pub async fn delete<E>(&mut self, endpoint: &E) -> Result<(), CoreError>
    where
        E: RecordEndpoint + ?Sized,
    {
        let Some(id) = self.record_id.clone() else {
            return Err(CoreError::NotPersisted(self.definition.name.clone()));
        };
        info!("deleting document (name={}, id={})", self.definition.name, id);
        endpoint.delete(&self.definition.api_path, &id).await?;
        self.reset();
        Ok(())
    }

    /// Drop the record id, staged attachments, and edits.
    pub fn reset(&mut self) {
        self.record_id = None;
        self.attachments.clear();
        self.replace_document(self.definition.default_shape.clone());
        self.dirty = false;
    }

    fn adopt_response(&mut self, response: RecordEnvelope) {
        if let Some(id) = response.id.clone() {
            self.record_id = Some(id);
        } else if self.record_id.is_none() {
            warn!(
                "endpoint response carried no id (name={}); next submit creates again",
                self.definition.name
            );
        }
        let merged = match response.first() {
            Some(stored) => self.definition.merge(Some(stored)),
            None => {
                debug!("endpoint response carried no values; keeping submitted document");
                self.definition.merge(Some(self.document.as_value()))
            }
        };
        self.replace_document(merged);
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.revision += 1;
    }
}
