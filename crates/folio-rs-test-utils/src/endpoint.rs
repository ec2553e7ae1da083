use async_trait::async_trait;
use folio_rs_protocol::{EndpointError, RecordEndpoint, RecordEnvelope, SaveRequest};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Call observed by a test endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointCall {
    Fetch { api_path: String },
    Create { api_path: String, request: SaveRequest },
    Update { api_path: String, request: SaveRequest },
    Delete { api_path: String, id: String },
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, RecordEnvelope>,
    calls: Vec<EndpointCall>,
}

/// In-memory endpoint keyed by api path, recording every call.
#[derive(Clone, Default)]
pub struct MemoryEndpoint {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored record.
    pub fn with_record(
        self,
        api_path: impl Into<String>,
        id: impl Into<String>,
        value: Value,
    ) -> Self {
        self.state.lock().records.insert(
            api_path.into(),
            RecordEnvelope::single(Some(id.into()), value),
        );
        self
    }

    /// Seed a raw envelope, e.g. one without values.
    pub fn with_envelope(self, api_path: impl Into<String>, envelope: RecordEnvelope) -> Self {
        self.state.lock().records.insert(api_path.into(), envelope);
        self
    }

    /// Stored record for an api path.
    pub fn record(&self, api_path: &str) -> Option<RecordEnvelope> {
        self.state.lock().records.get(api_path).cloned()
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<EndpointCall> {
        self.state.lock().calls.clone()
    }

    /// Most recent call.
    pub fn last_call(&self) -> Option<EndpointCall> {
        self.state.lock().calls.last().cloned()
    }
}

#[async_trait]
impl RecordEndpoint for MemoryEndpoint {
    async fn fetch(&self, api_path: &str) -> Result<Option<RecordEnvelope>, EndpointError> {
        let mut state = self.state.lock();
        state.calls.push(EndpointCall::Fetch {
            api_path: api_path.to_string(),
        });
        Ok(state.records.get(api_path).cloned())
    }

    async fn create(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        let mut state = self.state.lock();
        let stored = RecordEnvelope {
            id: Some(Uuid::new_v4().to_string()),
            values: request.values.clone(),
        };
        state.calls.push(EndpointCall::Create {
            api_path: api_path.to_string(),
            request,
        });
        state.records.insert(api_path.to_string(), stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        let mut state = self.state.lock();
        let stored_id = state
            .records
            .get(api_path)
            .and_then(|record| record.id.clone());
        let matches = stored_id.is_some() && stored_id == request.id;
        let stored = RecordEnvelope {
            id: stored_id,
            values: request.values.clone(),
        };
        state.calls.push(EndpointCall::Update {
            api_path: api_path.to_string(),
            request,
        });
        if !matches {
            return Err(EndpointError::Status {
                status: 404,
                body: "record not found".to_string(),
            });
        }
        state.records.insert(api_path.to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, api_path: &str, id: &str) -> Result<(), EndpointError> {
        let mut state = self.state.lock();
        state.calls.push(EndpointCall::Delete {
            api_path: api_path.to_string(),
            id: id.to_string(),
        });
        let matches = state
            .records
            .get(api_path)
            .is_some_and(|record| record.id.as_deref() == Some(id));
        if !matches {
            return Err(EndpointError::Status {
                status: 404,
                body: "record not found".to_string(),
            });
        }
        state.records.remove(api_path);
        Ok(())
    }
}

/// Endpoint whose every call fails with a transport error.
#[derive(Debug, Clone)]
pub struct FailingEndpoint {
    message: String,
}

impl FailingEndpoint {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn error(&self) -> EndpointError {
        EndpointError::Transport(self.message.clone())
    }
}

#[async_trait]
impl RecordEndpoint for FailingEndpoint {
    async fn fetch(&self, _api_path: &str) -> Result<Option<RecordEnvelope>, EndpointError> {
        Err(self.error())
    }

    async fn create(
        &self,
        _api_path: &str,
        _request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        Err(self.error())
    }

    async fn update(
        &self,
        _api_path: &str,
        _request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        Err(self.error())
    }

    async fn delete(&self, _api_path: &str, _id: &str) -> Result<(), EndpointError> {
        Err(self.error())
    }
}
