use crate::error::EndpointError;
use crate::{RecordEnvelope, SaveRequest};
use async_trait::async_trait;

/// Persistence endpoint interface consumed by edit sessions.
///
/// Every operation addresses a record by its `api_path`, the HTTP resource
/// path that owns one content document (for example `/api/content/header`).
#[async_trait]
pub trait RecordEndpoint: Send + Sync {
    /// Fetch the stored record, or `None` when nothing has been saved yet.
    async fn fetch(&self, api_path: &str) -> Result<Option<RecordEnvelope>, EndpointError>;

    /// Create a new record and return what the endpoint stored.
    async fn create(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError>;

    /// Update an existing record and return what the endpoint stored.
    async fn update(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError>;

    /// Delete the record with the given id.
    async fn delete(&self, api_path: &str, id: &str) -> Result<(), EndpointError>;

    /// Create or update depending on whether the request carries an id.
    async fn save(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        if request.id.is_some() {
            self.update(api_path, request).await
        } else {
            self.create(api_path, request).await
        }
    }
}
