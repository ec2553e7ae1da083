/// Errors returned by persistence endpoints.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The request could not be delivered or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not a valid record envelope.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The request was refused before reaching the endpoint.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for EndpointError {
    fn from(err: serde_json::Error) -> Self {
        EndpointError::Decode(err.to_string())
    }
}
