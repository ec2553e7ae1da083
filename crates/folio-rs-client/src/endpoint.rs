use async_trait::async_trait;
use folio_rs_config::EndpointConfig;
use folio_rs_protocol::{EndpointError, RecordEndpoint, RecordEnvelope, SaveRequest};
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Record endpoint backed by a content API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    http: Client,
    base_url: String,
    token: Option<String>,
}

/// JSON body used for saves without attachments.
#[derive(Serialize)]
struct JsonSave<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    subtype: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    /// `[document]` encoded as a JSON string, matching the multipart field.
    values: String,
}

#[derive(Serialize)]
struct JsonDelete<'a> {
    id: &'a str,
}

impl HttpEndpoint {
    /// Endpoint with default client settings and no credentials.
    pub fn new(base_url: impl Into<String>) -> Result<Self, EndpointError> {
        let http = Client::builder().build().map_err(transport)?;
        Ok(Self::with_client(http, base_url, None))
    }

    /// Endpoint using the configured base URL, timeout, and bearer token.
    pub fn from_config(config: &EndpointConfig) -> Result<Self, EndpointError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(transport)?;
        Ok(Self::with_client(
            http,
            config.base_url.clone(),
            config.token.clone(),
        ))
    }

    /// Endpoint reusing an existing reqwest client.
    pub fn with_client(http: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, api_path: &str) -> String {
        if api_path.starts_with("http://") || api_path.starts_with("https://") {
            api_path.to_string()
        } else if api_path.starts_with('/') {
            format!("{}{}", self.base_url, api_path)
        } else {
            format!("{}/{}", self.base_url, api_path)
        }
    }

    fn request(&self, method: Method, api_path: &str) -> RequestBuilder {
        let url = self.url(api_path);
        debug!("endpoint request (method={}, url={})", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_save(
        &self,
        method: Method,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        let builder = self.request(method, api_path);
        let builder = if request.has_parts() {
            builder.multipart(multipart_form(&request)?)
        } else {
            builder.json(&JsonSave {
                record_type: &request.kind.record_type,
                subtype: &request.kind.subtype,
                id: request.id.as_deref(),
                values: request.values_json()?,
            })
        };
        let response = builder.send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        Ok(read_envelope(response).await?.unwrap_or_default())
    }
}

#[async_trait]
impl RecordEndpoint for HttpEndpoint {
    async fn fetch(&self, api_path: &str) -> Result<Option<RecordEnvelope>, EndpointError> {
        let response = self
            .request(Method::GET, api_path)
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("no stored record (api_path={})", api_path);
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        read_envelope(response).await
    }

    async fn create(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        self.send_save(Method::POST, api_path, request).await
    }

    async fn update(
        &self,
        api_path: &str,
        request: SaveRequest,
    ) -> Result<RecordEnvelope, EndpointError> {
        self.send_save(Method::PUT, api_path, request).await
    }

    async fn delete(&self, api_path: &str, id: &str) -> Result<(), EndpointError> {
        let response = self
            .request(Method::DELETE, api_path)
            .json(&JsonDelete { id })
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Text fields first, then one part per staged attachment. A removal is an
/// empty text field under the attachment's part name.
fn multipart_form(request: &SaveRequest) -> Result<Form, EndpointError> {
    let mut form = Form::new();
    for (name, value) in request.text_fields()? {
        form = form.text(name, value);
    }
    for part in &request.parts {
        form = match &part.file {
            Some(file) => {
                let body = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(|err| {
                        EndpointError::Rejected(format!(
                            "invalid content type for {}: {err}",
                            part.path
                        ))
                    })?;
                form.part(part.name.clone(), body)
            }
            None => form.text(part.name.clone(), String::new()),
        };
    }
    Ok(form)
}

async fn ensure_success(response: Response) -> Result<Response, EndpointError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("endpoint returned error status (status={}, body_len={})", status, body.len());
    Err(EndpointError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Empty bodies read as "no record".
async fn read_envelope(response: Response) -> Result<Option<RecordEnvelope>, EndpointError> {
    let text = response.text().await.map_err(transport)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    let envelope: RecordEnvelope = serde_json::from_str(&text)?;
    Ok(Some(envelope))
}

fn transport(err: reqwest::Error) -> EndpointError {
    EndpointError::Transport(err.to_string())
}
