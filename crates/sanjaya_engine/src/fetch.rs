use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use sanjaya_logging::sanjaya_info;

use crate::frame::DEFAULT_MAX_LINE_BYTES;
use crate::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between two chunks.
    pub read_timeout: Duration,
    pub max_line_bytes: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/chat".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(180),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Pull-style source of raw chunks. `Ok(None)` marks the end of the stream.
#[async_trait::async_trait]
pub trait ByteSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// Opens the event stream for one query.
#[async_trait::async_trait]
pub trait StreamOpener: Send + Sync {
    async fn open(&self, query: &str) -> Result<Box<dyn ByteSource>, TransportError>;
}

/// Chunks of a streaming reqwest response body.
pub struct ReqwestSource {
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
}

impl ReqwestSource {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            stream: response.bytes_stream().boxed(),
        }
    }
}

#[async_trait::async_trait]
impl ByteSource for ReqwestSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        match self.stream.next().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(err)) => Err(map_reqwest_error(err)),
            None => Ok(None),
        }
    }
}

/// POSTs the query as JSON and streams back the `text/event-stream` body.
#[derive(Debug, Clone)]
pub struct ReqwestStreamClient {
    settings: StreamSettings,
}

impl ReqwestStreamClient {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl StreamOpener for ReqwestStreamClient {
    async fn open(&self, query: &str) -> Result<Box<dyn ByteSource>, TransportError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint).map_err(|err| {
            TransportError::InvalidEndpoint {
                endpoint: self.settings.endpoint.clone(),
                message: err.to_string(),
            }
        })?;
        let client = self.build_client()?;
        let body = serde_json::json!({ "query": query }).to_string();

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        sanjaya_info!(
            "Stream opened status={} content_type={:?}",
            status.as_u16(),
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
        );

        Ok(Box::new(ReqwestSource::new(response)))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    TransportError::Network(err.to_string())
}
