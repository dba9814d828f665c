//! AI-assisted diagram generation.
//!
//! One request/response exchange: the prompt and the preferred direction
//! go out as JSON, and a `200` response body is taken verbatim as the new
//! diagram source. Anything else is a failure.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use mmd_core::Direction;
use reqwest::{StatusCode, Url};
use serde::Serialize;

/// JSON body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub direction: Direction,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("a generation request is already in flight")]
    Busy,
    #[error("generation endpoint returned HTTP {0}")]
    Status(u16),
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid generation endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Produces diagram source from a prompt.
pub trait DiagramGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> LocalBoxFuture<'a, Result<String, GenerateError>>;
}

/// Generator backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpGenerator {
    /// `endpoint` may be absolute, or a path resolved against `base`
    /// (the page origin in the browser).
    pub fn new(endpoint: &str, base: Option<&str>) -> Result<Self, GenerateError> {
        let invalid = |reason: String| GenerateError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let url = match (Url::parse(endpoint), base) {
            (Ok(url), _) => url,
            (Err(_), Some(base)) => Url::parse(base)
                .and_then(|b| b.join(endpoint))
                .map_err(|e| invalid(e.to_string()))?,
            (Err(e), None) => return Err(invalid(e.to_string())),
        };
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: url,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl DiagramGenerator for HttpGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> LocalBoxFuture<'a, Result<String, GenerateError>> {
        async move {
            log::info!("generate: POST {} ({})", self.endpoint, request.direction);
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await?;
            let status = response.status();
            if status != StatusCode::OK {
                return Err(GenerateError::Status(status.as_u16()));
            }
            Ok(response.text().await?)
        }
        .boxed_local()
    }
}
