use std::sync::Arc;

use anyhow::Context;
use reqwest::{header, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::{ErrorBody, RecomputeAck, StatusSnapshot};

pub type ClientResult<T> = Result<T, ClientError>;

/// Text shown to the user for every failed refresh, whatever went wrong underneath.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch data";

/// Anything that can hand out status snapshots and trigger a server-side recompute.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&self) -> ClientResult<StatusSnapshot>;
    async fn trigger_recompute(&self) -> ClientResult<RecomputeAck>;
}

#[derive(Clone)]
pub struct StatusClient {
    inner: reqwest::Client,
    config: Arc<AppConfig>,
    status_url: String,
    recompute_url: String,
}

impl StatusClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            inner: client,
            status_url: config.status_url(),
            recompute_url: config.recompute_url(),
            config: Arc::new(config),
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    async fn get(&self, url: &str) -> ClientResult<(StatusCode, Vec<u8>)> {
        let response = self
            .inner
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%url, %status, len = bytes.len(), "response received");
        Ok((status, bytes.to_vec()))
    }
}

impl StatusSource for StatusClient {
    async fn fetch_status(&self) -> ClientResult<StatusSnapshot> {
        let (status, body) = self.get(&self.status_url).await?;
        decode_snapshot(status, &body)
    }

    async fn trigger_recompute(&self) -> ClientResult<RecomputeAck> {
        let (status, body) = self.get(&self.recompute_url).await?;
        decode_recompute_ack(status, &body)
    }
}

/// Interprets a status-endpoint response. Only a 2xx carrying every required counter counts.
pub fn decode_snapshot(status: StatusCode, body: &[u8]) -> ClientResult<StatusSnapshot> {
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status,
            body: body.to_vec(),
        });
    }

    if body.is_empty() {
        return Err(ClientError::EmptyResponse(status));
    }

    match serde_json::from_slice::<StatusSnapshot>(body) {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => match serde_json::from_slice::<ErrorBody>(body) {
            Ok(api_err) => Err(ClientError::Api(api_err.error)),
            Err(_) => Err(ClientError::Decode(err)),
        },
    }
}

/// Interprets a recompute-endpoint response.
///
/// A 2xx is an acknowledgement unless the body explicitly says `"status": "error"`;
/// an empty or non-JSON 2xx body is still accepted.
pub fn decode_recompute_ack(status: StatusCode, body: &[u8]) -> ClientResult<RecomputeAck> {
    let ack = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RecomputeAck>(body).ok()
    };

    if !status.is_success() {
        return match ack {
            Some(ack) if ack.message.is_some() => Err(ClientError::RecomputeRejected {
                status,
                message: ack.message,
            }),
            _ => Err(ClientError::UnexpectedStatus {
                status,
                body: body.to_vec(),
            }),
        };
    }

    match ack {
        Some(ack) if !ack.is_success() => Err(ClientError::RecomputeRejected {
            status,
            message: ack.message,
        }),
        Some(ack) => Ok(ack),
        None => {
            debug!(%status, "recompute answered without a readable body");
            Ok(RecomputeAck::accepted())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("client setup failed: {0:#}")]
    Setup(#[from] anyhow::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("empty response body: {0}")]
    EmptyResponse(StatusCode),
    #[error("unexpected status {status}: {body:?}")]
    UnexpectedStatus { status: StatusCode, body: Vec<u8> },
    #[error("recompute rejected ({status}): {message:?}")]
    RecomputeRejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("status client is not initialised")]
    Unavailable,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            Self::EmptyResponse(status) => Some(*status),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RecomputeRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}
