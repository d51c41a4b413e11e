use crate::error::{GatewayError, GatewayResult};
use bytes::Bytes;
use serde::Serialize;

/// JSON-over-HTTP POST helper shared by every outbound call.
///
/// One attempt per call: no retry and no timeout.
#[derive(Debug, Clone)]
pub struct OutboundClient {
    client: reqwest::Client,
}

impl OutboundClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// POSTs `payload` as JSON and returns the raw response body.
    ///
    /// Fails with [`GatewayError::Transport`] when the request cannot be sent and
    /// with [`GatewayError::Upstream`] when the status code is 300 or above.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> GatewayResult<Bytes> {
        self.send(url, payload, None).await
    }

    /// Same as [`post_json`](Self::post_json) with an `Authorization: Bearer` header.
    pub async fn post_json_bearer<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        token: &str,
    ) -> GatewayResult<Bytes> {
        self.send(url, payload, Some(token)).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        token: Option<&str>,
    ) -> GatewayResult<Bytes> {
        log::debug!("POST {}", url);
        let mut request = self.client.post(url).json(payload);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;
        if status.as_u16() >= 300 {
            log::warn!("POST {} returned {}", url, status);
            return Err(GatewayError::upstream(
                url,
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        Ok(body)
    }
}
