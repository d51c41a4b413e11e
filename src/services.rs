//! Adapters for the chunk store, vision and audio services.

use crate::client::OutboundClient;
use crate::config::ServiceUrls;
use crate::error::{GatewayError, GatewayResult};
use crate::io_struct::null_as_default;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChunkRecord<'a> {
    text: &'a str,
    origin: &'a str,
    collection: &'a str,
}

#[derive(Debug, Serialize)]
struct TaggedChunkRecord<'a> {
    text: &'a str,
    origin: &'a str,
    collection: &'a str,
    metadata: ChunkMetadata<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChunkMetadata<'a> {
    subject: &'a str,
    tags: Option<&'a [String]>,
    manually_stored: bool,
}

#[derive(Debug, Serialize)]
struct LookupQuery<'a> {
    query: &'a str,
    collection: &'a str,
}

#[derive(Debug, Serialize)]
struct MediaPayload<'a> {
    data: &'a str,
    origin: &'a str,
    name: &'a str,
}

/// A chunk returned by the lookup endpoint. Fields other than `text` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Chunk {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default, deserialize_with = "null_as_default")]
    chunks: Vec<Chunk>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResult {
    transcription: String,
}

/// A manually tagged memory, stored through `/remember`.
#[derive(Debug, Clone, Copy)]
pub struct Memory<'a> {
    pub text: &'a str,
    pub subject: &'a str,
    pub origin: &'a str,
    pub collection: &'a str,
    pub tags: Option<&'a [String]>,
    pub timestamp: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ExternalServices {
    client: OutboundClient,
    urls: ServiceUrls,
}

impl ExternalServices {
    pub fn new(client: OutboundClient, urls: ServiceUrls) -> Self {
        Self { client, urls }
    }

    /// Stores a text chunk and returns the chunk store's response body.
    pub async fn submit_chunk(
        &self,
        text: &str,
        origin: &str,
        collection: &str,
    ) -> GatewayResult<Bytes> {
        let record = ChunkRecord {
            text,
            origin,
            collection,
        };
        self.client.post_json(&self.urls.chunk(), &record).await
    }

    /// Stores a chunk carrying subject/tags metadata, flagged `manually_stored`.
    pub async fn remember_chunk(&self, memory: Memory<'_>) -> GatewayResult<Bytes> {
        let record = TaggedChunkRecord {
            text: memory.text,
            origin: memory.origin,
            collection: memory.collection,
            metadata: ChunkMetadata {
                subject: memory.subject,
                tags: memory.tags,
                manually_stored: true,
            },
            timestamp: memory.timestamp.filter(|t| !t.is_empty()),
        };
        self.client.post_json(&self.urls.chunk(), &record).await
    }

    /// Returns the chunks the store ranks as relevant to `query`, in its order.
    pub async fn lookup_chunks(&self, query: &str, collection: &str) -> GatewayResult<Vec<Chunk>> {
        let body = self
            .client
            .post_json(&self.urls.lookup(), &LookupQuery { query, collection })
            .await?;
        let parsed: LookupResult =
            serde_json::from_slice(&body).map_err(|source| GatewayError::Decode {
                context: "invalid lookup result",
                source,
            })?;
        Ok(parsed.chunks)
    }

    /// Sends base64 image data to the vision service and returns the extracted text.
    pub async fn describe_image(&self, image: &str, origin: &str, name: &str) -> GatewayResult<String> {
        let payload = MediaPayload {
            data: image,
            origin,
            name,
        };
        let body = self.client.post_json(&self.urls.view(), &payload).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Sends base64 audio data to the audio service and returns the transcription.
    pub async fn transcribe_audio(&self, audio: &str, origin: &str, name: &str) -> GatewayResult<String> {
        let payload = MediaPayload {
            data: audio,
            origin,
            name,
        };
        let body = self.client.post_json(&self.urls.transcribe(), &payload).await?;
        let parsed: TranscriptionResult =
            serde_json::from_slice(&body).map_err(|source| GatewayError::Decode {
                context: "failed to parse transcription response",
                source,
            })?;
        Ok(parsed.transcription)
    }
}
