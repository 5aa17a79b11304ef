//! The wiki RPC client: request building and the two call modes.

use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tracing::debug;
use wiki_proto::{Metadata, ModelType, Request, RequestType, SymbolType};
use wiki_wire::Frame;

use crate::article::Article;
use crate::context::{mint_session_id, Credentials, SymbolContext, WorkspaceIdentity};
use crate::decoder::StreamDecoder;
use crate::error::ClientError;
use crate::event::StreamEvent;

/// Protocol version sent with every request.
pub const PROTOCOL_VERSION: &str = "1";

/// Default streaming RPC endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.sourcewiki.dev/wiki.v1.WikiService/StreamArticle";

/// Static client configuration, constructed once per process.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the streaming RPC endpoint
    pub endpoint: String,
    /// Host IDE name reported in metadata
    pub ide_name: String,
    /// Host IDE version reported in metadata
    pub ide_version: String,
    /// Extension name reported in metadata
    pub extension_name: String,
    /// Extension version reported in metadata
    pub extension_version: String,
    /// BCP-47 locale
    pub locale: String,
    /// Model tier requested for article generation
    pub model_type: ModelType,
    /// Optional overall request timeout
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ide_name: String::new(),
            ide_version: String::new(),
            extension_name: env!("CARGO_PKG_NAME").to_string(),
            extension_version: env!("CARGO_PKG_VERSION").to_string(),
            locale: "en".to_string(),
            model_type: ModelType::Unspecified,
            timeout: None,
        }
    }
}

/// One article query, assembled from the editor-side collaborators.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// Symbol name as shown in the editor
    pub symbol_name: String,
    /// Symbol URI (document + position)
    pub symbol_uri: String,
    /// Source language identifier
    pub language: String,
    /// Kind of the symbol
    pub symbol_type: SymbolType,
    /// Kind of article requested
    pub request_type: RequestType,
    /// Context sections gathered by the editor side
    pub context: SymbolContext,
}

/// Client for the wiki streaming RPC.
///
/// Holds only per-process state (HTTP connection pool, configuration,
/// identity); every call constructs its own request and owns its own
/// decoder, so concurrent calls never share mutable state.
#[derive(Debug)]
pub struct WikiClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Credentials,
    identity: WorkspaceIdentity,
}

impl WikiClient {
    /// Create a client from its three collaborator inputs.
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        identity: WorkspaceIdentity,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            credentials,
            identity,
        })
    }

    fn build_request(&self, query: &ArticleQuery) -> Request {
        Request {
            metadata: Metadata {
                ide_name: self.config.ide_name.clone(),
                ide_version: self.config.ide_version.clone(),
                extension_name: self.config.extension_name.clone(),
                extension_version: self.config.extension_version.clone(),
                api_key: self.credentials.api_key.clone(),
                auth_token: self.credentials.auth_token.clone(),
                locale: self.config.locale.clone(),
                os_info: self.identity.os_info.clone(),
                hardware_info: self.identity.hardware_info.clone(),
                workspace_id: self.identity.workspace_id.clone(),
                session_id: mint_session_id(),
            },
            request_type: query.request_type,
            symbol_name: query.symbol_name.clone(),
            symbol_uri: query.symbol_uri.clone(),
            context: query.context.render(),
            symbol_type: query.symbol_type,
            language: query.language.clone(),
            model_type: self.config.model_type,
        }
    }

    /// Serialize, compress, and frame one outbound request.
    fn encode_request_frame(request: &Request) -> Result<Bytes, ClientError> {
        let frame = Frame::compressed(&request.encode())?;
        Ok(frame.encode()?)
    }

    async fn post(&self, body: Bytes) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .header("content-type", "application/connect+proto")
            .header("connect-protocol-version", PROTOCOL_VERSION)
            .header("connect-content-encoding", "gzip")
            .header("connect-accept-encoding", "gzip")
            // Envelope flags govern payload compression, not HTTP encoding
            .header("accept-encoding", "identity")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(response)
    }

    /// Buffered mode: one POST, await the whole body, decode it at once,
    /// and return the finalized article string.
    ///
    /// Fails with [`ClientError::EmptyResult`] when no article text was
    /// extracted from any frame.
    pub async fn fetch_article(&self, query: &ArticleQuery) -> Result<String, ClientError> {
        let request = self.build_request(query);
        debug!(
            symbol = query.symbol_name.as_str(),
            "sending buffered wiki query"
        );

        let response = self.post(Self::encode_request_frame(&request)?).await?;
        let body = response.bytes().await?;
        decode_buffered(&body)
    }

    /// Streaming mode: feed each network chunk through the decoder and
    /// hand every logical event to `on_event` in byte-stream order.
    ///
    /// No finalization or deduplication is applied; the caller owns any
    /// presentation-level cleanup.
    pub async fn stream_article<F>(
        &self,
        query: &ArticleQuery,
        mut on_event: F,
    ) -> Result<(), ClientError>
    where
        F: FnMut(StreamEvent),
    {
        let request = self.build_request(query);
        debug!(
            symbol = query.symbol_name.as_str(),
            "sending streaming wiki query"
        );

        let response = self.post(Self::encode_request_frame(&request)?).await?;
        let mut decoder = StreamDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for event in decoder.push(&chunk) {
                on_event(event);
            }
        }

        // A final partial frame may have become complete at end-of-stream
        for event in decoder.finish() {
            on_event(event);
        }

        Ok(())
    }
}

/// Decode a complete response body and apply buffered-mode finalization.
fn decode_buffered(body: &[u8]) -> Result<String, ClientError> {
    let mut decoder = StreamDecoder::new();
    decoder.push(body);
    decoder.finish();

    let article = Article::from_decoder(&decoder);
    if article.text.is_empty() {
        return Err(ClientError::EmptyResult);
    }
    Ok(article.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiki_proto::ResponseDelta;
    use wiki_wire::{FrameDecoder, FrameFlags, Inflated};

    fn test_client() -> WikiClient {
        let config = ClientConfig {
            ide_name: "hostide".into(),
            ide_version: "1.92.0".into(),
            locale: "en-US".into(),
            model_type: ModelType::Premium,
            ..Default::default()
        };
        let credentials = Credentials {
            api_key: "key".into(),
            auth_token: "token".into(),
        };
        let identity = WorkspaceIdentity::gather("ws-1".into());
        WikiClient::new(config, credentials, identity).unwrap()
    }

    fn data_frame(delta: &ResponseDelta) -> Vec<u8> {
        Frame::plain(Bytes::from(delta.encode()))
            .encode()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_request_carries_credentials_and_fresh_session() {
        let client = test_client();
        let query = ArticleQuery {
            symbol_name: "decode".into(),
            symbol_type: SymbolType::Function,
            request_type: RequestType::Article,
            ..Default::default()
        };

        let first = client.build_request(&query);
        let second = client.build_request(&query);

        assert_eq!(first.metadata.api_key, "key");
        assert_eq!(first.metadata.workspace_id, "ws-1");
        assert_eq!(first.metadata.session_id.len(), 32);
        assert_ne!(first.metadata.session_id, second.metadata.session_id);
        assert_eq!(first.model_type, ModelType::Premium);
    }

    #[test]
    fn test_request_frame_is_single_and_compressed() {
        let client = test_client();
        let query = ArticleQuery {
            symbol_name: "decode".into(),
            ..Default::default()
        };
        let request = client.build_request(&query);

        let encoded = WikiClient::encode_request_frame(&request).unwrap();
        let mut decoder = FrameDecoder::new();
        let mut buf = bytes::BytesMut::from(encoded.as_ref());

        let frame = decoder.decode(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(frame.flags, FrameFlags::GZIP);

        match frame.inflate() {
            Inflated::Gzip(payload) => {
                let round_trip = Request::decode(&payload).unwrap();
                assert_eq!(round_trip.symbol_name, "decode");
                assert_eq!(round_trip.metadata.session_id, request.metadata.session_id);
            }
            other => panic!("expected compressed payload, got {other:?}"),
        }
    }

    #[test]
    fn test_buffered_decode_happy_path() {
        let mut body = data_frame(&ResponseDelta {
            text_delta: "Hello ".into(),
            ..Default::default()
        });
        body.extend_from_slice(&data_frame(&ResponseDelta {
            text_delta: "world".into(),
            is_article_done: true,
            ..Default::default()
        }));

        assert_eq!(decode_buffered(&body).unwrap(), "Hello world");
    }

    #[test]
    fn test_buffered_decode_appends_followup_section() {
        let mut body = data_frame(&ResponseDelta {
            text_delta: "body".into(),
            ..Default::default()
        });
        body.extend_from_slice(&data_frame(&ResponseDelta {
            followup_questions: "Why?\nWhy?\nHow?".into(),
            is_article_done: true,
            ..Default::default()
        }));

        assert_eq!(
            decode_buffered(&body).unwrap(),
            "body\n\n---\n\nFollow-up questions\n\n- Why?\n- How?\n"
        );
    }

    #[test]
    fn test_json_only_stream_is_empty_result() {
        let body = Frame::plain(Bytes::from_static(br#"{"code":"internal","message":"x"}"#))
            .encode()
            .unwrap();

        assert!(matches!(
            decode_buffered(&body),
            Err(ClientError::EmptyResult)
        ));
    }
}
