use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::preview::prepare_preview_content;
use crate::wire::{
    CodeResponse, DeleteBody, ExtensionsBody, FavoritesBody, FsResponse, HiddenBody,
    OptionsResponse, PreviewRejection, PreviewResponse, RenameBody, TreeNodeWire, TreeStructureResponse,
};
use crate::{ApiError, FailureKind, FsReply, ListedNode, OptionsPayload};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Backend REST surface. One method per endpoint.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn list_children(
        &self,
        path: &str,
        show_hidden: bool,
    ) -> Result<Vec<ListedNode>, ApiError>;
    async fn tree_structure(&self) -> Result<String, ApiError>;
    async fn code(&self, paths: &[String]) -> Result<String, ApiError>;
    async fn preview(&self, path: &str) -> Result<String, ApiError>;
    async fn options(&self) -> Result<OptionsPayload, ApiError>;
    async fn hidden(&self) -> Result<Vec<String>, ApiError>;
    async fn save_extensions(&self, extensions: &[String]) -> Result<(), ApiError>;
    async fn save_favorites(&self, favorites: &[String]) -> Result<(), ApiError>;
    async fn save_hidden(&self, hidden: &[String]) -> Result<(), ApiError>;
    async fn rename(&self, old_path: &str, new_name: &str) -> Result<FsReply, ApiError>;
    async fn delete(&self, path: &str) -> Result<FsReply, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base: Url,
    max_bytes: u64,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            max_bytes: settings.max_bytes,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, route: &str) -> Result<Url, ApiError> {
        self.base
            .join(route)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bytes = self.read_body(response).await?;
        decode_json(&bytes)
    }

    async fn post<B: Serialize>(&self, route: &str, body: &B) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(route)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_body(response).await
    }

    /// Fails on non-2xx, then streams the body while enforcing `max_bytes`.
    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        self.stream_body(response).await
    }

    async fn stream_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn list_children(
        &self,
        path: &str,
        show_hidden: bool,
    ) -> Result<Vec<ListedNode>, ApiError> {
        let mut url = self.endpoint("api/tree")?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("showHidden", if show_hidden { "true" } else { "false" });
        let nodes: Vec<TreeNodeWire> = self.get_json(url).await?;
        Ok(nodes.into_iter().map(ListedNode::from).collect())
    }

    async fn tree_structure(&self) -> Result<String, ApiError> {
        let url = self.endpoint("api/tree_structure")?;
        let body: TreeStructureResponse = self.get_json(url).await?;
        Ok(body.tree)
    }

    async fn code(&self, paths: &[String]) -> Result<String, ApiError> {
        let encoded = serde_json::to_string(paths)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let mut url = self.endpoint("api/code")?;
        url.query_pairs_mut().append_pair("paths", &encoded);
        let body: CodeResponse = self.get_json(url).await?;
        Ok(body.code)
    }

    async fn preview(&self, path: &str) -> Result<String, ApiError> {
        let mut url = self.endpoint("api/preview")?;
        url.query_pairs_mut().append_pair("path", path);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_client_error() {
            // Paths the backend refuses to preview come back as a 400 with an
            // empty `content`, which reads as an empty file.
            let bytes = self.stream_body(response).await?;
            return match serde_json::from_slice::<PreviewRejection>(&bytes) {
                Ok(body) => Ok(prepare_preview_content(&body.content)),
                Err(_) => Err(status_error(status)),
            };
        }
        let body: PreviewResponse = decode_json(&self.read_body(response).await?)?;
        Ok(prepare_preview_content(&body.content))
    }

    async fn options(&self) -> Result<OptionsPayload, ApiError> {
        let url = self.endpoint("api/options")?;
        let body: OptionsResponse = self.get_json(url).await?;
        Ok(body.into())
    }

    async fn hidden(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint("api/options/hidden")?;
        self.get_json(url).await
    }

    async fn save_extensions(&self, extensions: &[String]) -> Result<(), ApiError> {
        self.post("api/options/extensions", &ExtensionsBody { extensions })
            .await
            .map(|_| ())
    }

    async fn save_favorites(&self, favorites: &[String]) -> Result<(), ApiError> {
        self.post("api/options/favorites", &FavoritesBody { favorites })
            .await
            .map(|_| ())
    }

    async fn save_hidden(&self, hidden: &[String]) -> Result<(), ApiError> {
        self.post("api/options/hidden", &HiddenBody { hidden })
            .await
            .map(|_| ())
    }

    async fn rename(&self, old_path: &str, new_name: &str) -> Result<FsReply, ApiError> {
        let bytes = self
            .post("api/fs/rename", &RenameBody { old_path, new_name })
            .await?;
        decode_json::<FsResponse>(&bytes).map(FsReply::from)
    }

    async fn delete(&self, path: &str) -> Result<FsReply, ApiError> {
        let bytes = self.post("api/fs/delete", &DeleteBody { path }).await?;
        decode_json::<FsResponse>(&bytes).map(FsReply::from)
    }
}

/// Parses the backend root, forcing a trailing slash so routes join beneath it.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme: {other}"),
        )),
    }
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn status_error(status: reqwest::StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
