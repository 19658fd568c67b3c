//! Inline image encoding and source retrieval for the image editor.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

const STRIPPABLE_PREFIXES: [&str; 3] = [
    PNG_DATA_URI_PREFIX,
    "data:image/jpeg;base64,",
    "data:image/jpg;base64,",
];
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageFetchError {
    #[error("image locator is not supported: {0}")]
    InvalidLocator(String),
    #[error("image source is unreachable: {0}")]
    Unreachable(String),
    #[error("image source responded with status {0}")]
    Status(u16),
    #[error("image data uri is malformed: {0}")]
    MalformedDataUri(String),
    #[error("image source returned no bytes")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.mime_type, &self.bytes)
    }
}

/// Removes a leading png/jpeg base64 data-uri header, leaving other input as is.
pub fn strip_data_uri_prefix(encoded: &str) -> &str {
    STRIPPABLE_PREFIXES
        .iter()
        .find_map(|prefix| encoded.strip_prefix(prefix))
        .unwrap_or(encoded)
}

pub fn to_png_data_uri(base64_data: &str) -> String {
    format!("{PNG_DATA_URI_PREFIX}{base64_data}")
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64_STANDARD.encode(bytes))
}

pub fn decode_data_uri(uri: &str) -> Result<FetchedImage, ImageFetchError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageFetchError::MalformedDataUri("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageFetchError::MalformedDataUri("missing payload".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageFetchError::MalformedDataUri("payload is not base64".to_string()))?;

    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|err| ImageFetchError::MalformedDataUri(err.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageFetchError::Empty);
    }

    Ok(FetchedImage {
        mime_type: if mime_type.is_empty() {
            FALLBACK_MIME_TYPE.to_string()
        } else {
            mime_type.to_string()
        },
        bytes,
    })
}

pub type ImageFetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchedImage, ImageFetchError>> + Send + 'a>>;

/// Retrieves the bytes behind an image locator.
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, locator: &'a str) -> ImageFetchFuture<'a>;
}

/// Resolves `http(s)://` locators over the network and `data:` uris inline.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Without a timeout, fetches wait for the remote host to answer or fail.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        Ok(Self { client })
    }

    async fn fetch_remote(&self, locator: &str) -> Result<FetchedImage, ImageFetchError> {
        let url = Url::parse(locator)
            .map_err(|_| ImageFetchError::InvalidLocator(locator.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ImageFetchError::InvalidLocator(locator.to_string()));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ImageFetchError::Unreachable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status(status.as_u16()));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ImageFetchError::Unreachable(err.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageFetchError::Empty);
        }

        Ok(FetchedImage {
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch<'a>(&'a self, locator: &'a str) -> ImageFetchFuture<'a> {
        Box::pin(async move {
            if locator.starts_with("data:") {
                decode_data_uri(locator)
            } else {
                self.fetch_remote(locator).await
            }
        })
    }
}
