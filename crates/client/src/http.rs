use std::time::Duration;

use async_trait::async_trait;
use bookshelf_kernel::settings::ApiSettings;
use bookshelf_kernel::{Book, BookDraft, BookId, BookPatch, BookUpdate};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{ApiError, BookApi};

const COLLECTION: &str = "books";

/// [`BookApi`] over HTTP/JSON against a single base address.
#[derive(Debug, Clone)]
pub struct HttpBookApi {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBookApi {
    /// Client with the transport's default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::with_timeout(
            &settings.base_url,
            settings.request_timeout_ms.map(Duration::from_millis),
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Setup)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/books` or `{base}/books/{id}`, with the id percent-encoded as
    /// a single path segment.
    fn url_for(&self, id: Option<&BookId>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    /// Send the request and turn any non-2xx status into [`ApiError::Http`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        tracing::debug!(
            url = %response.url(),
            status = status.as_u16(),
            "book api response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.map_err(ApiError::Network)?;
        Err(ApiError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        let url = self.url_for(None)?;
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    async fn get_book(&self, id: &BookId) -> Result<Book, ApiError> {
        let url = self.url_for(Some(id))?;
        let response = match self.send(self.http.get(url)).await {
            Ok(response) => response,
            Err(ApiError::Http { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(ApiError::NotFound(id.clone()));
            }
            Err(e) => return Err(e),
        };
        Self::decode(response).await
    }

    async fn create_book(&self, draft: &BookDraft) -> Result<Book, ApiError> {
        let url = self.url_for(None)?;
        let response = self.send(self.http.post(url).json(draft)).await?;
        Self::decode(response).await
    }

    async fn update_book(
        &self,
        id: &BookId,
        patch: &BookPatch,
    ) -> Result<BookUpdate, ApiError> {
        let url = self.url_for(Some(id))?;
        let response = self.send(self.http.put(url).json(patch)).await?;
        Self::decode(response).await
    }

    async fn delete_book(&self, id: &BookId) -> Result<BookId, ApiError> {
        let url = self.url_for(Some(id))?;
        // The body is `{id}`, the deleted record, or nothing at all depending
        // on the server; the status alone confirms the delete.
        self.send(self.http.delete(url)).await?;
        Ok(id.clone())
    }
}
