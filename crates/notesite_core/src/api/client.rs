//! Authenticated JSON client for the data API.
//!
//! # Responsibility
//! - Join the configured base URL with endpoint paths.
//! - Attach the bearer credential and encode/decode JSON bodies.
//! - Translate transport, status and decode failures into [`ApiError`].
//!
//! # Invariants
//! - Non-2xx responses are always surfaced as `ApiError::Status`, except a
//!   404 on the `*_optional` helpers, which yields `Ok(None)`.
//! - Response bodies are never logged; only method, path and status are.

use crate::config::ApiConfig;
use log::{debug, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

const MAX_ERROR_BODY_CHARS: usize = 200;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one data API call.
#[derive(Debug)]
pub enum ApiError {
    /// Connection, TLS, timeout or body read failure.
    Transport(reqwest::Error),
    /// The data API answered with a non-success status.
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },
    /// The response body did not match the expected JSON shape.
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "data api request failed: {err}"),
            Self::Status {
                method,
                path,
                status,
                body,
            } => write!(f, "data api {method} {path} returned {status}: {body}"),
            Self::Decode { path, source } => {
                write!(f, "data api response for {path} is not valid: {source}")
            }
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status { .. } => None,
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Shared client for every data API call.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    bearer_token: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Builds a client from validated settings.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            base_url: config.base_url().to_string(),
            bearer_token: config.bearer_token().to_string(),
            http,
        })
    }

    /// `GET path` decoded as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(Method::GET, path, self.request(Method::GET, path)).await?;
        decode(path, response).await
    }

    /// `GET path` where 404 or a JSON `null` body means "absent".
    pub async fn get_optional_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Option<T>> {
        let response = dispatch(&Method::GET, path, self.request(Method::GET, path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("event=api_call module=api status=absent method=GET path={path}");
            return Ok(None);
        }
        let response = check_status(Method::GET, path, response).await?;
        decode::<Option<T>>(path, response).await
    }

    /// `POST path` with a JSON body, decoding the JSON response as `T`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, request).await?;
        decode(path, response).await
    }

    /// `POST path` with a JSON body, ignoring the response body.
    pub async fn post(&self, path: &str, body: &(impl Serialize + ?Sized)) -> ApiResult<()> {
        let request = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, request).await.map(|_| ())
    }

    /// `PUT path` with a JSON body, ignoring the response body.
    pub async fn put(&self, path: &str, body: &(impl Serialize + ?Sized)) -> ApiResult<()> {
        let request = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, request).await.map(|_| ())
    }

    /// `DELETE path`, ignoring the response body.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, request).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.bearer_token)
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        let response = dispatch(&method, path, request).await?;
        check_status(method, path, response).await
    }
}

async fn dispatch(method: &Method, path: &str, request: RequestBuilder) -> ApiResult<Response> {
    request.send().await.map_err(|err| {
        warn!("event=api_call module=api status=error method={method} path={path} kind=transport");
        ApiError::Transport(err)
    })
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn check_status(method: Method, path: &str, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        debug!("event=api_call module=api status=ok method={method} path={path} http={}", status.as_u16());
        return Ok(response);
    }

    warn!(
        "event=api_call module=api status=error method={method} path={path} http={}",
        status.as_u16()
    );
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        method,
        path: path.to_string(),
        status,
        body: truncate(&body, MAX_ERROR_BODY_CHARS),
    })
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

/// Percent-encodes one path segment such as a slug.
pub(crate) fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::{path_segment, truncate};

    #[test]
    fn path_segment_keeps_slug_characters() {
        assert_eq!(path_segment("hello-world_2"), "hello-world_2");
    }

    #[test]
    fn path_segment_escapes_separators() {
        assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn truncate_marks_cut_bodies() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
